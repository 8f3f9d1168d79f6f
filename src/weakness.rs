//! Weak-signature scanning for the leaf certificate.
//!
//! Advisory signal only: a flagged certificate escalates to user consent,
//! never to outright rejection, so rare false positives are tolerable and
//! false negatives are accepted by design.
//!
//! The structured signature-algorithm OID is preferred when the platform
//! parsed one out. When it did not, a byte-pattern scan over the DER
//! encoding looks for the deprecated signature OIDs directly; this fallback
//! exists because the engine deliberately carries no X.509 parser.

use tracing::debug;

use crate::types::Certificate;

/// Result of scanning the leaf certificate's signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaknessCheck {
    /// No deprecated algorithm family detected.
    Clean,
    /// The leaf appears to be signed with a deprecated algorithm.
    Flagged,
}

/// Dotted OIDs of deprecated signature algorithm families.
const WEAK_SIGNATURE_OIDS: &[&str] = &[
    "1.2.840.113549.1.1.2", // md2WithRSAEncryption
    "1.2.840.113549.1.1.3", // md4WithRSAEncryption
    "1.2.840.113549.1.1.4", // md5WithRSAEncryption
    "1.2.840.113549.1.1.5", // sha1WithRSAEncryption
    "1.3.14.3.2.29",        // sha1WithRSAEncryption (OIW)
    "1.2.840.10040.4.3",    // dsa-with-sha1
    "1.2.840.10045.4.1",    // ecdsa-with-SHA1
];

/// DER-encoded forms of the same OIDs, for the heuristic fallback.
const WEAK_SIGNATURE_OID_DER: &[&[u8]] = &[
    &[0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x02],
    &[0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x03],
    &[0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x04],
    &[0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x05],
    &[0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1d],
    &[0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x38, 0x04, 0x03],
    &[0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x01],
];

/// Scan the leaf certificate for a deprecated signature algorithm.
#[must_use]
pub fn scan(leaf: &Certificate) -> WeaknessCheck {
    if let Some(oid) = &leaf.signature_algorithm {
        if WEAK_SIGNATURE_OIDS.contains(&oid.as_str()) {
            debug!(oid = %oid, "Leaf signed with deprecated algorithm");
            return WeaknessCheck::Flagged;
        }
        return WeaknessCheck::Clean;
    }
    scan_der(&leaf.der)
}

/// Heuristic fallback: look for deprecated signature OID encodings in the
/// raw certificate bytes.
fn scan_der(der: &[u8]) -> WeaknessCheck {
    for pattern in WEAK_SIGNATURE_OID_DER {
        if der
            .windows(pattern.len())
            .any(|window| window == *pattern)
        {
            debug!("Deprecated signature OID pattern found in leaf encoding");
            return WeaknessCheck::Flagged;
        }
    }
    WeaknessCheck::Clean
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(der: Vec<u8>, oid: Option<&str>) -> Certificate {
        Certificate {
            der,
            spki: b"key".to_vec(),
            signature_algorithm: oid.map(str::to_string),
        }
    }

    #[test]
    fn test_structured_weak_oid_is_flagged() {
        let cert = leaf(Vec::new(), Some("1.2.840.113549.1.1.4"));
        assert_eq!(scan(&cert), WeaknessCheck::Flagged);

        let cert = leaf(Vec::new(), Some("1.2.840.113549.1.1.5"));
        assert_eq!(scan(&cert), WeaknessCheck::Flagged);
    }

    #[test]
    fn test_structured_modern_oid_is_clean() {
        // sha256WithRSAEncryption
        let cert = leaf(Vec::new(), Some("1.2.840.113549.1.1.11"));
        assert_eq!(scan(&cert), WeaknessCheck::Clean);

        // ecdsa-with-SHA256
        let cert = leaf(Vec::new(), Some("1.2.840.10045.4.3.2"));
        assert_eq!(scan(&cert), WeaknessCheck::Clean);
    }

    #[test]
    fn test_structured_field_wins_over_der_content() {
        // The parsed OID says SHA-256; a weak pattern in the body (e.g. an
        // extension octet string) must not trigger the fallback.
        let mut der = vec![0x30, 0x82];
        der.extend_from_slice(&[0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x04]);
        let cert = leaf(der, Some("1.2.840.113549.1.1.11"));
        assert_eq!(scan(&cert), WeaknessCheck::Clean);
    }

    #[test]
    fn test_heuristic_fallback_flags_md5_pattern() {
        let mut der = vec![0x30, 0x82, 0x01, 0x00];
        der.extend_from_slice(&[0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x04]);
        der.extend_from_slice(&[0x05, 0x00]);
        let cert = leaf(der, None);
        assert_eq!(scan(&cert), WeaknessCheck::Flagged);
    }

    #[test]
    fn test_heuristic_fallback_flags_sha1_ecdsa_pattern() {
        let mut der = vec![0x30, 0x10];
        der.extend_from_slice(&[0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x01]);
        let cert = leaf(der, None);
        assert_eq!(scan(&cert), WeaknessCheck::Flagged);
    }

    #[test]
    fn test_heuristic_fallback_clean_bytes() {
        // sha256WithRSAEncryption DER OID.
        let mut der = vec![0x30, 0x82];
        der.extend_from_slice(&[0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b]);
        let cert = leaf(der, None);
        assert_eq!(scan(&cert), WeaknessCheck::Clean);
    }

    #[test]
    fn test_empty_der_is_clean() {
        let cert = leaf(Vec::new(), None);
        assert_eq!(scan(&cert), WeaknessCheck::Clean);
    }
}
