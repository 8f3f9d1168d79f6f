//! Chain inspection: structural facts without trust judgement.
//!
//! Extracts the material the validators consume — public-key hashes and the
//! leaf signature-algorithm identifier — from a captured chain. Nothing here
//! decides whether the chain is trustworthy.

use base64::Engine;
use sha2::{Digest, Sha256};

use crate::types::CertificateChain;

/// Structural facts extracted from one chain.
#[derive(Debug, Clone)]
pub struct ChainFacts {
    /// Base64 SHA-256 hash of each certificate's subjectPublicKeyInfo,
    /// leaf first. `None` where the SPKI bytes are missing or empty.
    pub spki_hashes: Vec<Option<String>>,
    /// Signature-algorithm OID of the leaf, if the platform parsed one out.
    pub leaf_signature_algorithm: Option<String>,
}

/// Compute the base64 SHA-256 hash of a subjectPublicKeyInfo encoding.
///
/// Returns `None` for empty input; a certificate without SPKI bytes is
/// malformed and must not silently satisfy a pin.
#[must_use]
pub fn spki_hash_b64(spki: &[u8]) -> Option<String> {
    if spki.is_empty() {
        return None;
    }
    let mut hasher = Sha256::new();
    hasher.update(spki);
    Some(base64::engine::general_purpose::STANDARD.encode(hasher.finalize()))
}

/// Hex SHA-256 fingerprint of a certificate's DER encoding.
///
/// For audit records and log lines; never used for trust decisions, which
/// compare SPKI hashes instead.
#[must_use]
pub fn cert_fingerprint_hex(der: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(der);
    hex::encode(hasher.finalize())
}

/// Extract structural facts from a chain.
#[must_use]
pub fn inspect(chain: &CertificateChain) -> ChainFacts {
    ChainFacts {
        spki_hashes: chain.iter().map(|cert| spki_hash_b64(&cert.spki)).collect(),
        leaf_signature_algorithm: chain
            .leaf()
            .and_then(|cert| cert.signature_algorithm.clone()),
    }
}
