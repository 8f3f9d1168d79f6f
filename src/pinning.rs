//! Public-key pinning validation.
//!
//! Checks a chain's SPKI hashes against the configured pins. This check is
//! independent of the platform trust verdict and runs regardless of it: a
//! pinning failure condemns an otherwise system-trusted chain, which is the
//! defense against a compromised or rogue CA.

use tracing::{debug, warn};

use crate::config::Pin;
use crate::inspect;
use crate::types::CertificateChain;

/// Result of checking a chain against the configured pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinCheck {
    /// No pin applies to the host; absence of a pin is not a failure.
    NotApplicable,
    /// At least one chain SPKI hash intersects the applicable pin.
    Matched,
    /// A pin applies and no chain hash satisfies it.
    Failed,
}

/// Find the most specific pin applicable to `host`.
///
/// An exact domain match takes precedence over subdomain pins; among
/// subdomain pins the longest domain wins.
#[must_use]
pub fn find_pin<'a>(pins: &'a [Pin], host: &str) -> Option<&'a Pin> {
    if let Some(exact) = pins.iter().find(|p| p.domain == host) {
        return Some(exact);
    }
    pins.iter()
        .filter(|p| p.applies_to(host))
        .max_by_key(|p| p.domain.len())
}

/// Validate a chain against the configured pins for `host`.
///
/// Succeeds if **any** certificate in the chain (leaf or intermediate)
/// carries a pinned key. A certificate whose SPKI hash cannot be computed
/// contributes nothing toward a match, so a malformed chain under an
/// applicable pin fails rather than being silently accepted.
#[must_use]
pub fn validate(chain: &CertificateChain, pins: &[Pin], host: &str) -> PinCheck {
    let host = host.to_ascii_lowercase();
    let Some(pin) = find_pin(pins, &host) else {
        return PinCheck::NotApplicable;
    };

    let facts = inspect::inspect(chain);
    let mut malformed = 0usize;
    for hash in &facts.spki_hashes {
        match hash {
            Some(h) if pin.key_hashes.contains(h) => {
                debug!(host = %host, pin_domain = %pin.domain, "Pin matched");
                return PinCheck::Matched;
            },
            Some(_) => {},
            None => malformed += 1,
        }
    }

    if malformed > 0 {
        warn!(
            host = %host,
            malformed = malformed,
            "Chain contains certificates without computable key hashes"
        );
    }
    warn!(host = %host, pin_domain = %pin.domain, "Pinning failure");
    PinCheck::Failed
}
