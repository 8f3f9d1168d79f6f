//! Policy engine: composes the independent signals into one outcome.
//!
//! Pure and total: every `(TrustSignal, PinCheck, WeaknessCheck,
//! SecurityLevel)` combination has exactly one defined outcome, with no
//! default branch. Evaluation short-circuits in order:
//!
//! 1. A pinning failure is `Invalid(PinningFailure)` unconditionally, at
//!    every level. Pinning never becomes a mere consent prompt.
//! 2. The platform signal is mapped through the active level.
//! 3. A weakness flag downgrades a would-be `Valid` to a consent prompt;
//!    it never overrides an `Invalid` outcome or a pinning failure.
//!
//! A failure whose severity is `Critical` resolves to `Invalid` at every
//! level; no level maps it to a consent prompt.

use crate::pinning::PinCheck;
use crate::types::{ErrorKind, SecurityLevel, SecuritySeverity, TrustSignal, ValidationOutcome};
use crate::weakness::WeaknessCheck;

/// Combine the trust, pinning, and weakness signals under a security level.
#[must_use]
pub fn decide(
    trust: &TrustSignal,
    pinning: PinCheck,
    weakness: WeaknessCheck,
    level: SecurityLevel,
) -> ValidationOutcome {
    if pinning == PinCheck::Failed {
        return ValidationOutcome::Invalid(ErrorKind::PinningFailure);
    }

    let outcome = apply_level(trust, level);

    match outcome {
        ValidationOutcome::Valid if weakness == WeaknessCheck::Flagged => {
            if level == SecurityLevel::Paranoid {
                // No consent path exists at Paranoid.
                ValidationOutcome::Invalid(ErrorKind::WeakSignature)
            } else {
                ValidationOutcome::RequiresUserConsent(ErrorKind::WeakSignature)
            }
        },
        other => other,
    }
}

/// Map the platform trust signal through the active level.
fn apply_level(trust: &TrustSignal, level: SecurityLevel) -> ValidationOutcome {
    match (level, trust) {
        (_, TrustSignal::Valid) => ValidationOutcome::Valid,

        // Paranoid: anything short of a clean verdict is rejected.
        (SecurityLevel::Paranoid, TrustSignal::RecoverableFailure(e))
        | (SecurityLevel::Paranoid, TrustSignal::FatalFailure(e)) => {
            ValidationOutcome::Invalid(e.clone())
        },

        (SecurityLevel::Strict, TrustSignal::RecoverableFailure(e))
        | (SecurityLevel::Standard, TrustSignal::RecoverableFailure(e))
        | (SecurityLevel::Relaxed, TrustSignal::RecoverableFailure(e)) => consent_or_invalid(e),

        (SecurityLevel::Strict, TrustSignal::FatalFailure(e))
        | (SecurityLevel::Standard, TrustSignal::FatalFailure(e)) => {
            ValidationOutcome::Invalid(e.clone())
        },

        // Relaxed downgrades non-critical fatal failures to consent prompts.
        (SecurityLevel::Relaxed, TrustSignal::FatalFailure(e)) => consent_or_invalid(e),
    }
}

/// Consent for non-critical failures; rejection for critical ones.
fn consent_or_invalid(e: &ErrorKind) -> ValidationOutcome {
    if e.severity() == SecuritySeverity::Critical {
        ValidationOutcome::Invalid(e.clone())
    } else {
        ValidationOutcome::RequiresUserConsent(e.clone())
    }
}
