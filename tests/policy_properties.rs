//! Property-based tests for the policy engine.
//!
//! These verify the policy invariants over the full input space: pinning
//! supremacy, the binary nature of the paranoid level, and severity
//! monotonicity for critical failures.

use proptest::prelude::*;

use certgate::pinning::PinCheck;
use certgate::policy;
use certgate::weakness::WeaknessCheck;
use certgate::{ErrorKind, SecurityLevel, SecuritySeverity, TrustSignal, ValidationOutcome};

/// Strategy over the closed failure set, including arbitrary Unknown details.
fn error_kind_strategy() -> impl Strategy<Value = ErrorKind> {
    prop_oneof![
        Just(ErrorKind::Expired),
        Just(ErrorKind::SelfSigned),
        Just(ErrorKind::HostnameMismatch),
        Just(ErrorKind::UntrustedRoot),
        Just(ErrorKind::Revoked),
        Just(ErrorKind::WeakSignature),
        Just(ErrorKind::InvalidChain),
        Just(ErrorKind::PinningFailure),
        "[a-z ]{0,24}".prop_map(ErrorKind::Unknown),
    ]
}

fn trust_signal_strategy() -> impl Strategy<Value = TrustSignal> {
    prop_oneof![
        Just(TrustSignal::Valid),
        error_kind_strategy().prop_map(TrustSignal::RecoverableFailure),
        error_kind_strategy().prop_map(TrustSignal::FatalFailure),
    ]
}

fn level_strategy() -> impl Strategy<Value = SecurityLevel> {
    prop_oneof![
        Just(SecurityLevel::Paranoid),
        Just(SecurityLevel::Strict),
        Just(SecurityLevel::Standard),
        Just(SecurityLevel::Relaxed),
    ]
}

fn pin_check_strategy() -> impl Strategy<Value = PinCheck> {
    prop_oneof![
        Just(PinCheck::NotApplicable),
        Just(PinCheck::Matched),
        Just(PinCheck::Failed),
    ]
}

fn weakness_strategy() -> impl Strategy<Value = WeaknessCheck> {
    prop_oneof![Just(WeaknessCheck::Clean), Just(WeaknessCheck::Flagged)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    })]

    /// A pinning failure is Invalid(PinningFailure) for every trust signal,
    /// weakness result, and security level.
    #[test]
    fn pinning_failure_always_invalid(
        trust in trust_signal_strategy(),
        weakness in weakness_strategy(),
        level in level_strategy(),
    ) {
        let outcome = policy::decide(&trust, PinCheck::Failed, weakness, level);
        prop_assert_eq!(outcome, ValidationOutcome::Invalid(ErrorKind::PinningFailure));
    }

    /// Paranoid is strictly binary: never a consent prompt, for any input.
    #[test]
    fn paranoid_never_requires_consent(
        trust in trust_signal_strategy(),
        pin in pin_check_strategy(),
        weakness in weakness_strategy(),
    ) {
        let outcome = policy::decide(&trust, pin, weakness, SecurityLevel::Paranoid);
        prop_assert!(
            !matches!(outcome, ValidationOutcome::RequiresUserConsent(_)),
            "paranoid produced consent for {:?}", trust
        );
    }

    /// No level maps a critical-severity failure to a consent prompt.
    #[test]
    fn critical_failures_never_reach_consent(
        trust in trust_signal_strategy(),
        pin in pin_check_strategy(),
        weakness in weakness_strategy(),
        level in level_strategy(),
    ) {
        let outcome = policy::decide(&trust, pin, weakness, level);
        if let ValidationOutcome::RequiresUserConsent(kind) = &outcome {
            prop_assert_ne!(kind.severity(), SecuritySeverity::Critical);
        }
    }

    /// A clean platform verdict with no pinning failure and no weakness flag
    /// passes at every level.
    #[test]
    fn clean_chain_passes(level in level_strategy()) {
        for pin in [PinCheck::NotApplicable, PinCheck::Matched] {
            let outcome =
                policy::decide(&TrustSignal::Valid, pin, WeaknessCheck::Clean, level);
            prop_assert_eq!(outcome, ValidationOutcome::Valid);
        }
    }

    /// The weakness flag never makes an outcome more permissive: anything
    /// rejected with a clean scan stays rejected with a flagged one, and a
    /// flagged scan never yields Valid.
    #[test]
    fn weakness_only_tightens(
        trust in trust_signal_strategy(),
        pin in pin_check_strategy(),
        level in level_strategy(),
    ) {
        let clean = policy::decide(&trust, pin, WeaknessCheck::Clean, level);
        let flagged = policy::decide(&trust, pin, WeaknessCheck::Flagged, level);

        if let ValidationOutcome::Invalid(kind) = &clean {
            prop_assert_eq!(&flagged, &ValidationOutcome::Invalid(kind.clone()));
        }
        prop_assert_ne!(flagged, ValidationOutcome::Valid);
    }

    /// The policy is total and deterministic: the same inputs always produce
    /// the same single outcome.
    #[test]
    fn policy_is_deterministic(
        trust in trust_signal_strategy(),
        pin in pin_check_strategy(),
        weakness in weakness_strategy(),
        level in level_strategy(),
    ) {
        let first = policy::decide(&trust, pin, weakness, level);
        let second = policy::decide(&trust, pin, weakness, level);
        prop_assert_eq!(first, second);
    }

    /// Relaxing the level never turns an accepted chain into a rejected one:
    /// if a level accepts, every more permissive level does not reject
    /// outright with a different reason class.
    #[test]
    fn valid_outcome_stable_across_levels(trust in trust_signal_strategy()) {
        let levels = [
            SecurityLevel::Paranoid,
            SecurityLevel::Strict,
            SecurityLevel::Standard,
            SecurityLevel::Relaxed,
        ];
        let outcomes: Vec<_> = levels
            .iter()
            .map(|level| {
                policy::decide(
                    &trust,
                    PinCheck::NotApplicable,
                    WeaknessCheck::Clean,
                    *level,
                )
            })
            .collect();

        // A chain valid at Paranoid is valid everywhere.
        if outcomes[0] == ValidationOutcome::Valid {
            for outcome in &outcomes {
                prop_assert_eq!(outcome, &ValidationOutcome::Valid);
            }
        }
    }
}
