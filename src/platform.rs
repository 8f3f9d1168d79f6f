//! Platform trust adapter.
//!
//! Wraps whatever native trust-evaluation primitive the platform exposes
//! (chain building against system roots, expiry and hostname checks,
//! revocation where available) behind [`NativeTrustBackend`], and normalizes
//! its result codes into the small internal [`TrustSignal`] vocabulary.
//! Native enums never pass through to the policy layer.
//!
//! Evaluation is a single synchronous call per challenge with no side
//! effects and no retries.

use tracing::debug;

use crate::types::{CertificateChain, ErrorKind, TrustSignal};

/// Raw result codes from native chain evaluation.
///
/// The backend translates whatever its platform reports into one of these;
/// the adapter owns the mapping into [`TrustSignal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeVerdict {
    /// Chain builds to a trusted root and matches the host.
    Trusted,
    /// Leaf or intermediate outside its validity period.
    Expired,
    /// Certificate not yet within its validity period.
    NotYetValid,
    /// Leaf is self-signed.
    SelfSigned,
    /// Certificate does not cover the requested host.
    HostnameMismatch,
    /// Chain terminates in an unknown root.
    UntrustedRoot,
    /// Platform revocation check reported the certificate revoked.
    Revoked,
    /// Chain could not be built at all.
    MalformedChain,
    /// Native evaluation itself failed to run ("could not run", not
    /// "distrusted").
    EvaluationFailed(String),
}

/// Backend producing the platform's raw verdict for a chain.
///
/// The host application wires the actual OS primitive here; the engine never
/// performs the handshake or fetches certificates itself.
pub trait NativeTrustBackend: Send + Sync {
    /// Evaluate `chain` for a connection to `host`.
    fn evaluate_chain(&self, chain: &CertificateChain, host: &str) -> NativeVerdict;
}

/// Adapter normalizing native verdicts into [`TrustSignal`]s.
pub struct PlatformTrustAdapter {
    backend: Box<dyn NativeTrustBackend>,
}

impl PlatformTrustAdapter {
    /// Create an adapter over a platform backend.
    #[must_use]
    pub fn new(backend: Box<dyn NativeTrustBackend>) -> Self {
        Self { backend }
    }

    /// Evaluate a chain and normalize the result.
    ///
    /// Pure evaluation over immutable input; the caller may not call twice
    /// for the same chain expecting a different answer.
    #[must_use]
    pub fn evaluate(&self, chain: &CertificateChain, host: &str) -> TrustSignal {
        let verdict = self.backend.evaluate_chain(chain, host);
        let signal = normalize_verdict(verdict);
        debug!(host = %host, signal = ?signal, "Platform trust evaluation");
        signal
    }
}

/// Map a native verdict into exactly one [`TrustSignal`] variant.
#[must_use]
pub fn normalize_verdict(verdict: NativeVerdict) -> TrustSignal {
    match verdict {
        NativeVerdict::Trusted => TrustSignal::Valid,
        // Validity-period failures share one taxonomy entry.
        NativeVerdict::Expired | NativeVerdict::NotYetValid => {
            TrustSignal::RecoverableFailure(ErrorKind::Expired)
        },
        NativeVerdict::SelfSigned => TrustSignal::RecoverableFailure(ErrorKind::SelfSigned),
        NativeVerdict::HostnameMismatch => {
            TrustSignal::RecoverableFailure(ErrorKind::HostnameMismatch)
        },
        NativeVerdict::UntrustedRoot => TrustSignal::RecoverableFailure(ErrorKind::UntrustedRoot),
        NativeVerdict::Revoked => TrustSignal::FatalFailure(ErrorKind::Revoked),
        NativeVerdict::MalformedChain => TrustSignal::FatalFailure(ErrorKind::InvalidChain),
        NativeVerdict::EvaluationFailed(detail) => {
            TrustSignal::FatalFailure(ErrorKind::Unknown(detail))
        },
    }
}

/// Backend returning a fixed verdict.
///
/// For host integration stubs and tests.
pub struct StaticBackend {
    verdict: NativeVerdict,
}

impl StaticBackend {
    /// Create a backend that always reports `verdict`.
    #[must_use]
    pub fn new(verdict: NativeVerdict) -> Self {
        Self { verdict }
    }
}

impl NativeTrustBackend for StaticBackend {
    fn evaluate_chain(&self, _chain: &CertificateChain, _host: &str) -> NativeVerdict {
        self.verdict.clone()
    }
}
