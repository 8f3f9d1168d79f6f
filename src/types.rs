//! Core vocabulary for trust decisions.
//!
//! Every failure path in the engine resolves to one member of the closed
//! [`ErrorKind`] set, and every evaluation terminates in exactly one
//! [`ValidationOutcome`]. Outcomes are never persisted; they are logged and
//! acted upon, then discarded.

use serde::{Deserialize, Serialize};

/// Severity attached to a validation failure.
///
/// The [`ErrorKind`] → severity mapping is a static invariant; it is never
/// overridden at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SecuritySeverity {
    /// Advisory; safe to surface as a consent prompt.
    Low,
    /// Degraded trust; consent prompt acceptable.
    Medium,
    /// Serious trust failure; consent only at permissive levels.
    High,
    /// Never recoverable by user consent.
    Critical,
}

/// Closed set of validation failure kinds.
///
/// Compared structurally, never by display text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Certificate outside its validity period.
    Expired,
    /// Leaf is self-signed and not otherwise trusted.
    SelfSigned,
    /// Certificate does not cover the requested hostname.
    HostnameMismatch,
    /// Chain does not terminate in a trusted root.
    UntrustedRoot,
    /// Certificate has been revoked.
    Revoked,
    /// Leaf is signed with a deprecated algorithm family.
    WeakSignature,
    /// Chain is structurally unusable.
    InvalidChain,
    /// Chain hashes do not intersect a configured pin.
    PinningFailure,
    /// Unclassified platform failure, with detail for the audit trail.
    Unknown(String),
}

impl ErrorKind {
    /// Static severity for this failure kind.
    #[must_use]
    pub fn severity(&self) -> SecuritySeverity {
        match self {
            Self::WeakSignature => SecuritySeverity::Low,
            Self::Expired => SecuritySeverity::Medium,
            Self::SelfSigned | Self::HostnameMismatch | Self::UntrustedRoot => {
                SecuritySeverity::High
            },
            Self::Unknown(_) => SecuritySeverity::High,
            Self::Revoked | Self::InvalidChain | Self::PinningFailure => {
                SecuritySeverity::Critical
            },
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "certificate expired"),
            Self::SelfSigned => write!(f, "self-signed certificate"),
            Self::HostnameMismatch => write!(f, "hostname mismatch"),
            Self::UntrustedRoot => write!(f, "untrusted root"),
            Self::Revoked => write!(f, "certificate revoked"),
            Self::WeakSignature => write!(f, "weak signature algorithm"),
            Self::InvalidChain => write!(f, "invalid certificate chain"),
            Self::PinningFailure => write!(f, "pinning failure"),
            Self::Unknown(detail) => write!(f, "unknown failure: {detail}"),
        }
    }
}

/// Process-wide risk tolerance, ordered from least to most permissive.
///
/// A single mutable setting shared by all evaluations; changing it affects
/// evaluations starting after the change.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SecurityLevel {
    /// Only a clean platform verdict passes; no consent path exists.
    Paranoid,
    /// Recoverable failures escalate to consent unless critical.
    Strict,
    /// Default browser-like behavior.
    #[default]
    Standard,
    /// Non-critical fatal failures are downgraded to consent prompts.
    Relaxed,
}

/// Normalized verdict from platform chain evaluation.
///
/// Produced fresh per challenge; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustSignal {
    /// Platform considers the chain trustworthy for the host.
    Valid,
    /// Platform distrusts the chain for a reason a user may override.
    RecoverableFailure(ErrorKind),
    /// Platform distrusts the chain terminally, or evaluation could not run.
    FatalFailure(ErrorKind),
}

/// Terminal artifact of one policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Chain is acceptable under the active policy.
    Valid,
    /// Chain is rejected; the connection must be aborted.
    Invalid(ErrorKind),
    /// Chain is acceptable only with explicit user consent.
    RequiresUserConsent(ErrorKind),
}

impl ValidationOutcome {
    /// Whether the outcome permits the connection without user involvement.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Authentication method of the connection challenge.
///
/// The engine only governs server-trust decisions; other methods are
/// delegated to the platform default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Server TLS certificate trust evaluation.
    ServerTrust,
    /// HTTP Basic authentication.
    HttpBasic,
    /// HTTP Digest authentication.
    HttpDigest,
    /// Server requested a client certificate.
    ClientCertificate,
}

/// Disposition returned to the handshake collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Proceed with the offered credential.
    UseCredential,
    /// Abort the connection; no credential may be used.
    Reject,
    /// Abort this attempt; a consent request with the given id was raised
    /// out-of-band. A user grant affects only future attempts.
    PendingConsent {
        /// Identifier of the outstanding consent request.
        request_id: u64,
    },
    /// Not a server-trust challenge; the platform default applies.
    DelegateToPlatform,
}

impl Decision {
    /// Whether the handshake may proceed with the offered credential.
    #[must_use]
    pub fn allows_connection(&self) -> bool {
        matches!(self, Self::UseCredential)
    }
}

/// One certificate as captured from the handshake.
///
/// No X.509 parsing happens in this engine; the handshake collaborator
/// supplies the raw encoding, the subjectPublicKeyInfo bytes, and the parsed
/// signature-algorithm OID when the platform exposes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Raw DER encoding of the certificate.
    pub der: Vec<u8>,
    /// DER encoding of the subjectPublicKeyInfo.
    pub spki: Vec<u8>,
    /// Dotted signature-algorithm OID (e.g. `1.2.840.113549.1.1.11`), if the
    /// platform parsed one out.
    pub signature_algorithm: Option<String>,
}

/// Ordered certificate chain, leaf first.
///
/// Immutable once captured; owned exclusively by the evaluation that
/// received it and never cached beyond the decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateChain {
    certs: Vec<Certificate>,
}

impl CertificateChain {
    /// Capture a chain from handshake-supplied certificates, leaf first.
    #[must_use]
    pub fn new(certs: Vec<Certificate>) -> Self {
        Self { certs }
    }

    /// The leaf certificate, if the chain is non-empty.
    #[must_use]
    pub fn leaf(&self) -> Option<&Certificate> {
        self.certs.first()
    }

    /// Whether the chain contains no certificates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    /// Number of certificates in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.certs.len()
    }

    /// Iterate over certificates, leaf first.
    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        self.certs.iter()
    }
}

/// A persisted user-granted trust exception for one host:port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    /// Hostname the exception covers.
    pub host: String,
    /// Port the exception covers.
    pub port: u16,
    /// Unix timestamp of the original grant.
    pub granted_at: i64,
}

/// Out-of-band consent request delivered to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentRequest {
    /// Identifier echoed back by [`Decision::PendingConsent`].
    pub request_id: u64,
    /// Host awaiting a user decision.
    pub host: String,
    /// Port awaiting a user decision.
    pub port: u16,
    /// The failure the user would be overriding.
    pub reason: ErrorKind,
}
