//! # certgate
//!
//! TLS certificate validation and trust policy engine: decides whether a
//! network peer's certificate chain should be trusted, rejected, or
//! escalated to the user, for every secure connection the host application
//! establishes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  TrustDecisionService                        │
//! │                                                              │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐      │
//! │  │ PlatformTrust│  │ Pinning      │  │ Weakness     │      │
//! │  │ Adapter      │  │ Validator    │  │ Scanner      │      │
//! │  └──────────────┘  └──────────────┘  └──────────────┘      │
//! │            │               │               │                │
//! │            ▼               ▼               ▼                │
//! │  ┌──────────────────────────────────────────────────┐      │
//! │  │                  PolicyEngine                     │      │
//! │  │     (pure, total, SecurityLevel-parameterized)   │      │
//! │  └──────────────────────────────────────────────────┘      │
//! │            │                                                │
//! │            ▼                                                │
//! │  ┌───────────────┐   ┌───────────────┐                     │
//! │  │ ExceptionStore│   │ SecurityAudit │                     │
//! │  │ (persistent)  │   │ Log           │                     │
//! │  └───────────────┘   └───────────────┘                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Properties
//!
//! - **Pinning overrides everything**: a pinning failure condemns the chain
//!   at every security level, including a system-trusted one.
//! - **Fail-secure**: a platform evaluation that could not run resolves to
//!   a fatal failure, never to a pass.
//! - **No silent consent**: a consent-requiring outcome rejects the current
//!   attempt; only an explicit user grant affects future attempts.
//! - **Auditable**: every decision is recorded in a gated, append-only log
//!   that can never fail the evaluation path.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)] // Allow Type in module::Type
#![allow(clippy::must_use_candidate)] // Not all functions need must_use

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod exceptions;
pub mod inspect;
pub mod pinning;
pub mod platform;
pub mod policy;
pub mod types;
pub mod weakness;

pub use audit::{AuditEvent, AuditRecord, SecurityAuditLog};
pub use config::{EngineConfig, Pin, SharedConfig};
pub use engine::TrustDecisionService;
pub use error::TrustEngineError;
pub use exceptions::ExceptionStore;
pub use inspect::{cert_fingerprint_hex, inspect, spki_hash_b64, ChainFacts};
pub use pinning::PinCheck;
pub use platform::{NativeTrustBackend, NativeVerdict, PlatformTrustAdapter, StaticBackend};
pub use types::{
    AuthMethod, Certificate, CertificateChain, ConsentRequest, Decision, ErrorKind, Exception,
    SecurityLevel, SecuritySeverity, TrustSignal, ValidationOutcome,
};
pub use weakness::WeaknessCheck;
