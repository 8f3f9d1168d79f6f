//! Error types for engine bookkeeping operations.
//!
//! Evaluation itself never fails: every challenge resolves to a
//! [`crate::types::Decision`]. These errors cover the surrounding surface
//! (config and exception persistence, consent bookkeeping).

use thiserror::Error;

/// Errors from configuration and store operations.
#[derive(Debug, Error)]
pub enum TrustEngineError {
    /// Configuration could not be loaded or saved.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Error message.
        message: String,
    },

    /// Persistent store could not be read or written.
    #[error("Storage error: {message}")]
    StorageError {
        /// Error message.
        message: String,
    },

    /// Exception grant refused: no consent request is outstanding for the key.
    ///
    /// Exceptions are never granted blind; a trust signal must have been
    /// computed (and escalated to consent) at least once for the host:port.
    #[error("No consent request outstanding for {key}")]
    NoPendingConsent {
        /// The `host:port` key that was refused.
        key: String,
    },
}
