//! Configuration for the trust engine.
//!
//! Loaded at startup, mutable at runtime through [`SharedConfig`]. The
//! config object is passed explicitly into the service rather than read from
//! a global, so evaluation stays a pure function over its inputs. All
//! concurrent evaluations snapshot the same value; a change takes effect for
//! evaluations starting after it.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TrustEngineError;
use crate::types::SecurityLevel;

/// A configured public-key pin for one domain.
///
/// Pins are configuration data: read-only during evaluation, replaceable
/// only through a config update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// Domain the pin applies to.
    pub domain: String,
    /// Base64 SHA-256 hashes of acceptable subjectPublicKeyInfo values.
    pub key_hashes: HashSet<String>,
    /// Whether subdomains of `domain` are also covered.
    #[serde(default)]
    pub include_subdomains: bool,
}

impl Pin {
    /// Whether this pin applies to `host` (already lowercased).
    #[must_use]
    pub fn applies_to(&self, host: &str) -> bool {
        host == self.domain
            || (self.include_subdomains
                && host.len() > self.domain.len() + 1
                && host.ends_with(&self.domain)
                && host.as_bytes()[host.len() - self.domain.len() - 1] == b'.')
    }
}

/// Runtime configuration for the trust engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Active risk-tolerance level.
    #[serde(default)]
    pub security_level: SecurityLevel,
    /// Whether pinning validation runs at all.
    #[serde(default = "default_true")]
    pub pinning_enabled: bool,
    /// Whether audit events are recorded.
    #[serde(default = "default_true")]
    pub audit_logging_enabled: bool,
    /// Configured pins (defaults plus user-supplied overrides).
    #[serde(default)]
    pub pins: Vec<Pin>,
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            security_level: SecurityLevel::Standard,
            pinning_enabled: true,
            audit_logging_enabled: true,
            pins: Vec::new(),
        }
    }
}

/// Shared, runtime-mutable configuration handle.
///
/// Evaluations take a read snapshot at the start of each challenge.
pub type SharedConfig = Arc<RwLock<EngineConfig>>;

impl EngineConfig {
    /// Wrap this configuration in a shared handle for the service.
    #[must_use]
    pub fn into_shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`TrustEngineError::ConfigError`] if the file cannot be read
    /// or parsed.
    pub fn load(path: &Path) -> Result<Self, TrustEngineError> {
        let data = std::fs::read(path).map_err(|e| TrustEngineError::ConfigError {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        let config: Self =
            serde_json::from_slice(&data).map_err(|e| TrustEngineError::ConfigError {
                message: format!("failed to parse {}: {e}", path.display()),
            })?;
        debug!(
            security_level = ?config.security_level,
            pins = config.pins.len(),
            "Config: loaded"
        );
        Ok(config)
    }

    /// Save configuration to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`TrustEngineError::ConfigError`] if serialization or the
    /// write fails.
    pub fn save(&self, path: &Path) -> Result<(), TrustEngineError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TrustEngineError::ConfigError {
                message: format!("failed to create {}: {e}", parent.display()),
            })?;
        }
        let data =
            serde_json::to_vec_pretty(self).map_err(|e| TrustEngineError::ConfigError {
                message: format!("failed to serialize config: {e}"),
            })?;
        std::fs::write(path, data).map_err(|e| TrustEngineError::ConfigError {
            message: format!("failed to write {}: {e}", path.display()),
        })
    }
}
