//! Persistent store of user-granted trust exceptions.
//!
//! Keyed by the literal string `"{host}:{port}"`. Exceptions persist until
//! explicitly revoked or the store is purged; there is no expiry policy by
//! default, a deliberate tradeoff the surrounding product surfaces to the
//! user rather than this engine silently time-boxing grants.
//!
//! Reads are concurrent; writes are serialized behind the lock. Persistence
//! is best-effort: a failed write degrades to a warning, never to a failed
//! grant.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::types::Exception;

/// Thread-safe, optionally persistent exception store.
pub struct ExceptionStore {
    entries: RwLock<HashMap<String, Exception>>,
    storage_path: Option<PathBuf>,
}

impl ExceptionStore {
    /// Create a store, loading any persisted exceptions from `storage_path`.
    ///
    /// A missing or unparseable file starts the store empty; an exception
    /// store that cannot be read must not block startup.
    #[must_use]
    pub fn new(storage_path: Option<PathBuf>) -> Self {
        let entries = storage_path
            .as_deref()
            .map(Self::load_entries)
            .unwrap_or_default();
        Self {
            entries: RwLock::new(entries),
            storage_path,
        }
    }

    /// The canonical `"{host}:{port}"` key for an exception.
    #[must_use]
    pub fn key(host: &str, port: u16) -> String {
        format!("{}:{}", host.to_ascii_lowercase(), port)
    }

    /// Grant an exception for `host:port`. Idempotent: re-granting keeps the
    /// original grant timestamp.
    pub fn grant(&self, host: &str, port: u16) -> Exception {
        let key = Self::key(host, port);
        let exception = Exception {
            host: host.to_ascii_lowercase(),
            port,
            granted_at: current_timestamp(),
        };

        let stored = match self.entries.write() {
            Ok(mut entries) => entries
                .entry(key.clone())
                .or_insert_with(|| exception.clone())
                .clone(),
            Err(_) => {
                warn!(key = %key, "Exception store lock poisoned during grant");
                exception
            },
        };

        debug!(key = %key, "Exception granted");
        self.persist();
        stored
    }

    /// Revoke the exception for `host:port`. A no-op on an absent key.
    pub fn revoke(&self, host: &str, port: u16) {
        let key = Self::key(host, port);
        let removed = self
            .entries
            .write()
            .map(|mut entries| entries.remove(&key).is_some())
            .unwrap_or(false);

        if removed {
            debug!(key = %key, "Exception revoked");
            self.persist();
        }
    }

    /// Whether an exception exists for `host:port`.
    ///
    /// Never cached by callers: a grant or revocation is immediately visible
    /// to subsequent evaluations.
    #[must_use]
    pub fn contains(&self, host: &str, port: u16) -> bool {
        let key = Self::key(host, port);
        self.entries
            .read()
            .map(|entries| entries.contains_key(&key))
            .unwrap_or(false)
    }

    /// Remove every exception in the store.
    pub fn purge(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
        self.persist();
    }

    /// Snapshot of all granted exceptions, for the product's settings UI.
    #[must_use]
    pub fn list(&self) -> Vec<Exception> {
        self.entries
            .read()
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Load persisted exceptions from disk.
    fn load_entries(path: &std::path::Path) -> HashMap<String, Exception> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                debug!(path = %path.display(), "Exceptions: no persisted store ({e})");
                return HashMap::new();
            },
        };

        match serde_json::from_slice::<Vec<Exception>>(&data) {
            Ok(list) => {
                debug!(count = list.len(), "Exceptions: loaded persisted store");
                list.into_iter()
                    .map(|ex| (Self::key(&ex.host, ex.port), ex))
                    .collect()
            },
            Err(e) => {
                warn!(path = %path.display(), "Exceptions: failed to parse store: {e}");
                HashMap::new()
            },
        }
    }

    /// Persist the current store contents, best-effort.
    fn persist(&self) {
        let Some(path) = &self.storage_path else {
            return;
        };

        let list = self.list();
        let data = match serde_json::to_vec_pretty(&list) {
            Ok(data) => data,
            Err(e) => {
                warn!("Exceptions: failed to serialize store: {e}");
                return;
            },
        };

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), "Exceptions: failed to create dir: {e}");
                return;
            }
        }
        if let Err(e) = std::fs::write(path, data) {
            warn!(path = %path.display(), "Exceptions: failed to write store: {e}");
        }
    }
}

/// Current Unix timestamp.
fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
