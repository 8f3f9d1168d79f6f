//! Append-only security audit log.
//!
//! Records every validation decision as one of a closed event set. Logging
//! is best-effort: it never blocks or fails the evaluation path, and a
//! persistence failure is swallowed after a log line. Gated by a flag
//! checked once per call.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// In-memory history cap; oldest records are dropped beyond this.
const MAX_RECORDS: usize = 10_000;

/// Closed set of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
    /// An evaluation began for a challenge.
    EvaluationStarted,
    /// The chain was accepted under the active policy.
    EvaluationPassed,
    /// The chain was rejected.
    EvaluationFailed,
    /// The outcome escalated to a user consent request.
    ConsentRequired,
    /// An existing exception short-circuited the evaluation.
    ExceptionUsed,
    /// A user exception was granted.
    ExceptionGranted,
    /// A user exception was revoked.
    ExceptionRevoked,
    /// A configured pin was satisfied by the chain.
    PinningPassed,
    /// A configured pin condemned the chain.
    PinningFailed,
}

/// One recorded audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unix timestamp of the record.
    pub timestamp: i64,
    /// The event that occurred.
    pub event: AuditEvent,
    /// Host the challenge concerned.
    pub host: String,
    /// Port the challenge concerned.
    pub port: u16,
    /// Optional detail (e.g. the failure kind).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Gated, append-only event recorder.
pub struct SecurityAuditLog {
    enabled: AtomicBool,
    records: RwLock<Vec<AuditRecord>>,
    log_path: Option<PathBuf>,
}

impl SecurityAuditLog {
    /// Create an audit log, optionally appending JSONL records to `log_path`.
    #[must_use]
    pub fn new(enabled: bool, log_path: Option<PathBuf>) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            records: RwLock::new(Vec::new()),
            log_path,
        }
    }

    /// Enable or disable recording at runtime.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether recording is currently enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Record an event. Never fails; all errors are swallowed here.
    pub fn record(&self, event: AuditEvent, host: &str, port: u16, detail: Option<String>) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }

        let record = AuditRecord {
            timestamp: current_timestamp(),
            event,
            host: host.to_string(),
            port,
            detail,
        };

        if let Ok(mut records) = self.records.write() {
            if records.len() >= MAX_RECORDS {
                records.remove(0);
            }
            records.push(record.clone());
        }

        self.append_to_file(&record);
    }

    /// Snapshot of the in-memory history.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .read()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Append a record to the JSONL file, best-effort.
    fn append_to_file(&self, record: &AuditRecord) {
        let Some(path) = &self.log_path else {
            return;
        };

        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                debug!("Audit: failed to serialize record: {e}");
                return;
            },
        };

        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{line}"));

        if let Err(e) = result {
            debug!(path = %path.display(), "Audit: failed to append record: {e}");
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_when_enabled() {
        let log = SecurityAuditLog::new(true, None);
        log.record(AuditEvent::EvaluationStarted, "example.com", 443, None);
        log.record(
            AuditEvent::EvaluationFailed,
            "example.com",
            443,
            Some("certificate expired".into()),
        );

        let records = log.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event, AuditEvent::EvaluationStarted);
        assert_eq!(records[1].detail.as_deref(), Some("certificate expired"));
    }

    #[test]
    fn test_disabled_log_records_nothing() {
        let log = SecurityAuditLog::new(false, None);
        log.record(AuditEvent::EvaluationPassed, "example.com", 443, None);
        assert!(log.records().is_empty());
    }

    #[test]
    fn test_runtime_gating() {
        let log = SecurityAuditLog::new(true, None);
        log.record(AuditEvent::EvaluationPassed, "a.example.com", 443, None);
        log.set_enabled(false);
        log.record(AuditEvent::EvaluationPassed, "b.example.com", 443, None);
        log.set_enabled(true);
        log.record(AuditEvent::EvaluationPassed, "c.example.com", 443, None);

        let hosts: Vec<_> = log.records().into_iter().map(|r| r.host).collect();
        assert_eq!(hosts, vec!["a.example.com", "c.example.com"]);
    }

    #[test]
    fn test_history_is_capped() {
        let log = SecurityAuditLog::new(true, None);
        for i in 0..(MAX_RECORDS + 50) {
            log.record(AuditEvent::EvaluationStarted, "example.com", (i % 65536) as u16, None);
        }
        assert_eq!(log.records().len(), MAX_RECORDS);
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let log = SecurityAuditLog::new(true, Some(PathBuf::from("/nonexistent/dir/audit.jsonl")));
        // Must not panic or error; in-memory history still works.
        log.record(AuditEvent::EvaluationPassed, "example.com", 443, None);
        assert_eq!(log.records().len(), 1);
    }

    #[test]
    fn test_jsonl_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let log = SecurityAuditLog::new(true, Some(path.clone()));
        log.record(AuditEvent::PinningFailed, "example.com", 443, None);
        log.record(AuditEvent::EvaluationFailed, "example.com", 443, None);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: AuditRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.event, AuditEvent::PinningFailed);
    }
}
