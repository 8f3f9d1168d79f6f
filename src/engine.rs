//! Trust decision orchestrator.
//!
//! Receives a connection challenge, consults the exception store first, and
//! otherwise runs chain inspection, platform trust evaluation, pinning
//! validation, and the weakness scan, feeding all three signals into the
//! policy engine. Every decision is audited.
//!
//! The decision path is synchronous and must return within the handshake's
//! timeout budget; user consent is delivered out-of-band over a channel
//! consumed by the UI layer. Evaluations are stateless and reentrant: the
//! only shared state is the configuration (snapshotted at the start of each
//! challenge), the exception store, and the audit log.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::audit::{AuditEvent, SecurityAuditLog};
use crate::config::{Pin, SharedConfig};
use crate::error::TrustEngineError;
use crate::exceptions::ExceptionStore;
use crate::inspect;
use crate::pinning::{self, PinCheck};
use crate::platform::PlatformTrustAdapter;
use crate::policy;
use crate::types::{
    AuthMethod, CertificateChain, ConsentRequest, Decision, Exception, SecurityLevel,
    ValidationOutcome,
};
use crate::weakness::{self, WeaknessCheck};

/// Orchestrator for server-trust decisions.
pub struct TrustDecisionService {
    config: SharedConfig,
    platform: PlatformTrustAdapter,
    exceptions: Arc<ExceptionStore>,
    audit: Arc<SecurityAuditLog>,
    consent_tx: mpsc::UnboundedSender<ConsentRequest>,
    /// Host:port keys with an outstanding consent request. A grant through
    /// this service requires one; exceptions are never granted blind.
    pending_consent: RwLock<HashSet<String>>,
    next_request_id: AtomicU64,
}

impl TrustDecisionService {
    /// Create the service and the consent channel the UI layer consumes.
    #[must_use]
    pub fn new(
        config: SharedConfig,
        platform: PlatformTrustAdapter,
        exceptions: Arc<ExceptionStore>,
        audit: Arc<SecurityAuditLog>,
    ) -> (Self, mpsc::UnboundedReceiver<ConsentRequest>) {
        let (consent_tx, consent_rx) = mpsc::unbounded_channel();
        let service = Self {
            config,
            platform,
            exceptions,
            audit,
            consent_tx,
            pending_consent: RwLock::new(HashSet::new()),
            next_request_id: AtomicU64::new(1),
        };
        (service, consent_rx)
    }

    /// Decide the disposition of one connection challenge.
    ///
    /// Called once per TLS handshake requiring a trust decision; the caller
    /// blocks on the return value to proceed with or abort the connection.
    /// There is no cancellation: each call runs to completion and returns
    /// exactly one [`Decision`].
    #[must_use]
    pub fn decide(
        &self,
        host: &str,
        port: u16,
        auth_method: AuthMethod,
        chain: Option<&CertificateChain>,
    ) -> Decision {
        // Only server-trust challenges are governed by this engine.
        if auth_method != AuthMethod::ServerTrust {
            debug!(host = %host, method = ?auth_method, "Delegating non-trust challenge");
            return Decision::DelegateToPlatform;
        }

        // Snapshot the configuration once; a concurrent change affects only
        // evaluations starting after it.
        let (level, pins) = self.snapshot_config();

        let leaf_fingerprint = chain
            .and_then(CertificateChain::leaf)
            .map(|leaf| format!("leaf sha256:{}", inspect::cert_fingerprint_hex(&leaf.der)));
        self.audit
            .record(AuditEvent::EvaluationStarted, host, port, leaf_fingerprint);

        let Some(chain) = chain.filter(|c| !c.is_empty()) else {
            warn!(host = %host, port = port, "Challenge carried no certificate chain");
            self.audit.record(
                AuditEvent::EvaluationFailed,
                host,
                port,
                Some("no certificate chain".into()),
            );
            return Decision::Reject;
        };

        // An existing exception is authoritative for host:port until revoked.
        if self.exceptions.contains(host, port) {
            info!(host = %host, port = port, "Existing exception used");
            self.audit.record(AuditEvent::ExceptionUsed, host, port, None);
            return Decision::UseCredential;
        }

        // The three signals are independent; none blocks on the user.
        let trust = self.platform.evaluate(chain, host);
        let pin_check = match &pins {
            Some(pins) => pinning::validate(chain, pins, host),
            None => PinCheck::NotApplicable,
        };
        let weakness = chain
            .leaf()
            .map(weakness::scan)
            .unwrap_or(WeaknessCheck::Clean);

        match pin_check {
            PinCheck::Matched => {
                self.audit.record(AuditEvent::PinningPassed, host, port, None);
            },
            PinCheck::Failed => {
                self.audit.record(AuditEvent::PinningFailed, host, port, None);
            },
            PinCheck::NotApplicable => {},
        }

        let outcome = policy::decide(&trust, pin_check, weakness, level);
        info!(
            host = %host,
            port = port,
            level = ?level,
            outcome = ?outcome,
            "Trust evaluation complete"
        );

        match outcome {
            ValidationOutcome::Valid => {
                self.audit
                    .record(AuditEvent::EvaluationPassed, host, port, None);
                Decision::UseCredential
            },
            ValidationOutcome::Invalid(kind) => {
                self.audit.record(
                    AuditEvent::EvaluationFailed,
                    host,
                    port,
                    Some(kind.to_string()),
                );
                Decision::Reject
            },
            ValidationOutcome::RequiresUserConsent(kind) => {
                self.audit.record(
                    AuditEvent::ConsentRequired,
                    host,
                    port,
                    Some(kind.to_string()),
                );
                let request_id = self.raise_consent_request(host, port, kind);
                Decision::PendingConsent { request_id }
            },
        }
    }

    /// Grant an exception for a host:port with an outstanding consent
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`TrustEngineError::NoPendingConsent`] if no consent request
    /// was ever raised for the key; an exception requires that a trust
    /// signal was computed at least once.
    pub fn grant_exception(&self, host: &str, port: u16) -> Result<Exception, TrustEngineError> {
        let key = ExceptionStore::key(host, port);
        let outstanding = self
            .pending_consent
            .write()
            .map(|mut pending| pending.remove(&key))
            .unwrap_or(false);

        if !outstanding {
            return Err(TrustEngineError::NoPendingConsent { key });
        }

        let exception = self.exceptions.grant(host, port);
        self.audit
            .record(AuditEvent::ExceptionGranted, host, port, None);
        Ok(exception)
    }

    /// Revoke the exception for a host:port. A no-op on an absent key.
    pub fn revoke_exception(&self, host: &str, port: u16) {
        self.exceptions.revoke(host, port);
        self.audit
            .record(AuditEvent::ExceptionRevoked, host, port, None);
    }

    /// Change the active security level; effective for evaluations starting
    /// after the change.
    pub fn set_security_level(&self, level: SecurityLevel) {
        let mut config = self
            .config
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        config.security_level = level;
    }

    /// The currently active security level.
    #[must_use]
    pub fn security_level(&self) -> SecurityLevel {
        self.config
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .security_level
    }

    /// Snapshot the fields one evaluation needs, syncing the audit gate.
    fn snapshot_config(&self) -> (SecurityLevel, Option<Vec<Pin>>) {
        let config = self
            .config
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        self.audit.set_enabled(config.audit_logging_enabled);
        let pins = config.pinning_enabled.then(|| config.pins.clone());
        (config.security_level, pins)
    }

    /// Emit an out-of-band consent request and mark the key as pending.
    fn raise_consent_request(
        &self,
        host: &str,
        port: u16,
        reason: crate::types::ErrorKind,
    ) -> u64 {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut pending) = self.pending_consent.write() {
            pending.insert(ExceptionStore::key(host, port));
        }

        let request = ConsentRequest {
            request_id,
            host: host.to_string(),
            port,
            reason,
        };
        if self.consent_tx.send(request).is_err() {
            // The UI receiver is gone; the decision already stands as a
            // rejection for this attempt.
            warn!(host = %host, port = port, "Consent channel closed; request dropped");
        }
        request_id
    }
}
