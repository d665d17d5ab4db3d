//! Best-effort claim notifications.
//!
//! The notifier is an injected capability: the monitor publishes one event
//! per created claim and logs (never propagates) publish failures.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crewcomp_core::{ClaimStatus, PersistedClaim};
use serde::Serialize;
use thiserror::Error;

/// Broadcast channel every claim event is addressed to, alongside the
/// owning crew member's channel.
pub const ADMIN_CHANNEL: &str = "admin";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("publish failed: {0}")]
    Publish(String),
}

/// Structured event emitted after a claim row is created.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimEvent {
    pub event: &'static str,
    pub claim: PersistedClaim,
    pub crew_id: String,
    pub status: ClaimStatus,
    pub timestamp: DateTime<Utc>,
    /// Logical delivery channels: the owning crew member and the admin
    /// broadcast.
    pub channels: Vec<String>,
}

impl ClaimEvent {
    pub fn auto_generated(claim: &PersistedClaim, timestamp: DateTime<Utc>) -> Self {
        Self {
            event: "claim_auto_generated",
            crew_id: claim.crew_id.clone(),
            status: claim.status,
            channels: vec![format!("crew:{}", claim.crew_id), ADMIN_CHANNEL.to_string()],
            claim: claim.clone(),
            timestamp,
        }
    }
}

/// Real-time transport boundary (external collaborator).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, event: &ClaimEvent) -> Result<(), NotifyError>;
}

/// Discards every event.
#[derive(Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn publish(&self, _event: &ClaimEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Captures events for assertions; optionally fails every publish to
/// exercise the best-effort path.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ClaimEvent>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn events(&self) -> Vec<ClaimEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, event: &ClaimEvent) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Publish("transport down".to_string()));
        }
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
        Ok(())
    }
}
