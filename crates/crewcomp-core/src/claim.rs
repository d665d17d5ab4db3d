//! Claim lifecycle types: detector candidates, validation verdicts, and
//! persisted claim rows.
//!
//! A `CandidateClaim` is produced by exactly one detector, validated exactly
//! once into a `Verdict`, and resolved into at most one `PersistedClaim`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of entitlement types this pipeline detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementType {
    /// Time-away-from-base allowance (per diem).
    PerDiem,
    /// Per-hour override for international block time.
    InternationalOverride,
    /// Premium for duty periods exceeding contractual length limits.
    ExtendedDutyPremium,
    /// 100% premium for block hours flown on a company holiday.
    HolidayPremium,
}

impl EntitlementType {
    /// Stable string code used in persistence and notifications.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerDiem => "per_diem",
            Self::InternationalOverride => "international_override",
            Self::ExtendedDutyPremium => "extended_duty_premium",
            Self::HolidayPremium => "holiday_premium",
        }
    }

    pub const ALL: [EntitlementType; 4] = [
        Self::PerDiem,
        Self::InternationalOverride,
        Self::ExtendedDutyPremium,
        Self::HolidayPremium,
    ];
}

impl fmt::Display for EntitlementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntitlementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per_diem" => Ok(Self::PerDiem),
            "international_override" => Ok(Self::InternationalOverride),
            "extended_duty_premium" => Ok(Self::ExtendedDutyPremium),
            "holiday_premium" => Ok(Self::HolidayPremium),
            other => Err(format!("unknown entitlement type: {other}")),
        }
    }
}

/// Structured audit payload recording the numeric inputs a detector used to
/// compute an amount, plus non-numeric context such as a matched holiday.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub figures: BTreeMap<String, f64>,
    pub notes: BTreeMap<String, String>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_figure(mut self, name: &str, value: f64) -> Self {
        self.figures.insert(name.to_string(), value);
        self
    }

    pub fn with_note(mut self, name: &str, value: &str) -> Self {
        self.notes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn figure(&self, name: &str) -> Option<f64> {
        self.figures.get(name).copied()
    }

    pub fn note(&self, name: &str) -> Option<&str> {
        self.notes.get(name).map(String::as_str)
    }
}

/// A detector-proposed entitlement, not yet validated or persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateClaim {
    pub crew_id: String,
    pub entitlement: EntitlementType,
    pub trip_id: String,
    /// Dollars, rounded to cents.
    pub amount: f64,
    pub description: String,
    /// Detection method tag, e.g. `"per_diem_v1"`.
    pub method: String,
    /// Detector's own confidence in [0, 100].
    pub prior_confidence: f64,
    pub evidence: Evidence,
}

/// Validator recommendation for one candidate claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    AutoApprove,
    ManualReview,
    Reject,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoApprove => "auto_approve",
            Self::ManualReview => "manual_review",
            Self::Reject => "reject",
        }
    }
}

/// Which path produced a verdict: the external reasoning service, or the
/// deterministic local fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    Reasoning,
    Fallback,
}

/// Outcome of validating one candidate claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub is_valid: bool,
    /// In [0, 100]; clamped on every construction path.
    pub confidence: f64,
    pub recommendation: Recommendation,
    pub reasoning: String,
    pub contract_references: Vec<String>,
    pub source: VerdictSource,
}

/// Lifecycle status of a persisted claim row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Approved,
    Pending,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }
}

/// The durable record written once a candidate claim has been adjudicated.
///
/// Never re-created for the same `(trip_id, entitlement)` pair: discovery
/// excludes trips that already carry an auto-generated claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedClaim {
    pub claim_id: String,
    pub crew_id: String,
    pub entitlement: EntitlementType,
    pub trip_id: String,
    pub amount: f64,
    pub description: String,
    pub status: ClaimStatus,
    /// True for claims created by this pipeline rather than submitted by a
    /// crew member.
    pub auto_generated: bool,
    pub evidence: Evidence,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PersistedClaim {
    /// Build a row from an adjudicated candidate.
    pub fn from_candidate(
        candidate: &CandidateClaim,
        claim_id: String,
        status: ClaimStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            claim_id,
            crew_id: candidate.crew_id.clone(),
            entitlement: candidate.entitlement,
            trip_id: candidate.trip_id.clone(),
            amount: candidate.amount,
            description: candidate.description.clone(),
            status,
            auto_generated: true,
            evidence: candidate.evidence.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Aggregate summary of one completion-monitor run. Fresh per invocation,
/// reported to the caller, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub trips_processed: u32,
    pub claims_detected: u32,
    pub claims_approved: u32,
    pub claims_review: u32,
    pub claims_rejected: u32,
    pub total_approved_amount: f64,
    /// One `"<trip_id>: <message>"` entry per failed trip, or a single
    /// fatal entry when discovery itself failed.
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunResult {
    pub fn begin(now: DateTime<Utc>) -> Self {
        Self {
            trips_processed: 0,
            claims_detected: 0,
            claims_approved: 0,
            claims_review: 0,
            claims_rejected: 0,
            total_approved_amount: 0.0,
            errors: Vec::new(),
            started_at: now,
            finished_at: None,
        }
    }

    pub fn finish(&mut self, now: DateTime<Utc>) {
        self.finished_at = Some(now);
    }

    pub fn record_trip_error(&mut self, trip_id: &str, message: impl fmt::Display) {
        self.errors.push(format!("{trip_id}: {message}"));
    }
}

/// Clamp a confidence score to the [0, 100] scale.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 100.0) }
}

/// Round a dollar amount to cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
