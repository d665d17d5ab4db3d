//! Review-check result types and the final folded decision.

use crewcomp_core::{PersistedClaim, Trip};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("check '{check}' failed: {message}")]
    CheckFailed { check: &'static str, message: String },
}

/// Everything a review check may consult: the claim under review, its
/// source trip when resolvable, and the crew member's other claims.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    pub claim: PersistedClaim,
    pub trip: Option<Trip>,
    /// Other claims by the same crew member, excluding the one under
    /// review.
    pub prior_claims: Vec<PersistedClaim>,
}

/// Outcome class of one review check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Approved,
    Flagged,
    Error,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Flagged => "flagged",
            Self::Error => "error",
        }
    }
}

/// Result of one review check. Confidence is on the [0, 1] scale.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResult {
    pub agent: &'static str,
    pub status: CheckStatus,
    pub confidence: f64,
    pub summary: String,
    pub issues: Vec<String>,
    pub elapsed_ms: u64,
}

/// Adjudicated outcome of a full review pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Approved,
    Flagged,
    Rejected,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Flagged => "flagged",
            Self::Rejected => "rejected",
        }
    }
}

/// One decision folded from every check's result.
#[derive(Debug, Clone, Serialize)]
pub struct FinalDecision {
    pub status: DecisionStatus,
    /// Unweighted mean of agent confidences, in [0, 1].
    pub confidence: f64,
    /// All issues, concatenated in check order.
    pub issues: Vec<String>,
    pub agents: Vec<AgentResult>,
    pub total_elapsed_ms: u64,
}

impl FinalDecision {
    /// Fold agent results by precedence: any error rejects; any flag or a
    /// mean confidence below `min_mean_confidence` flags; otherwise
    /// approved.
    pub fn from_agents(agents: Vec<AgentResult>, min_mean_confidence: f64) -> Self {
        let mean = if agents.is_empty() {
            0.0
        } else {
            agents.iter().map(|a| a.confidence).sum::<f64>() / agents.len() as f64
        };

        let status = if agents.iter().any(|a| a.status == CheckStatus::Error) {
            DecisionStatus::Rejected
        } else if agents.iter().any(|a| a.status == CheckStatus::Flagged)
            || mean < min_mean_confidence
        {
            DecisionStatus::Flagged
        } else {
            DecisionStatus::Approved
        };

        let issues = agents.iter().flat_map(|a| a.issues.clone()).collect();
        let total_elapsed_ms = agents.iter().map(|a| a.elapsed_ms).sum();

        Self {
            status,
            confidence: mean,
            issues,
            agents,
            total_elapsed_ms,
        }
    }

    /// Degraded decision synthesized when the orchestrator itself fails.
    pub fn degraded(error: &ReviewError) -> Self {
        Self {
            status: DecisionStatus::Rejected,
            confidence: 0.0,
            issues: vec![error.to_string()],
            agents: vec![AgentResult {
                agent: "orchestrator",
                status: CheckStatus::Error,
                confidence: 0.0,
                summary: error.to_string(),
                issues: vec![error.to_string()],
                elapsed_ms: 0,
            }],
            total_elapsed_ms: 0,
        }
    }
}
