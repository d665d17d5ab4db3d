//! Aggregate statistics over one batch of (candidate, verdict) pairs.

use crewcomp_core::{CandidateClaim, Recommendation, Verdict, VerdictSource};
use serde::Serialize;

/// Observability counters for one validation batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub auto_approve: usize,
    pub manual_review: usize,
    pub reject: usize,
    pub fallback_used: usize,
    pub mean_confidence: f64,
}

impl BatchStats {
    pub fn from_pairs(pairs: &[(CandidateClaim, Verdict)]) -> Self {
        let mut stats = Self {
            total: pairs.len(),
            ..Self::default()
        };
        if pairs.is_empty() {
            return stats;
        }

        let mut confidence_sum = 0.0;
        for (_, verdict) in pairs {
            if verdict.is_valid {
                stats.valid += 1;
            } else {
                stats.invalid += 1;
            }
            match verdict.recommendation {
                Recommendation::AutoApprove => stats.auto_approve += 1,
                Recommendation::ManualReview => stats.manual_review += 1,
                Recommendation::Reject => stats.reject += 1,
            }
            if verdict.source == VerdictSource::Fallback {
                stats.fallback_used += 1;
            }
            confidence_sum += verdict.confidence;
        }
        stats.mean_confidence = confidence_sum / pairs.len() as f64;
        stats
    }

    /// Share of verdicts produced by the local fallback, in [0, 1].
    pub fn fallback_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.fallback_used as f64 / self.total as f64
        }
    }
}
