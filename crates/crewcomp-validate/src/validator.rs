//! The validator: one verdict per candidate, reasoning service first,
//! deterministic fallback on any failure.

use std::sync::Arc;

use crewcomp_core::{CandidateClaim, FallbackConfig, Trip, Verdict};
use tracing::{debug, warn};

use crate::batch::BatchStats;
use crate::client::ReasoningClient;
use crate::fallback::fallback_validate;
use crate::prompt::{SYSTEM_PROMPT, build_user_prompt};
use crate::verdict::decode_verdict;

pub struct Validator {
    client: Arc<dyn ReasoningClient>,
    fallback: FallbackConfig,
}

impl Validator {
    pub fn new(client: Arc<dyn ReasoningClient>, fallback: FallbackConfig) -> Self {
        Self { client, fallback }
    }

    /// Validate one candidate against its source trip. Infallible: any
    /// service or decode failure yields the local fallback verdict instead.
    pub async fn validate(&self, candidate: &CandidateClaim, trip: &Trip) -> Verdict {
        let user = build_user_prompt(candidate, trip);
        let answer = match self.client.assess(SYSTEM_PROMPT, &user).await {
            Ok(text) => text,
            Err(err) => {
                warn!(
                    trip_id = %trip.trip_id,
                    entitlement = %candidate.entitlement,
                    error = %err,
                    "reasoning service unavailable, using fallback validation"
                );
                return fallback_validate(candidate, &self.fallback);
            }
        };

        match decode_verdict(&answer, candidate) {
            Ok(verdict) => {
                debug!(
                    trip_id = %trip.trip_id,
                    entitlement = %candidate.entitlement,
                    confidence = verdict.confidence,
                    recommendation = verdict.recommendation.as_str(),
                    "verdict decoded"
                );
                verdict
            }
            Err(err) => {
                warn!(
                    trip_id = %trip.trip_id,
                    entitlement = %candidate.entitlement,
                    error = %err,
                    "unusable reasoning output, using fallback validation"
                );
                fallback_validate(candidate, &self.fallback)
            }
        }
    }

    /// Validate a batch sequentially, preserving candidate order.
    ///
    /// One verdict per candidate is guaranteed: a failing validation falls
    /// back independently and never aborts the batch.
    pub async fn validate_all(
        &self,
        candidates: &[CandidateClaim],
        trip: &Trip,
    ) -> (Vec<(CandidateClaim, Verdict)>, BatchStats) {
        let mut pairs = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let verdict = self.validate(candidate, trip).await;
            pairs.push((candidate.clone(), verdict));
        }
        let stats = BatchStats::from_pairs(&pairs);
        debug!(
            trip_id = %trip.trip_id,
            total = stats.total,
            auto_approve = stats.auto_approve,
            fallback = stats.fallback_used,
            "batch validation complete"
        );
        (pairs, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StubReasoningClient;
    use chrono::{NaiveDate, TimeZone, Utc};
    use crewcomp_core::{EntitlementType, Evidence, Recommendation, VerdictSource};

    fn trip() -> Trip {
        Trip {
            trip_id: "T100".into(),
            trip_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            origin: "DEN".into(),
            destination: "ORD".into(),
            scheduled_departure: Utc.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap(),
            scheduled_arrival: Utc.with_ymd_and_hms(2025, 6, 10, 12, 30, 0).unwrap(),
            actual_departure: None,
            actual_arrival: None,
            block_hours: 3.5,
            flight_time_hours: 3.2,
            credit_hours: 3.5,
            is_international: false,
            crew_id: "C42".into(),
            completed: true,
        }
    }

    fn candidate(prior: f64) -> CandidateClaim {
        CandidateClaim {
            crew_id: "C42".into(),
            entitlement: EntitlementType::PerDiem,
            trip_id: "T100".into(),
            amount: 42.5,
            description: "Per diem".into(),
            method: "per_diem_v1".into(),
            prior_confidence: prior,
            evidence: Evidence::new(),
        }
    }

    fn validator(client: StubReasoningClient) -> Validator {
        Validator::new(Arc::new(client), FallbackConfig::default())
    }

    #[tokio::test]
    async fn service_verdict_passes_through() {
        let v = validator(StubReasoningClient::replying(
            r#"{"is_valid": true, "confidence": 97, "recommendation": "auto_approve",
                "reasoning": "ok", "contract_references": ["5.A"]}"#,
        ));
        let verdict = v.validate(&candidate(92.0), &trip()).await;
        assert_eq!(verdict.source, VerdictSource::Reasoning);
        assert_eq!(verdict.recommendation, Recommendation::AutoApprove);
        assert_eq!(verdict.confidence, 97.0);
    }

    #[tokio::test]
    async fn network_failure_with_high_prior_auto_approves_via_fallback() {
        let v = validator(StubReasoningClient::failing("connection reset"));
        let verdict = v.validate(&candidate(97.0), &trip()).await;
        assert_eq!(verdict.source, VerdictSource::Fallback);
        assert_eq!(verdict.recommendation, Recommendation::AutoApprove);
        assert!(verdict.reasoning.contains("Fallback validation (AI unavailable)"));
    }

    #[tokio::test]
    async fn garbage_output_falls_back() {
        let v = validator(StubReasoningClient::replying("no json here"));
        let verdict = v.validate(&candidate(85.0), &trip()).await;
        assert_eq!(verdict.source, VerdictSource::Fallback);
        assert_eq!(verdict.recommendation, Recommendation::ManualReview);
    }

    #[tokio::test]
    async fn batch_yields_one_verdict_per_candidate_despite_failures() {
        // Second call fails, first and third succeed.
        let v = validator(StubReasoningClient::with_script(vec![
            Ok(r#"{"confidence": 96, "recommendation": "auto_approve"}"#.into()),
            Err("timeout".into()),
            Ok(r#"{"confidence": 40, "recommendation": "reject", "is_valid": false}"#.into()),
        ]));
        let candidates = vec![candidate(92.0), candidate(97.0), candidate(60.0)];
        let (pairs, stats) = v.validate_all(&candidates, &trip()).await;

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].1.source, VerdictSource::Reasoning);
        assert_eq!(pairs[1].1.source, VerdictSource::Fallback);
        assert_eq!(pairs[2].1.recommendation, Recommendation::Reject);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.fallback_used, 1);
        assert_eq!(stats.auto_approve, 2); // service verdict + fallback on prior 97
        assert_eq!(stats.reject, 1);
    }

    #[tokio::test]
    async fn batch_preserves_candidate_order() {
        let v = validator(StubReasoningClient::failing("down"));
        let mut candidates = Vec::new();
        for prior in [90.0, 70.0, 96.0] {
            candidates.push(candidate(prior));
        }
        let (pairs, _) = v.validate_all(&candidates, &trip()).await;
        let priors: Vec<f64> = pairs.iter().map(|(c, _)| c.prior_confidence).collect();
        assert_eq!(priors, vec![90.0, 70.0, 96.0]);
    }
}
