//! The completion monitor: one `run()` discovers unprocessed trips and
//! drives each through detection, validation, and persistence.
//!
//! Re-invocation converges because discovery excludes trips that already
//! carry an auto-generated claim. There is no cross-invocation lock: two
//! runs discovering the same trip in the same instant can both claim it,
//! which the store's own constraints may or may not prevent.

use std::sync::Arc;

use chrono::Utc;
use crewcomp_core::{
    CandidateClaim, ClaimStatus, DetectorConfig, PersistedClaim, PipelineConfig, Recommendation,
    RunResult, Trip, Verdict,
};
use crewcomp_detect::detect_all;
use crewcomp_store::{ClaimStore, StoreError, TripSource};
use crewcomp_validate::Validator;
use tracing::{error, info, warn};

use crate::ids::generate_claim_id;
use crate::notify::{ClaimEvent, Notifier};

pub struct CompletionMonitor {
    trips: Arc<dyn TripSource>,
    claims: Arc<dyn ClaimStore>,
    validator: Validator,
    notifier: Arc<dyn Notifier>,
    detector_config: DetectorConfig,
    config: PipelineConfig,
}

impl CompletionMonitor {
    pub fn new(
        trips: Arc<dyn TripSource>,
        claims: Arc<dyn ClaimStore>,
        validator: Validator,
        notifier: Arc<dyn Notifier>,
        detector_config: DetectorConfig,
        config: PipelineConfig,
    ) -> Self {
        Self {
            trips,
            claims,
            validator,
            notifier,
            detector_config,
            config,
        }
    }

    /// One full pass: discover, then process every discovered trip.
    ///
    /// Never returns an error. A discovery failure is recorded as a single
    /// fatal entry and the zero-count result is returned; a failure inside
    /// one trip is recorded per-trip and the run continues.
    pub async fn run(&self) -> RunResult {
        let mut run = RunResult::begin(Utc::now());

        let trips = match self
            .trips
            .unprocessed_trips(self.config.discovery_window_days)
            .await
        {
            Ok(trips) => trips,
            Err(err) => {
                error!(error = %err, "trip discovery failed");
                run.errors.push(format!("discovery failed: {err}"));
                run.finish(Utc::now());
                return run;
            }
        };

        info!(count = trips.len(), "discovered unprocessed trips");
        for trip in &trips {
            match self.process_trip(trip, &mut run).await {
                Ok(()) => run.trips_processed += 1,
                Err(err) => run.record_trip_error(&trip.trip_id, err),
            }
        }

        run.finish(Utc::now());
        info!(
            trips = run.trips_processed,
            detected = run.claims_detected,
            approved = run.claims_approved,
            review = run.claims_review,
            rejected = run.claims_rejected,
            approved_amount = run.total_approved_amount,
            errors = run.errors.len(),
            "completion monitor run finished"
        );
        run
    }

    /// Manual trigger surface: identical to one [`run`](Self::run).
    pub async fn trigger_manual(&self) -> RunResult {
        self.run().await
    }

    async fn process_trip(&self, trip: &Trip, run: &mut RunResult) -> Result<(), StoreError> {
        let candidates = detect_all(trip, &self.detector_config);
        run.claims_detected += candidates.len() as u32;
        if candidates.is_empty() {
            return Ok(());
        }

        let (pairs, _stats) = self.validator.validate_all(&candidates, trip).await;
        for (candidate, verdict) in pairs {
            self.resolve(&candidate, &verdict, run).await?;
        }
        Ok(())
    }

    /// Apply one verdict: invalid verdicts produce no row at all; valid
    /// verdicts produce a row whose status follows the recommendation.
    async fn resolve(
        &self,
        candidate: &CandidateClaim,
        verdict: &Verdict,
        run: &mut RunResult,
    ) -> Result<(), StoreError> {
        if !verdict.is_valid {
            run.claims_rejected += 1;
            return Ok(());
        }

        let status = match verdict.recommendation {
            Recommendation::AutoApprove => ClaimStatus::Approved,
            Recommendation::ManualReview => ClaimStatus::Pending,
            Recommendation::Reject => ClaimStatus::Rejected,
        };

        let claim =
            PersistedClaim::from_candidate(candidate, generate_claim_id(), status, Utc::now());
        self.claims.insert_claim(claim.clone()).await?;

        match status {
            ClaimStatus::Approved => {
                run.claims_approved += 1;
                run.total_approved_amount += claim.amount;
            }
            ClaimStatus::Pending => run.claims_review += 1,
            ClaimStatus::Rejected => run.claims_rejected += 1,
        }

        let event = ClaimEvent::auto_generated(&claim, Utc::now());
        if let Err(err) = self.notifier.publish(&event).await {
            warn!(claim_id = %claim.claim_id, error = %err, "claim notification failed");
        }
        Ok(())
    }
}
