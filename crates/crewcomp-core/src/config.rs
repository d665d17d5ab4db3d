//! Tunable rates and thresholds for detection, fallback validation, the
//! completion monitor, and post-submission review.
//!
//! Defaults are the production contract values; tests construct variants
//! explicitly where a different cutoff is under test.

use serde::{Deserialize, Serialize};

/// Contract rates and thresholds used by the entitlement detectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Hours added before scheduled departure for duty-period start.
    pub check_in_hours: f64,
    /// Hours added after scheduled arrival for duty-period end.
    pub check_out_hours: f64,
    /// Per-diem rate per hour away from base, domestic trips.
    pub per_diem_domestic_rate: f64,
    /// Per-diem rate per hour away from base, international trips.
    pub per_diem_international_rate: f64,
    /// Candidates below this amount are suppressed as immaterial.
    pub minimum_claim_amount: f64,
    /// International override: dollars per block hour.
    pub international_hourly_rate: f64,
    /// International override: floor payment.
    pub international_minimum: f64,
    /// Extended duty: first threshold in hours (pays 2x beyond it).
    pub duty_threshold_hours: f64,
    /// Extended duty: second threshold in hours (pays 3x beyond it).
    pub duty_extended_threshold_hours: f64,
    /// Base hourly rate for premium pay (extended duty, holiday).
    pub base_hourly_rate: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            check_in_hours: 1.0,
            check_out_hours: 0.5,
            per_diem_domestic_rate: 2.70,
            per_diem_international_rate: 3.50,
            minimum_claim_amount: 10.0,
            international_hourly_rate: 3.25,
            international_minimum: 125.0,
            duty_threshold_hours: 12.5,
            duty_extended_threshold_hours: 16.0,
            base_hourly_rate: 50.0,
        }
    }
}

/// Cutoffs for the deterministic local fallback used when the reasoning
/// service is unavailable or returns unusable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Amounts above this always go to manual review.
    pub high_value_threshold: f64,
    /// Confidence cap applied to high-value claims.
    pub high_value_confidence_cap: f64,
    /// Prior confidence at or above this auto-approves.
    pub auto_approve_confidence: f64,
    /// Prior confidence at or above this keeps full trust in review.
    pub review_confidence: f64,
    /// Trust multiplier applied below the review cutoff.
    pub low_trust_factor: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: 1000.0,
            high_value_confidence_cap: 85.0,
            auto_approve_confidence: 95.0,
            review_confidence: 80.0,
            low_trust_factor: 0.9,
        }
    }
}

/// Completion-monitor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Discovery window: completed trips within the last N days.
    pub discovery_window_days: u32,
    /// Scheduled-processing tick interval in minutes.
    pub interval_minutes: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            discovery_window_days: 30,
            interval_minutes: 60,
        }
    }
}

/// Thresholds for the post-submission decision orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Claims must be filed within this many days of the trip date.
    pub filing_window_days: i64,
    /// Relative tolerance when re-deriving an expected amount.
    pub amount_tolerance: f64,
    /// Absolute ceiling on any single claim amount.
    pub max_claim_amount: f64,
    /// Flag crews with more than this many claims in the lookback window.
    pub max_claims_per_crew: usize,
    /// Mean agent confidence below this flags the decision.
    pub min_mean_confidence: f64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            filing_window_days: 90,
            amount_tolerance: 0.25,
            max_claim_amount: 5000.0,
            max_claims_per_crew: 20,
            min_mean_confidence: 0.7,
        }
    }
}
