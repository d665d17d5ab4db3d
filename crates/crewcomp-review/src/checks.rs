//! The three review checks, in their fixed execution order.
//!
//! Each check is a plain function over the review context: independently
//! testable, no shared state, no I/O. Flags are findings for a human;
//! `CheckStatus::Error` is reserved for a check that cannot evaluate at
//! all.

use crewcomp_core::{DetectorConfig, EntitlementType, ReviewConfig};
use crewcomp_detect::{
    detect_extended_duty, detect_holiday_premium, detect_international_override, detect_per_diem,
};

use crate::agent::{AgentResult, CheckStatus, ReviewContext, ReviewError};

pub type CheckFn = fn(&ReviewContext, &ReviewConfig) -> Result<AgentResult, ReviewError>;

/// Fixed review order: eligibility, then amount, then compliance.
pub const DEFAULT_CHECKS: &[(&str, CheckFn)] = &[
    ("eligibility", check_eligibility),
    ("amount", check_amount),
    ("compliance", check_compliance),
];

const APPROVED_CONFIDENCE: f64 = 0.95;
const FLAGGED_CONFIDENCE: f64 = 0.5;

fn finish(agent: &'static str, summary_ok: &str, issues: Vec<String>) -> AgentResult {
    let (status, confidence, summary) = if issues.is_empty() {
        (CheckStatus::Approved, APPROVED_CONFIDENCE, summary_ok.to_string())
    } else {
        (CheckStatus::Flagged, FLAGGED_CONFIDENCE, issues.join("; "))
    };
    AgentResult {
        agent,
        status,
        confidence,
        summary,
        issues,
        elapsed_ms: 0,
    }
}

/// Timing and linkage: the claim must reference a completed trip and be
/// filed inside the contractual window, with no duplicate on record.
pub fn check_eligibility(
    ctx: &ReviewContext,
    cfg: &ReviewConfig,
) -> Result<AgentResult, ReviewError> {
    let mut issues = Vec::new();
    let claim = &ctx.claim;

    match &ctx.trip {
        None => issues.push(format!("source trip {} not found", claim.trip_id)),
        Some(trip) => {
            if !trip.completed {
                issues.push(format!("source trip {} is not completed", trip.trip_id));
            }
            let filed_after_days = (claim.created_at.date_naive() - trip.trip_date).num_days();
            if filed_after_days < 0 {
                issues.push(format!(
                    "claim filed {} days before the trip date",
                    -filed_after_days
                ));
            } else if filed_after_days > cfg.filing_window_days {
                issues.push(format!(
                    "claim filed {filed_after_days} days after the trip, window is {} days",
                    cfg.filing_window_days
                ));
            }
        }
    }

    let duplicate = ctx.prior_claims.iter().any(|other| {
        other.trip_id == claim.trip_id && other.entitlement == claim.entitlement
    });
    if duplicate {
        issues.push(format!(
            "duplicate claim for trip {} entitlement {}",
            claim.trip_id, claim.entitlement
        ));
    }

    Ok(finish("eligibility", "claim is timely and unique", issues))
}

/// Monetary sanity: re-derive the expected amount from the trip and flag
/// deviations beyond tolerance, plus absolute bounds.
pub fn check_amount(ctx: &ReviewContext, cfg: &ReviewConfig) -> Result<AgentResult, ReviewError> {
    let mut issues = Vec::new();
    let claim = &ctx.claim;

    if claim.amount <= 0.0 {
        issues.push(format!("non-positive amount ${:.2}", claim.amount));
    }
    if claim.amount > cfg.max_claim_amount {
        issues.push(format!(
            "amount ${:.2} exceeds the ${:.2} ceiling",
            claim.amount, cfg.max_claim_amount
        ));
    }

    if let Some(trip) = &ctx.trip {
        let detector_cfg = DetectorConfig::default();
        let expected = match claim.entitlement {
            EntitlementType::PerDiem => detect_per_diem(trip, &detector_cfg),
            EntitlementType::InternationalOverride => {
                detect_international_override(trip, &detector_cfg)
            }
            EntitlementType::ExtendedDutyPremium => detect_extended_duty(trip, &detector_cfg),
            EntitlementType::HolidayPremium => detect_holiday_premium(trip, &detector_cfg),
        };

        match expected {
            None => issues.push(format!(
                "trip {} does not support a {} entitlement",
                trip.trip_id, claim.entitlement
            )),
            Some(candidate) if candidate.amount > 0.0 => {
                let deviation = (claim.amount - candidate.amount).abs() / candidate.amount;
                if deviation > cfg.amount_tolerance {
                    issues.push(format!(
                        "amount ${:.2} deviates {:.0}% from expected ${:.2}",
                        claim.amount,
                        deviation * 100.0,
                        candidate.amount
                    ));
                }
            }
            Some(_) => {}
        }
    }

    Ok(finish("amount", "amount is within expected bounds", issues))
}

/// Policy heuristics: suspicious round numbers, excessive claim frequency,
/// and pipeline claims missing their evidence payload.
pub fn check_compliance(
    ctx: &ReviewContext,
    cfg: &ReviewConfig,
) -> Result<AgentResult, ReviewError> {
    let mut issues = Vec::new();
    let claim = &ctx.claim;

    if claim.amount >= 500.0 && claim.amount % 100.0 == 0.0 {
        issues.push(format!("suspiciously round amount ${:.2}", claim.amount));
    }

    let total_claims = ctx.prior_claims.len() + 1;
    if total_claims > cfg.max_claims_per_crew {
        issues.push(format!(
            "crew {} has {total_claims} claims in the lookback window (limit {})",
            claim.crew_id, cfg.max_claims_per_crew
        ));
    }

    if claim.auto_generated && claim.evidence.figures.is_empty() && claim.evidence.notes.is_empty()
    {
        issues.push("auto-generated claim carries no evidence payload".to_string());
    }

    Ok(finish("compliance", "no policy findings", issues))
}
