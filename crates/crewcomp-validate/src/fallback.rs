//! Deterministic local validation used when the reasoning service is
//! unavailable or returns unusable output. Pure: no I/O, no clock, no
//! randomness, so verdicts are reproducible from the candidate alone.

use crewcomp_core::{
    CandidateClaim, FallbackConfig, Recommendation, Verdict, VerdictSource, clamp_confidence,
};

const FALLBACK_TAG: &str = "Fallback validation (AI unavailable)";

/// Validate a candidate from local rules alone.
pub fn fallback_validate(candidate: &CandidateClaim, cfg: &FallbackConfig) -> Verdict {
    if candidate.amount <= 0.0 {
        return Verdict {
            is_valid: false,
            confidence: 0.0,
            recommendation: Recommendation::Reject,
            reasoning: format!("{FALLBACK_TAG}: non-positive amount ${:.2}", candidate.amount),
            contract_references: Vec::new(),
            source: VerdictSource::Fallback,
        };
    }

    if candidate.amount > cfg.high_value_threshold {
        return Verdict {
            is_valid: true,
            confidence: clamp_confidence(
                candidate.prior_confidence.min(cfg.high_value_confidence_cap),
            ),
            recommendation: Recommendation::ManualReview,
            reasoning: format!(
                "{FALLBACK_TAG}: amount ${:.2} exceeds high-value threshold ${:.2}",
                candidate.amount, cfg.high_value_threshold,
            ),
            contract_references: Vec::new(),
            source: VerdictSource::Fallback,
        };
    }

    let prior = candidate.prior_confidence;
    let (confidence, recommendation, detail) = if prior >= cfg.auto_approve_confidence {
        (prior, Recommendation::AutoApprove, "high detector confidence")
    } else if prior >= cfg.review_confidence {
        (prior, Recommendation::ManualReview, "moderate detector confidence")
    } else {
        (
            prior * cfg.low_trust_factor,
            Recommendation::ManualReview,
            "low detector confidence",
        )
    };

    Verdict {
        is_valid: true,
        confidence: clamp_confidence(confidence),
        recommendation,
        reasoning: format!("{FALLBACK_TAG}: {detail} ({prior:.0})"),
        contract_references: Vec::new(),
        source: VerdictSource::Fallback,
    }
}
