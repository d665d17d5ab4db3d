//! Decode a reasoning-service answer into a [`Verdict`].
//!
//! The service is asked for raw JSON but routinely wraps it in a fenced
//! code block or surrounds it with prose; both are tolerated. Schema
//! mismatches are errors (the caller falls back), while missing optional
//! fields are defaulted from the candidate's own prior.

use crewcomp_core::{CandidateClaim, Recommendation, Verdict, VerdictSource, clamp_confidence};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("no JSON object in response")]
    NoJsonObject,
    #[error("verdict schema mismatch: {0}")]
    Schema(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct RawVerdict {
    is_valid: Option<bool>,
    confidence: Option<f64>,
    recommendation: Option<String>,
    reasoning: Option<String>,
    #[serde(default)]
    contract_references: Vec<String>,
}

/// Decode free text from the reasoning service into a verdict for
/// `candidate`. Missing fields default to the candidate's prior confidence
/// and manual review.
pub fn decode_verdict(text: &str, candidate: &CandidateClaim) -> Result<Verdict, DecodeError> {
    let body = strip_code_fence(text);
    let json = extract_json_object(body).ok_or(DecodeError::NoJsonObject)?;
    let raw: RawVerdict = serde_json::from_str(json)?;

    let recommendation = raw
        .recommendation
        .as_deref()
        .and_then(parse_recommendation)
        .unwrap_or(Recommendation::ManualReview);

    Ok(Verdict {
        is_valid: raw.is_valid.unwrap_or(true),
        confidence: clamp_confidence(raw.confidence.unwrap_or(candidate.prior_confidence)),
        recommendation,
        reasoning: raw.reasoning.unwrap_or_default(),
        contract_references: raw.contract_references,
        source: VerdictSource::Reasoning,
    })
}

/// Strip one surrounding fenced code block (``` or ```json) if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after_fence = &trimmed[open + 3..];
    // Skip an info string like "json" up to the end of the fence line.
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Slice from the first `{` to the last `}` inclusive.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_recommendation(s: &str) -> Option<Recommendation> {
    match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "auto_approve" | "approve" => Some(Recommendation::AutoApprove),
        "manual_review" | "review" => Some(Recommendation::ManualReview),
        "reject" | "deny" => Some(Recommendation::Reject),
        _ => None,
    }
}
