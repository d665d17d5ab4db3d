//! Run the fixed check sequence and fold the results.
//!
//! The "graph" is a single linear path — an ordered slice of check
//! functions — folded into one decision. The caller never sees an error:
//! a check failure synthesizes a degraded rejected decision instead.

use std::time::Instant;

use crewcomp_core::ReviewConfig;
use tracing::{info, warn};

use crate::agent::{AgentResult, FinalDecision, ReviewContext, ReviewError};
use crate::checks::{CheckFn, DEFAULT_CHECKS};

/// Adjudicate one submitted claim through the default check sequence.
pub fn review_claim(ctx: &ReviewContext, cfg: &ReviewConfig) -> FinalDecision {
    review_with_checks(DEFAULT_CHECKS, ctx, cfg)
}

/// Adjudicate with an explicit check sequence (the default shape never
/// varies at runtime; this seam exists so each node is testable alone).
pub fn review_with_checks(
    checks: &[(&'static str, CheckFn)],
    ctx: &ReviewContext,
    cfg: &ReviewConfig,
) -> FinalDecision {
    match run_checks(checks, ctx, cfg) {
        Ok(agents) => {
            let decision = FinalDecision::from_agents(agents, cfg.min_mean_confidence);
            info!(
                claim_id = %ctx.claim.claim_id,
                status = decision.status.as_str(),
                confidence = decision.confidence,
                issues = decision.issues.len(),
                "claim review complete"
            );
            decision
        }
        Err(err) => {
            warn!(claim_id = %ctx.claim.claim_id, error = %err, "review degraded");
            FinalDecision::degraded(&err)
        }
    }
}

fn run_checks(
    checks: &[(&'static str, CheckFn)],
    ctx: &ReviewContext,
    cfg: &ReviewConfig,
) -> Result<Vec<AgentResult>, ReviewError> {
    let mut agents = Vec::with_capacity(checks.len());
    for &(name, check) in checks {
        let started = Instant::now();
        let mut result = check(ctx, cfg).map_err(|err| match err {
            ReviewError::CheckFailed { message, .. } => ReviewError::CheckFailed {
                check: name,
                message,
            },
        })?;
        result.elapsed_ms = started.elapsed().as_millis() as u64;
        agents.push(result);
    }
    Ok(agents)
}
