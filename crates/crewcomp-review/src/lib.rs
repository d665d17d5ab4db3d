//! Decision orchestrator: runs a fixed, ordered sequence of review checks
//! over one submitted claim and folds their results into a single
//! adjudicated decision. Independent of the detection pipeline; consumes
//! the same confidence-to-action idea at claim-review time.

mod agent;
mod checks;
mod orchestrator;

pub use agent::{AgentResult, CheckStatus, DecisionStatus, FinalDecision, ReviewContext, ReviewError};
pub use checks::{CheckFn, DEFAULT_CHECKS, check_amount, check_compliance, check_eligibility};
pub use orchestrator::{review_claim, review_with_checks};
