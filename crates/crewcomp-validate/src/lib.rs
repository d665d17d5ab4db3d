//! Validation layer: asks the external reasoning service to assess each
//! candidate claim against the contract-rules corpus, and falls back to a
//! deterministic local ruleset when the service is unavailable or returns
//! unusable output.

mod batch;
mod client;
mod fallback;
mod prompt;
mod validator;
mod verdict;

pub use batch::BatchStats;
pub use client::{
    HttpReasoningClient, ReasoningClient, ReasoningConfig, ReasoningError, StubReasoningClient,
};
pub use fallback::fallback_validate;
pub use prompt::{RULES_CORPUS, SYSTEM_PROMPT, build_user_prompt};
pub use validator::Validator;
pub use verdict::{DecodeError, decode_verdict};
