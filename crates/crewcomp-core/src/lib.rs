pub mod claim;
pub mod config;
pub mod trip;

pub use claim::{
    CandidateClaim, ClaimStatus, EntitlementType, Evidence, PersistedClaim, Recommendation,
    RunResult, Verdict, VerdictSource, clamp_confidence, round_cents,
};
pub use config::{DetectorConfig, FallbackConfig, PipelineConfig, ReviewConfig};
pub use trip::Trip;
