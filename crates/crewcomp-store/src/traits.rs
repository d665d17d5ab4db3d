//! Trait contracts over the durable store.

use async_trait::async_trait;
use crewcomp_core::{PersistedClaim, Trip};

use crate::StoreError;

/// Read side: completed trips eligible for entitlement detection.
#[async_trait]
pub trait TripSource: Send + Sync {
    /// Completed trips within the last `window_days` that carry no
    /// auto-generated claim — the pipeline's idempotency predicate.
    async fn unprocessed_trips(&self, window_days: u32) -> Result<Vec<Trip>, StoreError>;

    async fn trip(&self, trip_id: &str) -> Result<Option<Trip>, StoreError>;
}

/// Write side: adjudicated claim rows. Atomicity is per insert; idempotency
/// is enforced by the caller via the discovery predicate, not by this
/// layer.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    async fn insert_claim(&self, claim: PersistedClaim) -> Result<(), StoreError>;

    async fn claim(&self, claim_id: &str) -> Result<Option<PersistedClaim>, StoreError>;

    async fn claims_for_trip(&self, trip_id: &str) -> Result<Vec<PersistedClaim>, StoreError>;

    async fn claims_for_crew(&self, crew_id: &str) -> Result<Vec<PersistedClaim>, StoreError>;
}
