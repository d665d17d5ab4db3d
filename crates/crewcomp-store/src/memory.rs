//! In-process store used by tests and the CLI demo path.
//!
//! Discovery applies the same predicate a SQL `NOT EXISTS` would: completed
//! trips inside the window with no auto-generated claim for the trip.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Days, Utc};
use crewcomp_core::{PersistedClaim, Trip};
use tracing::info;

use crate::{ClaimStore, StoreError, TripSource};

#[derive(Default)]
struct Inner {
    trips: Vec<Trip>,
    claims: Vec<PersistedClaim>,
}

/// Mutex-guarded in-memory implementation of both store traits.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a batch of trips, replacing nothing (append-only).
    pub fn load_trips(&self, trips: Vec<Trip>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        info!(count = trips.len(), "loaded trips into memory store");
        inner.trips.extend(trips);
    }

    /// Insert a claim row directly, bypassing the pipeline (used to seed
    /// human-submitted claims for review).
    pub fn seed_claim(&self, claim: PersistedClaim) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.claims.push(claim);
    }

    pub fn trip_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).trips.len()
    }

    pub fn claim_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).claims.len()
    }

    pub fn all_claims(&self) -> Vec<PersistedClaim> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .claims
            .clone()
    }
}

#[async_trait]
impl TripSource for MemoryStore {
    async fn unprocessed_trips(&self, window_days: u32) -> Result<Vec<Trip>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let cutoff = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(window_days as u64));

        let trips = inner
            .trips
            .iter()
            .filter(|t| t.completed)
            .filter(|t| cutoff.is_none_or(|c| t.trip_date >= c))
            .filter(|t| {
                !inner
                    .claims
                    .iter()
                    .any(|c| c.trip_id == t.trip_id && c.auto_generated)
            })
            .cloned()
            .collect();
        Ok(trips)
    }

    async fn trip(&self, trip_id: &str) -> Result<Option<Trip>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.trips.iter().find(|t| t.trip_id == trip_id).cloned())
    }
}

#[async_trait]
impl ClaimStore for MemoryStore {
    async fn insert_claim(&self, claim: PersistedClaim) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.claims.iter().any(|c| c.claim_id == claim.claim_id) {
            return Err(StoreError::DuplicateClaim(claim.claim_id));
        }
        inner.claims.push(claim);
        Ok(())
    }

    async fn claim(&self, claim_id: &str) -> Result<Option<PersistedClaim>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.claims.iter().find(|c| c.claim_id == claim_id).cloned())
    }

    async fn claims_for_trip(&self, trip_id: &str) -> Result<Vec<PersistedClaim>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .claims
            .iter()
            .filter(|c| c.trip_id == trip_id)
            .cloned()
            .collect())
    }

    async fn claims_for_crew(&self, crew_id: &str) -> Result<Vec<PersistedClaim>, StoreError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner
            .claims
            .iter()
            .filter(|c| c.crew_id == crew_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Days, TimeZone, Utc};
    use crewcomp_core::{ClaimStatus, EntitlementType, Evidence};

    fn recent_trip(trip_id: &str, days_ago: u64, completed: bool) -> Trip {
        let date = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(days_ago))
            .unwrap();
        let dep: DateTime<Utc> = Utc
            .from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap());
        Trip {
            trip_id: trip_id.into(),
            trip_date: date,
            origin: "DEN".into(),
            destination: "ORD".into(),
            scheduled_departure: dep,
            scheduled_arrival: dep + chrono::Duration::hours(4),
            actual_departure: None,
            actual_arrival: None,
            block_hours: 3.5,
            flight_time_hours: 3.2,
            credit_hours: 3.5,
            is_international: false,
            crew_id: "C42".into(),
            completed,
        }
    }

    fn auto_claim(trip_id: &str, claim_id: &str) -> PersistedClaim {
        PersistedClaim {
            claim_id: claim_id.into(),
            crew_id: "C42".into(),
            entitlement: EntitlementType::PerDiem,
            trip_id: trip_id.into(),
            amount: 20.0,
            description: "Per diem".into(),
            status: ClaimStatus::Approved,
            auto_generated: true,
            evidence: Evidence::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn discovery_excludes_incomplete_and_stale_trips() {
        let store = MemoryStore::new();
        store.load_trips(vec![
            recent_trip("T1", 1, true),
            recent_trip("T2", 1, false),
            recent_trip("T3", 45, true),
        ]);
        let found = store.unprocessed_trips(30).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|t| t.trip_id.as_str()).collect();
        assert_eq!(ids, vec!["T1"]);
    }

    #[tokio::test]
    async fn discovery_excludes_trips_with_auto_generated_claims() {
        let store = MemoryStore::new();
        store.load_trips(vec![recent_trip("T1", 1, true), recent_trip("T2", 1, true)]);
        store.insert_claim(auto_claim("T1", "CLM-1")).await.unwrap();

        let found = store.unprocessed_trips(30).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|t| t.trip_id.as_str()).collect();
        assert_eq!(ids, vec!["T2"]);
    }

    #[tokio::test]
    async fn human_submitted_claims_do_not_block_discovery() {
        let store = MemoryStore::new();
        store.load_trips(vec![recent_trip("T1", 1, true)]);
        let mut manual = auto_claim("T1", "CLM-M");
        manual.auto_generated = false;
        store.seed_claim(manual);

        let found = store.unprocessed_trips(30).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_claim_id_rejected() {
        let store = MemoryStore::new();
        store.insert_claim(auto_claim("T1", "CLM-1")).await.unwrap();
        let err = store.insert_claim(auto_claim("T2", "CLM-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateClaim(_)));
    }

    #[tokio::test]
    async fn lookup_by_trip_and_crew() {
        let store = MemoryStore::new();
        store.insert_claim(auto_claim("T1", "CLM-1")).await.unwrap();
        store.insert_claim(auto_claim("T1", "CLM-2")).await.unwrap();
        store.insert_claim(auto_claim("T2", "CLM-3")).await.unwrap();

        assert_eq!(store.claims_for_trip("T1").await.unwrap().len(), 2);
        assert_eq!(store.claims_for_crew("C42").await.unwrap().len(), 3);
        assert!(store.claim("CLM-3").await.unwrap().is_some());
        assert!(store.claim("CLM-9").await.unwrap().is_none());
    }
}
