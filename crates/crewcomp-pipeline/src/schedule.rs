//! Scheduled processing: one immediate run, then a fixed-interval loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::monitor::CompletionMonitor;

/// Spawn the scheduled-processing loop. The first tick fires immediately;
/// every failure is logged, never thrown. The caller owns the handle and
/// aborts it to stop.
pub fn start_scheduled(monitor: Arc<CompletionMonitor>, interval_minutes: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(interval_minutes.max(1) * 60);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let run = monitor.run().await;
            if run.errors.is_empty() {
                info!(
                    trips = run.trips_processed,
                    approved = run.claims_approved,
                    "scheduled processing tick complete"
                );
            } else {
                warn!(
                    trips = run.trips_processed,
                    errors = run.errors.len(),
                    first_error = %run.errors[0],
                    "scheduled processing tick completed with errors"
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewcomp_core::{DetectorConfig, FallbackConfig, PipelineConfig};
    use crewcomp_store::MemoryStore;
    use crewcomp_validate::{StubReasoningClient, Validator};

    use crate::notify::NoopNotifier;

    #[tokio::test(start_paused = true)]
    async fn scheduler_runs_immediately_and_can_be_aborted() {
        let store = Arc::new(MemoryStore::new());
        let monitor = Arc::new(CompletionMonitor::new(
            store.clone(),
            store,
            Validator::new(
                Arc::new(StubReasoningClient::replying("{}")),
                FallbackConfig::default(),
            ),
            Arc::new(NoopNotifier),
            DetectorConfig::default(),
            PipelineConfig::default(),
        ));

        let handle = start_scheduled(monitor, 60);
        // Let the immediate tick run on the paused clock.
        tokio::task::yield_now().await;
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
    }
}
