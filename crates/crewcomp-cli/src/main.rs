use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crewcomp_core::{
    DetectorConfig, FallbackConfig, PersistedClaim, PipelineConfig, ReviewConfig, RunResult, Trip,
};
use crewcomp_pipeline::{CompletionMonitor, NoopNotifier, start_scheduled};
use crewcomp_review::{ReviewContext, review_claim};
use crewcomp_store::{ClaimStore, MemoryStore, TripSource};
use crewcomp_validate::{
    HttpReasoningClient, ReasoningClient, ReasoningConfig, StubReasoningClient, Validator,
};

#[derive(Parser)]
#[command(name = "crewcomp", version, about = "Crew-pay entitlement detection and adjudication")]
struct Cli {
    /// OpenAI-compatible reasoning service base URL. Without it, validation
    /// runs on the deterministic local fallback.
    #[arg(long, env = "CREWCOMP_REASONING_URL")]
    reasoning_url: Option<String>,

    #[arg(long, env = "CREWCOMP_REASONING_MODEL", default_value = "gpt-4o-mini")]
    reasoning_model: String,

    #[arg(long, env = "CREWCOMP_REASONING_API_KEY")]
    reasoning_api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// One processing pass over trips loaded from a JSON file.
    Run {
        /// JSON array of trip records.
        #[arg(long)]
        trips: PathBuf,
    },
    /// Immediate run, then repeat on a fixed interval.
    Watch {
        #[arg(long)]
        trips: PathBuf,
        /// Minutes between passes.
        #[arg(long, default_value_t = 60)]
        interval: u64,
    },
    /// Adjudicate one existing claim through the review checks.
    Review {
        #[arg(long)]
        trips: PathBuf,
        /// JSON array of claim rows to seed (e.g. human submissions).
        #[arg(long)]
        claims: Option<PathBuf>,
        /// Claim id to review.
        #[arg(long)]
        claim: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let reasoning: Arc<dyn ReasoningClient> = match &cli.reasoning_url {
        Some(url) => Arc::new(HttpReasoningClient::new(ReasoningConfig {
            base_url: url.clone(),
            model: cli.reasoning_model.clone(),
            api_key: cli.reasoning_api_key.clone(),
            timeout_seconds: 30,
        })?),
        None => {
            tracing::info!("no reasoning service configured, using fallback validation");
            Arc::new(StubReasoningClient::failing("no reasoning service configured"))
        }
    };

    match cli.command {
        Command::Run { trips } => {
            let store = load_store(&trips, None)?;
            let monitor = monitor(store, reasoning);
            let run = monitor.trigger_manual().await;
            print_run(&run);
        }
        Command::Watch { trips, interval } => {
            let store = load_store(&trips, None)?;
            let monitor = Arc::new(monitor(store, reasoning));
            let handle = start_scheduled(monitor, interval);
            handle.await?;
        }
        Command::Review { trips, claims, claim } => {
            let store = load_store(&trips, claims.as_deref())?;
            let ctx = review_context(&store, &claim).await?;
            let decision = review_claim(&ctx, &ReviewConfig::default());
            println!(
                "claim {} -> {} (confidence {:.2}, {} ms)",
                claim,
                decision.status.as_str(),
                decision.confidence,
                decision.total_elapsed_ms
            );
            for agent in &decision.agents {
                println!("  [{}] {}: {}", agent.status.as_str(), agent.agent, agent.summary);
            }
            for issue in &decision.issues {
                println!("  issue: {issue}");
            }
        }
    }

    Ok(())
}

fn load_store(trips: &Path, claims: Option<&Path>) -> anyhow::Result<Arc<MemoryStore>> {
    let store = Arc::new(MemoryStore::new());

    let raw = std::fs::read_to_string(trips)
        .with_context(|| format!("reading trips from {}", trips.display()))?;
    let trips: Vec<Trip> = serde_json::from_str(&raw).context("parsing trip JSON")?;
    store.load_trips(trips);

    if let Some(path) = claims {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading claims from {}", path.display()))?;
        let rows: Vec<PersistedClaim> = serde_json::from_str(&raw).context("parsing claim JSON")?;
        for row in rows {
            store.seed_claim(row);
        }
    }

    Ok(store)
}

fn monitor(store: Arc<MemoryStore>, reasoning: Arc<dyn ReasoningClient>) -> CompletionMonitor {
    CompletionMonitor::new(
        store.clone(),
        store,
        Validator::new(reasoning, FallbackConfig::default()),
        Arc::new(NoopNotifier),
        DetectorConfig::default(),
        PipelineConfig::default(),
    )
}

async fn review_context(store: &MemoryStore, claim_id: &str) -> anyhow::Result<ReviewContext> {
    let claim = store
        .claim(claim_id)
        .await?
        .with_context(|| format!("claim {claim_id} not found"))?;
    let trip = store.trip(&claim.trip_id).await?;
    let prior_claims = store
        .claims_for_crew(&claim.crew_id)
        .await?
        .into_iter()
        .filter(|c| c.claim_id != claim.claim_id)
        .collect();
    Ok(ReviewContext {
        claim,
        trip,
        prior_claims,
    })
}

fn print_run(run: &RunResult) {
    println!(
        "trips processed: {}\nclaims detected: {}\napproved: {} (${:.2})\npending review: {}\nrejected: {}",
        run.trips_processed,
        run.claims_detected,
        run.claims_approved,
        run.total_approved_amount,
        run.claims_review,
        run.claims_rejected,
    );
    if !run.errors.is_empty() {
        println!("errors:");
        for err in &run.errors {
            println!("  {err}");
        }
    }
}
