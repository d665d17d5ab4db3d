//! Pipeline driver: discovers unprocessed completed trips and runs each
//! through detection, validation, and persistence, with at-most-once
//! processing per trip enforced by the discovery predicate.

mod ids;
mod monitor;
mod notify;
mod schedule;

pub use ids::{CLAIM_ID_MAX_LEN, generate_claim_id};
pub use monitor::CompletionMonitor;
pub use notify::{ClaimEvent, NoopNotifier, Notifier, NotifyError, RecordingNotifier};
pub use schedule::start_scheduled;
