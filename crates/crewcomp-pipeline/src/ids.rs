//! Claim identifier generation.

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Hard cap on generated identifier length.
pub const CLAIM_ID_MAX_LEN: usize = 24;

const SUFFIX_LEN: usize = 4;

/// Fresh, collision-resistant claim id: `CLM-<unix millis>-<4 random
/// alphanumerics>`, truncated to [`CLAIM_ID_MAX_LEN`].
pub fn generate_claim_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect();
    let mut id = format!("CLM-{millis}-{suffix}");
    id.truncate(CLAIM_ID_MAX_LEN);
    id
}
