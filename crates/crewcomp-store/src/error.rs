use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("claim not found: {0}")]
    ClaimNotFound(String),

    #[error("duplicate claim id: {0}")]
    DuplicateClaim(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}
