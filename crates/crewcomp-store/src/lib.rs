//! Storage boundary: the durable store is an external collaborator, seen
//! here only through the [`TripSource`] and [`ClaimStore`] traits.

mod error;
mod memory;
mod traits;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use traits::{ClaimStore, TripSource};
