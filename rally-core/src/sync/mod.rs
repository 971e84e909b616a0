//! Optimistic local writes with debounced batch flushing.

pub mod batch;
pub mod engine;
pub mod store;

pub use batch::{ActionKind, BatchAction};
pub use engine::{DEBOUNCE_WINDOW_SECS, SyncEngine};
pub use store::{BatchAck, CatalogStore, ResponseStore};
