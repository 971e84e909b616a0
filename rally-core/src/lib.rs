//! Core engine for the rally ecosystem.
//!
//! This crate implements the response history & derived-view engine:
//! - `event` — read-only catalog types owned by the catalog collaborator
//! - `response` — the append-only response log and latest-wins resolution
//! - `calendar` — temporal bucketing of events relative to "now"
//! - `filter` — pure matchers, the single-pass filter pipeline, facet counts
//! - `sync` — optimistic local writes with debounced batch flushing
//! - `view` — publishing derived views to the rendering collaborator

pub mod calendar;
pub mod date_range;
pub mod error;
pub mod event;
pub mod filter;
pub mod response;
pub mod sync;
pub mod view;

// Re-export the catalog types and error alias at crate root for convenience
pub use error::{RallyError, RallyResult};
pub use event::*;
