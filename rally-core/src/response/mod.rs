//! The append-only response log and latest-wins resolution.

pub mod entry;
pub mod resolve;

pub use entry::{ResponseEntry, ResponseValue};
pub use resolve::{latest_by_event, latest_by_user, latest_entry_for, latest_for};
