//! Store traits for the catalog and response collaborators.
//!
//! Both stores are external: a tabular, eventually consistent record store
//! reached over some transport the engine never sees. The CLI ships a
//! JSON-file implementation; tests use an in-memory recording one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RallyResult;
use crate::event::Event;
use crate::response::ResponseEntry;
use crate::sync::batch::BatchAction;

/// Acknowledgement for a flushed batch, enumerating which actions the
/// remote store applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAck {
    pub applied: Vec<Uuid>,
}

/// Write side of the remote store. Failure is all-or-nothing for the whole
/// batch; the engine retries on the next flush cycle.
pub trait ResponseStore {
    fn put_batch(
        &mut self,
        user_id: &str,
        actions: &[BatchAction],
    ) -> impl Future<Output = RallyResult<BatchAck>>;
}

/// Read side: the catalog and the response log, fetched once on cold start
/// and cached. A failed fetch blocks every derived view and is surfaced to
/// the caller, not swallowed.
pub trait CatalogStore {
    fn fetch_events(&self) -> impl Future<Output = RallyResult<Vec<Event>>>;
    fn fetch_responses(&self) -> impl Future<Output = RallyResult<Vec<ResponseEntry>>>;
}
