//! The optimistic sync engine.
//!
//! Every open/close cycle on an event card appends exactly one entry to the
//! in-memory log, synchronously, before any network call — local readers
//! never see stale state while a write is outstanding. Appended entries are
//! wrapped in batch actions and flushed together once the debounce window
//! expires (or immediately on teardown). A failed flush retains the queue
//! verbatim for the next attempt; the optimistic entry is never rolled back.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::error::RallyResult;
use crate::response::{ResponseEntry, ResponseValue, latest_by_event};
use crate::sync::batch::{ActionKind, BatchAction};
use crate::sync::store::ResponseStore;
use crate::view::{RenderSink, ViewPublisher};

/// Debounce window between the last enqueued action and the flush.
pub const DEBOUNCE_WINDOW_SECS: i64 = 5;

/// One open event card: what resolution said when it was opened, and what
/// the user has picked since (not yet in the log).
#[derive(Debug, Clone)]
struct OpenSession {
    /// The prior authoritative final value (None covers both "no entry" and
    /// "cleared to nothing"; `had_entry` tells them apart).
    prior: Option<ResponseValue>,
    had_entry: bool,
    /// In-memory interaction slot; `None` until the user picks something.
    pending: Option<ResponseValue>,
}

/// Viewer-scoped engine over one response store and one render sink.
pub struct SyncEngine<S: ResponseStore, R: RenderSink> {
    user_id: String,
    store: S,
    publisher: ViewPublisher<R>,
    log: Vec<ResponseEntry>,
    sessions: HashMap<String, OpenSession>,
    /// Append-ordered pending actions; flush order must match append order
    /// so the remote resolution rule sees monotonic timestamps.
    queue: Vec<BatchAction>,
    /// The scheduled flush instant, replaced on every enqueue.
    flush_at: Option<DateTime<Utc>>,
    /// Resolved latest entry per event for the viewer; dropped on every
    /// local append and on successful flush.
    latest: Option<HashMap<String, ResponseEntry>>,
}

impl<S: ResponseStore, R: RenderSink> SyncEngine<S, R> {
    pub fn new(user_id: &str, store: S, publisher: ViewPublisher<R>, log: Vec<ResponseEntry>) -> Self {
        SyncEngine {
            user_id: user_id.to_string(),
            store,
            publisher,
            log,
            sessions: HashMap::new(),
            queue: Vec::new(),
            flush_at: None,
            latest: None,
        }
    }

    /// The full in-memory log, including not-yet-flushed entries.
    pub fn log(&self) -> &[ResponseEntry] {
        &self.log
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn publisher_mut(&mut self) -> &mut ViewPublisher<R> {
        &mut self.publisher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The viewer's resolved latest entry per event, over the full log.
    pub fn latest_map(&mut self) -> &HashMap<String, ResponseEntry> {
        if self.latest.is_none() {
            self.latest = Some(latest_by_event(&self.log, &self.user_id));
        }
        // Just populated above
        self.latest.as_ref().unwrap()
    }

    /// The viewer's current response for one event.
    pub fn current_response(&mut self, event_id: &str) -> Option<ResponseValue> {
        self.resolved(event_id).and_then(|e| e.final_response)
    }

    fn resolved(&mut self, event_id: &str) -> Option<ResponseEntry> {
        self.latest_map().get(event_id).cloned()
    }

    /// The user opened an event card: capture the resolved prior response.
    pub fn open(&mut self, event_id: &str) {
        let entry = self.resolved(event_id);
        let session = OpenSession {
            prior: entry.as_ref().and_then(|e| e.final_response),
            had_entry: entry.is_some(),
            pending: None,
        };
        self.sessions.insert(event_id.to_string(), session);
    }

    /// The user picked a value while the card is open. Only the in-memory
    /// slot changes (no log append, no network); the renderer gets an
    /// immediate style patch.
    pub fn set_pending(&mut self, event_id: &str, value: ResponseValue) {
        let Some(session) = self.sessions.get_mut(event_id) else {
            warn!(event_id, "set_pending without an open session");
            return;
        };
        session.pending = Some(value);
        self.publisher.publish_response(event_id, Some(value));
    }

    /// The card closed: reconcile the session into exactly one log entry.
    ///
    /// Returns the appended entry, or `None` if no session was open.
    pub fn close(&mut self, event_id: &str, now: DateTime<Utc>) -> RallyResult<Option<ResponseEntry>> {
        let Some(session) = self.sessions.remove(event_id) else {
            return Ok(None);
        };

        let initial = if session.had_entry {
            session.prior
        } else {
            Some(ResponseValue::New)
        };

        let final_value = match session.pending {
            // Changed: record the transition
            Some(picked) if session.prior != Some(picked) => Some(picked),
            // Unchanged: an unanswered state becomes "seen, did nothing";
            // a substantive prior value is re-recorded as-is.
            _ => match session.prior {
                None | Some(ResponseValue::Invited) => Some(ResponseValue::Seen),
                Some(prior) => Some(prior),
            },
        };

        let entry = ResponseEntry::new(&self.user_id, event_id, initial, final_value, now);

        // Local append happens before anything async can observe the log
        self.log.push(entry.clone());
        self.latest = None;

        let action = BatchAction::for_response(&entry, now)?;
        debug!(event_id, action_id = %action.id, "queued response action");
        self.enqueue(action, now);

        self.publisher.publish_response(event_id, final_value);

        Ok(Some(entry))
    }

    /// Queue a friendship mutation alongside response writes.
    pub fn record_friendship(
        &mut self,
        kind: ActionKind,
        data: serde_json::Value,
        now: DateTime<Utc>,
    ) {
        let action = BatchAction::new(kind, data, &self.user_id, now);
        self.enqueue(action, now);
    }

    fn enqueue(&mut self, action: BatchAction, now: DateTime<Utc>) {
        self.queue.push(action);
        // Reset the shared debounce timer: the whole queue flushes at once
        self.flush_at = Some(now + Duration::seconds(DEBOUNCE_WINDOW_SECS));
    }

    /// Flush the queue if the debounce window has expired. Returns whether
    /// a flush succeeded.
    pub async fn flush_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.flush_at {
            Some(at) if now >= at => self.flush().await,
            _ => false,
        }
    }

    /// Teardown path: flush immediately, ignoring the debounce window.
    pub async fn flush_now(&mut self) -> bool {
        self.flush().await
    }

    async fn flush(&mut self) -> bool {
        if self.queue.is_empty() {
            return false;
        }

        match self.store.put_batch(&self.user_id, &self.queue).await {
            Ok(ack) => {
                debug!(applied = ack.applied.len(), "flushed batch");
                self.queue.clear();
                self.flush_at = None;
                // Remote state moved: drop the per-user cache
                self.latest = None;
                true
            }
            Err(e) => {
                // Best effort: keep the queue and the past-due deadline so
                // the next debounce cycle or teardown retries delivery.
                warn!(error = %e, pending = self.queue.len(), "batch flush failed, retaining queue");
                false
            }
        }
    }
}
