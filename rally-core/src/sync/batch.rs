//! Queued remote-write intents.
//!
//! A `BatchAction` lives only until a successful flush (or a local reset);
//! it is never persisted outside the current session. Every action gets a
//! fresh id, so rapid successive changes to the same (user, event) pair are
//! distinct actions coalesced only by the debounce window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RallyError, RallyResult};
use crate::response::ResponseEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    EventResponse,
    FriendshipAccept,
    FriendshipBlock,
    FriendshipRemove,
}

/// A queued intent to mutate remote state, flushed on a timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAction {
    pub id: Uuid,
    pub kind: ActionKind,
    pub data: serde_json::Value,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
}

impl BatchAction {
    pub fn new(
        kind: ActionKind,
        data: serde_json::Value,
        user_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        BatchAction {
            id: Uuid::new_v4(),
            kind,
            data,
            user_id: user_id.to_string(),
            timestamp,
        }
    }

    /// Wrap a freshly appended response entry.
    pub fn for_response(entry: &ResponseEntry, timestamp: DateTime<Utc>) -> RallyResult<Self> {
        let data =
            serde_json::to_value(entry).map_err(|e| RallyError::Serialization(e.to_string()))?;
        Ok(BatchAction::new(
            ActionKind::EventResponse,
            data,
            &entry.user_id,
            timestamp,
        ))
    }
}
