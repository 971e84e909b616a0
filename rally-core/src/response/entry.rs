//! Response log entries.
//!
//! Entries are never mutated or deleted in normal operation: a state change
//! always appends a new entry. `initial_response` records what resolution
//! returned for the (user, event) pair immediately before the entry was
//! written, so the log doubles as an audit trail of what the user saw.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A user's response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseValue {
    Going,
    Interested,
    NotInterested,
    Cleared,
    Seen,
    Invited,
    /// Sentinel recorded as `initial_response` when no prior entry existed.
    /// Never valid as a final value.
    New,
}

impl ResponseValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseValue::Going => "going",
            ResponseValue::Interested => "interested",
            ResponseValue::NotInterested => "not_interested",
            ResponseValue::Cleared => "cleared",
            ResponseValue::Seen => "seen",
            ResponseValue::Invited => "invited",
            ResponseValue::New => "new",
        }
    }
}

impl FromStr for ResponseValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "going" => Ok(ResponseValue::Going),
            "interested" => Ok(ResponseValue::Interested),
            "not_interested" | "not-interested" => Ok(ResponseValue::NotInterested),
            "cleared" => Ok(ResponseValue::Cleared),
            "seen" => Ok(ResponseValue::Seen),
            "invited" => Ok(ResponseValue::Invited),
            other => Err(format!("Unknown response value '{}'", other)),
        }
    }
}

/// One immutable row in the per-user-per-event response history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    /// What resolution returned before this entry was appended:
    /// `Some(New)` when no entry existed, `None` when the prior entry had
    /// been cleared to nothing.
    pub initial_response: Option<ResponseValue>,
    /// `None` is a valid "cleared to nothing" state, distinct from the
    /// absence of any entry.
    pub final_response: Option<ResponseValue>,
    pub created_at: Option<DateTime<Utc>>,
    pub invited_by_user_id: Option<String>,
}

impl ResponseEntry {
    pub fn new(
        user_id: &str,
        event_id: &str,
        initial_response: Option<ResponseValue>,
        final_response: Option<ResponseValue>,
        created_at: DateTime<Utc>,
    ) -> Self {
        ResponseEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            event_id: event_id.to_string(),
            initial_response,
            final_response,
            created_at: Some(created_at),
            invited_by_user_id: None,
        }
    }
}
