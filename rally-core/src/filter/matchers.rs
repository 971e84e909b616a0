//! Pure per-event predicates.
//!
//! Every matcher is total: an absent or empty criterion is the identity
//! filter, and malformed criteria degrade to "match everything" rather than
//! erroring. Matchers never panic.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{PeriodKey, bucket_of};
use crate::event::{Event, Visibility};
use crate::response::{ResponseEntry, ResponseValue};

/// Case-insensitive substring search over every string and number leaf of
/// the event, including nested structures, not just title/description.
pub fn matches_query(event: &Event, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    match serde_json::to_value(event) {
        Ok(value) => value_contains(&value, &needle),
        // Unserializable event: degrade to match-all
        Err(_) => true,
    }
}

fn value_contains(value: &serde_json::Value, needle: &str) -> bool {
    match value {
        serde_json::Value::String(s) => s.to_lowercase().contains(needle),
        serde_json::Value::Number(n) => n.to_string().contains(needle),
        serde_json::Value::Array(items) => items.iter().any(|v| value_contains(v, needle)),
        serde_json::Value::Object(map) => map.values().any(|v| value_contains(v, needle)),
        _ => false,
    }
}

/// AND semantics: every selected tag must appear, case-insensitively, as a
/// substring of some event tag. Blank selections are ignored.
pub fn matches_tags(event: &Event, selected: &[String]) -> bool {
    selected.iter().all(|sel| {
        let sel = sel.trim().to_lowercase();
        sel.is_empty() || event.tags.iter().any(|tag| tag.to_lowercase().contains(&sel))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityFilter {
    #[default]
    All,
    Public,
    Private,
}

pub fn matches_visibility(event: &Event, filter: VisibilityFilter) -> bool {
    match filter {
        VisibilityFilter::All => true,
        VisibilityFilter::Public => event.visibility == Visibility::Public,
        VisibilityFilter::Private => event.visibility == Visibility::Private,
    }
}

pub fn matches_organizer(event: &Event, organizer_id: Option<&str>) -> bool {
    match organizer_id {
        Some(id) if !id.is_empty() => event.organizer_id == id,
        _ => true,
    }
}

pub fn matches_period(event: &Event, period: Option<PeriodKey>, now: DateTime<Utc>, tz: Tz) -> bool {
    match period {
        Some(key) => bucket_of(event, now, tz) == key,
        None => true,
    }
}

/// Response facet values, including the synthetic union buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFilter {
    Going,
    Interested,
    NotInterested,
    Invited,
    /// No entry at all, or the latest entry is an unanswered invite.
    NoAnswer,
    /// Saw the event and either did nothing or cleared a previous choice.
    Unresponded,
}

impl ResponseFilter {
    pub fn all() -> [ResponseFilter; 6] {
        [
            ResponseFilter::Going,
            ResponseFilter::Interested,
            ResponseFilter::NotInterested,
            ResponseFilter::Invited,
            ResponseFilter::NoAnswer,
            ResponseFilter::Unresponded,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFilter::Going => "going",
            ResponseFilter::Interested => "interested",
            ResponseFilter::NotInterested => "not_interested",
            ResponseFilter::Invited => "invited",
            ResponseFilter::NoAnswer => "no_answer",
            ResponseFilter::Unresponded => "unresponded",
        }
    }
}

impl FromStr for ResponseFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "going" => Ok(ResponseFilter::Going),
            "interested" => Ok(ResponseFilter::Interested),
            "not_interested" | "not-interested" => Ok(ResponseFilter::NotInterested),
            "invited" => Ok(ResponseFilter::Invited),
            "no_answer" | "no-answer" => Ok(ResponseFilter::NoAnswer),
            "unresponded" => Ok(ResponseFilter::Unresponded),
            other => Err(format!("Unknown response filter '{}'", other)),
        }
    }
}

/// Match the viewer's resolved latest entry for an event against a response
/// facet. `latest` is `None` when the viewer has no entry for the event.
pub fn matches_response(latest: Option<&ResponseEntry>, filter: Option<ResponseFilter>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    let value = latest.and_then(|e| e.final_response);
    match filter {
        ResponseFilter::Going => value == Some(ResponseValue::Going),
        ResponseFilter::Interested => value == Some(ResponseValue::Interested),
        ResponseFilter::NotInterested => value == Some(ResponseValue::NotInterested),
        ResponseFilter::Invited => value == Some(ResponseValue::Invited),
        ResponseFilter::NoAnswer => latest.is_none() || value == Some(ResponseValue::Invited),
        ResponseFilter::Unresponded => {
            latest.is_some()
                && matches!(
                    value,
                    None | Some(ResponseValue::Seen) | Some(ResponseValue::Cleared)
                )
        }
    }
}
