//! Catalog event types.
//!
//! These types represent the event catalog in a store-agnostic way. The
//! catalog collaborator owns these records; the engine treats them as
//! read-only input for bucketing, filtering, and rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of tags a catalog event carries.
pub const MAX_EVENT_TAGS: usize = 3;

/// A catalog event (read-only input to the engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: GeoPoint,
    pub visibility: Visibility,
    /// Free-form tags, at most `MAX_EVENT_TAGS`
    pub tags: Vec<String>,
    pub organizer_id: String,
    /// Aggregate counters maintained by the remote store
    #[serde(default)]
    pub stats: EventStats,
}

/// Geospatial point for the map renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
}

/// Numeric aggregates shown on event cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStats {
    pub going_count: u32,
    pub interested_count: u32,
    pub view_count: u32,
}
