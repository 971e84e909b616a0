//! Date range for filtering events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Date range for filtering events.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Parse a pair of date strings into a DateRange.
    /// - `from`: "start" for unbounded past, or YYYY-MM-DD
    /// - `to`: "end" for unbounded future, or YYYY-MM-DD
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> Result<Self, String> {
        let from_dt = match from {
            Some("start") | None => None,
            Some(s) => Some(parse_date_start(s)?),
        };

        let to_dt = match to {
            Some("end") | None => None,
            Some(s) => Some(parse_date_end(s)?),
        };

        Ok(DateRange {
            from: from_dt,
            to: to_dt,
        })
    }

    /// Whether the event's [start, end] interval overlaps this range.
    pub fn contains(&self, event: &Event) -> bool {
        let after_from = self.from.is_none_or(|from| event.end >= from);
        let before_to = self.to.is_none_or(|to| event.start <= to);
        after_from && before_to
    }
}

/// Parse YYYY-MM-DD as start of day in UTC
fn parse_date_start(s: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc())
}

/// Parse YYYY-MM-DD as end of day in UTC
fn parse_date_end(s: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))?;
    Ok(date.and_hms_opt(23, 59, 59).unwrap().and_utc())
}
