//! Temporal bucketing of events relative to "now".
//!
//! Every event lands in exactly one bucket, decided by a fixed priority
//! order. All comparisons happen after converting the event's stored
//! instants into the viewer's local time zone, which is what decides where
//! boundary-straddling events land.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Named temporal bucket, in priority order (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PeriodKey {
    Past,
    Today,
    Tomorrow,
    ThisWeekend,
    ThisWeek,
    NextWeek,
    ThisMonth,
    NextMonth,
    /// Drop bucket: excluded from calendar groupings entirely.
    Other,
}

impl PeriodKey {
    pub fn label(&self) -> &'static str {
        match self {
            PeriodKey::Past => "Past",
            PeriodKey::Today => "Today",
            PeriodKey::Tomorrow => "Tomorrow",
            PeriodKey::ThisWeekend => "This weekend",
            PeriodKey::ThisWeek => "This week",
            PeriodKey::NextWeek => "Next week",
            PeriodKey::ThisMonth => "This month",
            PeriodKey::NextMonth => "Next month",
            PeriodKey::Other => "Other",
        }
    }

    /// Buckets in the order a calendar view lists them (soonest first,
    /// past events last).
    pub fn display_order() -> [PeriodKey; 8] {
        [
            PeriodKey::Today,
            PeriodKey::Tomorrow,
            PeriodKey::ThisWeekend,
            PeriodKey::ThisWeek,
            PeriodKey::NextWeek,
            PeriodKey::ThisMonth,
            PeriodKey::NextMonth,
            PeriodKey::Past,
        ]
    }
}

impl FromStr for PeriodKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "past" => Ok(PeriodKey::Past),
            "today" => Ok(PeriodKey::Today),
            "tomorrow" => Ok(PeriodKey::Tomorrow),
            "thisWeekend" | "this-weekend" => Ok(PeriodKey::ThisWeekend),
            "thisWeek" | "this-week" => Ok(PeriodKey::ThisWeek),
            "nextWeek" | "next-week" => Ok(PeriodKey::NextWeek),
            "thisMonth" | "this-month" => Ok(PeriodKey::ThisMonth),
            "nextMonth" | "next-month" => Ok(PeriodKey::NextMonth),
            other => Err(format!("Unknown period '{}'", other)),
        }
    }
}

/// Classify an event relative to `now`, evaluated in the viewer's zone.
pub fn bucket_of(event: &Event, now: DateTime<Utc>, tz: Tz) -> PeriodKey {
    let start = event.start.with_timezone(&tz);
    let end = event.end.with_timezone(&tz);
    let now_local = now.with_timezone(&tz);

    // 1. Already over
    if end < now_local {
        return PeriodKey::Past;
    }

    // 2. Happening right now
    if start < now_local && now_local < end {
        return PeriodKey::Today;
    }

    // 3. Local midnight-to-midnight "tomorrow" window intersects [start, end]
    let today = now_local.date_naive();
    let window_start = local_midnight(today + Days::new(1), tz);
    let window_end = local_midnight(today + Days::new(2), tz);
    if start < window_end && end >= window_start {
        return PeriodKey::Tomorrow;
    }

    // 4-6. ISO weeks (Monday start)
    let same_week = start.iso_week() == now_local.iso_week();
    if same_week && matches!(start.weekday(), Weekday::Sat | Weekday::Sun) {
        return PeriodKey::ThisWeekend;
    }
    if same_week {
        return PeriodKey::ThisWeek;
    }
    if start.iso_week() == (now_local + Duration::days(7)).iso_week() {
        return PeriodKey::NextWeek;
    }

    // 7. Calendar months
    if (start.year(), start.month()) == (now_local.year(), now_local.month()) {
        return PeriodKey::ThisMonth;
    }
    if (start.year(), start.month()) == next_month(now_local.year(), now_local.month()) {
        return PeriodKey::NextMonth;
    }

    // 8. Too far out
    PeriodKey::Other
}

/// Local midnight for a date. A DST gap at midnight falls back to the UTC
/// reading of the same wall-clock time.
pub(crate) fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

pub(crate) fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}
