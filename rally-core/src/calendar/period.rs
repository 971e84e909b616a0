//! Derived calendar-period groupings.
//!
//! Periods are recomputed on demand from the catalog plus "now"; they are
//! never persisted. The `Other` bucket is dropped from every grouping.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::calendar::bucket::{PeriodKey, bucket_of, local_midnight, next_month};
use crate::event::Event;

/// A derived grouping of events under one temporal bucket.
#[derive(Debug, Clone)]
pub struct CalendarPeriod {
    pub key: PeriodKey,
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub events: Vec<Event>,
}

/// The local wall-clock window a bucket covers, as UTC instants.
/// `Other` has no window.
pub fn period_bounds(key: PeriodKey, now: DateTime<Utc>, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let now_local = now.with_timezone(&tz);
    let today = now_local.date_naive();
    let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));

    let day = |d: NaiveDate| local_midnight(d, tz).with_timezone(&Utc);

    let bounds = match key {
        PeriodKey::Past => {
            // Everything before now; the far-past sentinel mirrors an
            // unbounded range start.
            let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
            (epoch, now)
        }
        PeriodKey::Today => (day(today), day(today + Days::new(1))),
        PeriodKey::Tomorrow => (day(today + Days::new(1)), day(today + Days::new(2))),
        PeriodKey::ThisWeekend => (day(monday + Days::new(5)), day(monday + Days::new(7))),
        PeriodKey::ThisWeek => (day(monday), day(monday + Days::new(7))),
        PeriodKey::NextWeek => (day(monday + Days::new(7)), day(monday + Days::new(14))),
        PeriodKey::ThisMonth => {
            let first = first_of_month(today.year(), today.month());
            let (ny, nm) = next_month(today.year(), today.month());
            (day(first), day(first_of_month(ny, nm)))
        }
        PeriodKey::NextMonth => {
            let (ny, nm) = next_month(today.year(), today.month());
            let (ny2, nm2) = next_month(ny, nm);
            (day(first_of_month(ny, nm)), day(first_of_month(ny2, nm2)))
        }
        PeriodKey::Other => return None,
    };

    Some(bounds)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Both arguments come from valid dates, so this cannot fail.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

/// Bucket events into display-ordered periods. Empty buckets and `Other`
/// events are dropped.
pub fn group_events_by_period(events: &[Event], now: DateTime<Utc>, tz: Tz) -> Vec<CalendarPeriod> {
    group_and_count_events_by_period(events, now, tz).0
}

/// Bucket and tally in a single pass over the collection, so callers never
/// pay for a separate counting pass. The membership must agree with calling
/// [`bucket_of`] independently per event.
pub fn group_and_count_events_by_period(
    events: &[Event],
    now: DateTime<Utc>,
    tz: Tz,
) -> (Vec<CalendarPeriod>, HashMap<PeriodKey, usize>) {
    let mut buckets: HashMap<PeriodKey, Vec<Event>> = HashMap::new();
    let mut counts: HashMap<PeriodKey, usize> = HashMap::new();

    for event in events {
        let key = bucket_of(event, now, tz);
        if key == PeriodKey::Other {
            continue;
        }
        buckets.entry(key).or_default().push(event.clone());
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut periods = Vec::new();
    for key in PeriodKey::display_order() {
        let Some(mut events) = buckets.remove(&key) else {
            continue;
        };
        let Some((start, end)) = period_bounds(key, now, tz) else {
            continue;
        };
        events.sort_by_key(|e| e.start);
        periods.push(CalendarPeriod {
            key,
            label: key.label().to_string(),
            start,
            end,
            events,
        });
    }

    (periods, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventStats, GeoPoint, Visibility};
    use chrono::{Duration, TimeZone};

    fn event_at(id: &str, start: DateTime<Utc>, hours: i64) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Event {}", id),
            description: None,
            start,
            end: start + Duration::hours(hours),
            location: GeoPoint { lat: 0.0, lng: 0.0 },
            visibility: Visibility::Public,
            tags: vec![],
            organizer_id: "org".to_string(),
            stats: EventStats::default(),
        }
    }

    // Wednesday, 2025-03-19 12:00 UTC
    fn noon_wednesday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 19, 12, 0, 0).unwrap()
    }

    fn sample_events() -> Vec<Event> {
        vec![
            event_at("past", Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(), 2),
            event_at("now", Utc.with_ymd_and_hms(2025, 3, 19, 10, 0, 0).unwrap(), 4),
            event_at("tmrw", Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap(), 2),
            event_at("sat", Utc.with_ymd_and_hms(2025, 3, 22, 9, 0, 0).unwrap(), 2),
            event_at("fri", Utc.with_ymd_and_hms(2025, 3, 21, 9, 0, 0).unwrap(), 2),
            event_at("next", Utc.with_ymd_and_hms(2025, 3, 25, 9, 0, 0).unwrap(), 2),
            event_at("far", Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(), 2),
        ]
    }

    #[test]
    fn test_grouping_agrees_with_per_event_bucketing() {
        let events = sample_events();
        let (periods, counts) = group_and_count_events_by_period(&events, noon_wednesday(), Tz::UTC);

        // Naive path: classify each event independently.
        let mut naive: HashMap<PeriodKey, Vec<String>> = HashMap::new();
        for event in &events {
            let key = bucket_of(event, noon_wednesday(), Tz::UTC);
            if key != PeriodKey::Other {
                naive.entry(key).or_default().push(event.id.clone());
            }
        }

        assert_eq!(periods.len(), naive.len());
        for period in &periods {
            let mut ids: Vec<String> = period.events.iter().map(|e| e.id.clone()).collect();
            ids.sort();
            let mut expected = naive.remove(&period.key).unwrap();
            expected.sort();
            assert_eq!(ids, expected);
            assert_eq!(counts[&period.key], ids.len());
        }
    }

    #[test]
    fn test_other_is_a_drop_bucket() {
        let events = sample_events();
        let (periods, counts) = group_and_count_events_by_period(&events, noon_wednesday(), Tz::UTC);

        assert!(periods.iter().all(|p| p.key != PeriodKey::Other));
        assert!(!counts.contains_key(&PeriodKey::Other));
        assert!(
            periods
                .iter()
                .all(|p| p.events.iter().all(|e| e.id != "far"))
        );
    }

    #[test]
    fn test_periods_come_out_in_display_order() {
        let events = sample_events();
        let periods = group_events_by_period(&events, noon_wednesday(), Tz::UTC);

        let keys: Vec<PeriodKey> = periods.iter().map(|p| p.key).collect();
        let order = PeriodKey::display_order();
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| order.iter().position(|o| o == k).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_bounds_cover_their_events() {
        let (periods, _) =
            group_and_count_events_by_period(&sample_events(), noon_wednesday(), Tz::UTC);

        let today = periods.iter().find(|p| p.key == PeriodKey::Today).unwrap();
        assert_eq!(today.start, Utc.with_ymd_and_hms(2025, 3, 19, 0, 0, 0).unwrap());
        assert_eq!(today.end, Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap());

        let weekend = periods
            .iter()
            .find(|p| p.key == PeriodKey::ThisWeekend)
            .unwrap();
        assert_eq!(
            weekend.start,
            Utc.with_ymd_and_hms(2025, 3, 22, 0, 0, 0).unwrap()
        );
    }
}
