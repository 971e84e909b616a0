//! Single-pass filtering, id-set composition, and facet counts.
//!
//! `apply_filters` answers "what is visible" with one pass over the catalog
//! and a per-event short-circuit. The id-set path answers the same question
//! as an intersection of per-criterion sets, which also exposes the
//! pre-intersection pools facet-suggestion counts are computed against.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::calendar::{PeriodKey, bucket_of};
use crate::event::Event;
use crate::filter::matchers::{
    ResponseFilter, matches_organizer, matches_query, matches_response, matches_tags,
    matches_visibility,
};
use crate::filter::state::FilterState;
use crate::response::{ResponseEntry, ResponseValue};

/// Read-only inputs the pipeline needs besides the catalog: the clock, the
/// viewer's zone, and the viewer's resolved latest entry per event.
pub struct FilterContext<'a> {
    pub now: DateTime<Utc>,
    pub tz: Tz,
    pub responses: &'a HashMap<String, ResponseEntry>,
}

impl FilterContext<'_> {
    pub fn latest(&self, event_id: &str) -> Option<&ResponseEntry> {
        self.responses.get(event_id)
    }
}

/// Run every active predicate over the collection in a single pass,
/// short-circuiting per event on the first failing predicate.
pub fn apply_filters(events: &[Event], state: &FilterState, ctx: &FilterContext) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event_passes(event, state, ctx))
        .cloned()
        .collect()
}

fn event_passes(event: &Event, state: &FilterState, ctx: &FilterContext) -> bool {
    if !matches_query(event, &state.search_query) {
        return false;
    }
    if !matches_tags(event, &state.tags) {
        return false;
    }
    if !matches_visibility(event, state.visibility) {
        return false;
    }
    if !matches_organizer(event, state.organizer_id.as_deref()) {
        return false;
    }

    let latest = ctx.latest(&event.id);
    if !matches_response(latest, state.response) {
        return false;
    }
    if !passes_rejection_screen(latest, state) {
        return false;
    }
    if let Some(range) = &state.date_range
        && !range.contains(event)
    {
        return false;
    }

    // Bucket once, shared by the period criterion and the past screen
    if state.period.is_some() || state.exclude_past {
        let bucket = bucket_of(event, ctx.now, ctx.tz);
        if state.exclude_past && bucket == PeriodKey::Past {
            return false;
        }
        if let Some(key) = state.period
            && bucket != key
        {
            return false;
        }
    }

    true
}

/// Rejected events stay hidden unless the viewer opted into seeing them or
/// is explicitly filtering for them.
fn passes_rejection_screen(latest: Option<&ResponseEntry>, state: &FilterState) -> bool {
    if state.show_hidden || !state.hide_rejected {
        return true;
    }
    if state.response == Some(ResponseFilter::NotInterested) {
        return true;
    }
    latest.and_then(|e| e.final_response) != Some(ResponseValue::NotInterested)
}

/// Facet dimensions that can be excluded from a candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetDim {
    Query,
    Tags,
    Visibility,
    Organizer,
    Response,
    Period,
}

/// One id-set per active criterion, collected in a single pass. Inactive
/// criteria stay `None` so they drop out of intersections entirely.
#[derive(Debug, Default)]
pub struct CriterionIdSets {
    pub query: Option<HashSet<String>>,
    pub tags: Option<HashSet<String>>,
    pub visibility: Option<HashSet<String>>,
    pub organizer: Option<HashSet<String>>,
    pub response: Option<HashSet<String>>,
    pub period: Option<HashSet<String>>,
    /// Always-on screens (rejection, date range, exclude-past). Never
    /// offered as a facet, always intersected in.
    pub baseline: HashSet<String>,
}

impl CriterionIdSets {
    pub fn collect(events: &[Event], state: &FilterState, ctx: &FilterContext) -> Self {
        let query_active = !state.search_query.trim().is_empty();
        let tags_active = state.tags.iter().any(|t| !t.trim().is_empty());
        let visibility_active = state.visibility != crate::filter::VisibilityFilter::All;
        let organizer_active = state.organizer_id.as_deref().is_some_and(|o| !o.is_empty());

        let mut sets = CriterionIdSets {
            query: query_active.then(HashSet::new),
            tags: tags_active.then(HashSet::new),
            visibility: visibility_active.then(HashSet::new),
            organizer: organizer_active.then(HashSet::new),
            response: state.response.map(|_| HashSet::new()),
            period: state.period.map(|_| HashSet::new()),
            baseline: HashSet::new(),
        };

        for event in events {
            let latest = ctx.latest(&event.id);

            let mut in_baseline = passes_rejection_screen(latest, state);
            if let Some(range) = &state.date_range {
                in_baseline = in_baseline && range.contains(event);
            }
            if state.exclude_past && in_baseline {
                in_baseline = bucket_of(event, ctx.now, ctx.tz) != PeriodKey::Past;
            }
            if in_baseline {
                sets.baseline.insert(event.id.clone());
            }

            if let Some(set) = &mut sets.query
                && matches_query(event, &state.search_query)
            {
                set.insert(event.id.clone());
            }
            if let Some(set) = &mut sets.tags
                && matches_tags(event, &state.tags)
            {
                set.insert(event.id.clone());
            }
            if let Some(set) = &mut sets.visibility
                && matches_visibility(event, state.visibility)
            {
                set.insert(event.id.clone());
            }
            if let Some(set) = &mut sets.organizer
                && matches_organizer(event, state.organizer_id.as_deref())
            {
                set.insert(event.id.clone());
            }
            if let Some(set) = &mut sets.response
                && matches_response(latest, state.response)
            {
                set.insert(event.id.clone());
            }
            if let Some(set) = &mut sets.period
                && state.period == Some(bucket_of(event, ctx.now, ctx.tz))
            {
                set.insert(event.id.clone());
            }
        }

        sets
    }

    fn active_sets(&self) -> [(FacetDim, Option<&HashSet<String>>); 6] {
        [
            (FacetDim::Query, self.query.as_ref()),
            (FacetDim::Tags, self.tags.as_ref()),
            (FacetDim::Visibility, self.visibility.as_ref()),
            (FacetDim::Organizer, self.organizer.as_ref()),
            (FacetDim::Response, self.response.as_ref()),
            (FacetDim::Period, self.period.as_ref()),
        ]
    }

    /// The intersection of the baseline with every active criterion:
    /// exactly the ids that should currently be visible.
    pub fn visible_ids(&self) -> HashSet<String> {
        self.pool(None)
    }

    /// The candidate pool for facet suggestions on one dimension: the
    /// intersection of everything *except* that dimension, so "N results if
    /// you also pick X" can be counted against it.
    pub fn pool_excluding(&self, dim: FacetDim) -> HashSet<String> {
        self.pool(Some(dim))
    }

    fn pool(&self, excluded: Option<FacetDim>) -> HashSet<String> {
        let mut result = self.baseline.clone();
        for (dim, set) in self.active_sets() {
            if Some(dim) == excluded {
                continue;
            }
            if let Some(set) = set {
                result.retain(|id| set.contains(id));
            }
        }
        result
    }
}

/// Per-facet value counts, computed against pre-intersection pools.
#[derive(Debug, Default)]
pub struct FacetCounts {
    pub periods: HashMap<PeriodKey, usize>,
    pub tags: HashMap<String, usize>,
    pub organizers: HashMap<String, usize>,
    pub responses: HashMap<ResponseFilter, usize>,
}

pub fn facet_counts(events: &[Event], state: &FilterState, ctx: &FilterContext) -> FacetCounts {
    let sets = CriterionIdSets::collect(events, state, ctx);

    let period_pool = sets.pool_excluding(FacetDim::Period);
    let tag_pool = sets.pool_excluding(FacetDim::Tags);
    let organizer_pool = sets.pool_excluding(FacetDim::Organizer);
    let response_pool = sets.pool_excluding(FacetDim::Response);

    let mut counts = FacetCounts::default();
    for event in events {
        if period_pool.contains(&event.id) {
            let key = bucket_of(event, ctx.now, ctx.tz);
            if key != PeriodKey::Other {
                *counts.periods.entry(key).or_insert(0) += 1;
            }
        }
        if tag_pool.contains(&event.id) {
            for tag in &event.tags {
                *counts.tags.entry(tag.to_lowercase()).or_insert(0) += 1;
            }
        }
        if organizer_pool.contains(&event.id) {
            *counts.organizers.entry(event.organizer_id.clone()).or_insert(0) += 1;
        }
        if response_pool.contains(&event.id) {
            let latest = ctx.latest(&event.id);
            // An event can land in more than one synthetic bucket
            for facet in ResponseFilter::all() {
                if matches_response(latest, Some(facet)) {
                    *counts.responses.entry(facet).or_insert(0) += 1;
                }
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventStats, GeoPoint, Visibility};
    use crate::filter::VisibilityFilter;
    use crate::response::latest_by_event;
    use chrono::TimeZone;

    // Wednesday, 2025-03-19 12:00 UTC
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 19, 12, 0, 0).unwrap()
    }

    fn event(id: &str, title: &str, day: u32, tags: &[&str], visibility: Visibility) -> Event {
        Event {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            start: Utc.with_ymd_and_hms(2025, 3, day, 18, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, day, 20, 0, 0).unwrap(),
            location: GeoPoint { lat: 0.0, lng: 0.0 },
            visibility,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            organizer_id: "org-1".to_string(),
            stats: EventStats::default(),
        }
    }

    fn catalog() -> Vec<Event> {
        vec![
            event("picnic", "Rooftop Picnic", 21, &["food", "outdoors"], Visibility::Public),
            event("gig", "Warehouse Gig", 21, &["music"], Visibility::Public),
            event("dinner", "Team Dinner", 25, &["food"], Visibility::Private),
            event("run", "Morning Run", 10, &["outdoors"], Visibility::Public),
        ]
    }

    fn response(user: &str, event: &str, value: ResponseValue, minute: u32) -> ResponseEntry {
        ResponseEntry {
            id: format!("{}-{}-{}", user, event, minute),
            user_id: user.to_string(),
            event_id: event.to_string(),
            initial_response: Some(ResponseValue::New),
            final_response: Some(value),
            created_at: Some(Utc.with_ymd_and_hms(2025, 3, 18, 12, minute, 0).unwrap()),
            invited_by_user_id: None,
        }
    }

    #[test]
    fn test_filters_compose_with_short_circuit() {
        let events = catalog();
        let responses = HashMap::new();
        let ctx = FilterContext {
            now: now(),
            tz: Tz::UTC,
            responses: &responses,
        };

        let state = FilterState {
            search_query: "picnic".to_string(),
            tags: vec!["food".to_string()],
            visibility: VisibilityFilter::Public,
            ..FilterState::default()
        };

        let filtered = apply_filters(&events, &state, &ctx);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "picnic");
    }

    #[test]
    fn test_rejected_events_hidden_unless_opted_in() {
        let events = catalog();
        let log = vec![response("u1", "gig", ResponseValue::NotInterested, 0)];
        let responses = latest_by_event(&log, "u1");
        let ctx = FilterContext {
            now: now(),
            tz: Tz::UTC,
            responses: &responses,
        };

        let default_state = FilterState::default();
        let visible: Vec<String> = apply_filters(&events, &default_state, &ctx)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert!(!visible.contains(&"gig".to_string()));

        let shown = FilterState {
            show_hidden: true,
            ..FilterState::default()
        };
        let visible: Vec<String> = apply_filters(&events, &shown, &ctx)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert!(visible.contains(&"gig".to_string()));

        // Explicitly filtering for rejections overrides the screen too
        let filtered_for = FilterState {
            response: Some(ResponseFilter::NotInterested),
            ..FilterState::default()
        };
        let visible: Vec<String> = apply_filters(&events, &filtered_for, &ctx)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(visible, vec!["gig".to_string()]);
    }

    #[test]
    fn test_exclude_past_screen() {
        let events = catalog();
        let responses = HashMap::new();
        let ctx = FilterContext {
            now: now(),
            tz: Tz::UTC,
            responses: &responses,
        };

        let state = FilterState {
            exclude_past: true,
            ..FilterState::default()
        };
        let visible: Vec<String> = apply_filters(&events, &state, &ctx)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert!(!visible.contains(&"run".to_string()));
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn test_id_set_intersection_matches_sequential_filtering() {
        let events = catalog();
        let log = vec![
            response("u1", "picnic", ResponseValue::Going, 0),
            response("u1", "gig", ResponseValue::NotInterested, 1),
        ];
        let responses = latest_by_event(&log, "u1");
        let ctx = FilterContext {
            now: now(),
            tz: Tz::UTC,
            responses: &responses,
        };

        let state = FilterState {
            tags: vec!["food".to_string()],
            visibility: VisibilityFilter::Public,
            exclude_past: true,
            ..FilterState::default()
        };

        let sequential: HashSet<String> = apply_filters(&events, &state, &ctx)
            .into_iter()
            .map(|e| e.id)
            .collect();
        let intersected = CriterionIdSets::collect(&events, &state, &ctx).visible_ids();

        assert_eq!(sequential, intersected);
    }

    #[test]
    fn test_facet_counts_use_pre_intersection_pool() {
        let events = catalog();
        let responses = HashMap::new();
        let ctx = FilterContext {
            now: now(),
            tz: Tz::UTC,
            responses: &responses,
        };

        // With the "food" tag selected only picnic and dinner are visible,
        // but tag suggestions still count against the pool without the tag
        // criterion, so "music" keeps its count.
        let state = FilterState {
            tags: vec!["food".to_string()],
            hide_rejected: false,
            ..FilterState::default()
        };

        let counts = facet_counts(&events, &state, &ctx);
        assert_eq!(counts.tags.get("music"), Some(&1));
        assert_eq!(counts.tags.get("food"), Some(&2));
        assert_eq!(counts.tags.get("outdoors"), Some(&2));

        // Organizer counts respect the tag criterion (different dimension)
        assert_eq!(counts.organizers.get("org-1"), Some(&2));
    }

    #[test]
    fn test_response_facets_include_synthetic_unions() {
        let events = catalog();
        let log = vec![
            response("u1", "picnic", ResponseValue::Going, 0),
            response("u1", "gig", ResponseValue::Invited, 1),
        ];
        let responses = latest_by_event(&log, "u1");
        let ctx = FilterContext {
            now: now(),
            tz: Tz::UTC,
            responses: &responses,
        };

        let state = FilterState {
            hide_rejected: false,
            ..FilterState::default()
        };
        let counts = facet_counts(&events, &state, &ctx);

        assert_eq!(counts.responses.get(&ResponseFilter::Going), Some(&1));
        assert_eq!(counts.responses.get(&ResponseFilter::Invited), Some(&1));
        // dinner + run have no entries, gig is invited-only: all "no answer"
        assert_eq!(counts.responses.get(&ResponseFilter::NoAnswer), Some(&3));
        assert_eq!(counts.responses.get(&ResponseFilter::Unresponded), None);
    }
}
