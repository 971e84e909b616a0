//! Bridge between derived views and the rendering collaborator.
//!
//! The renderer (a map-style layer that clusters and colors markers) is
//! reached through an explicit handle passed in at construction, never
//! through globals. A single response change is an O(1) per-id patch; bulk
//! reshuffles replace the whole dataset so derived structures like spatial
//! clustering recompute consistently.

use std::collections::HashSet;

use tracing::debug;

use crate::event::Event;
use crate::response::ResponseValue;

/// Capability points the rendering collaborator exposes.
///
/// Implementations must tolerate being called before the underlying visual
/// source exists: such calls are a no-op, not an error.
pub trait RenderSink {
    /// Replace all visible features with this collection.
    fn replace_all(&mut self, events: &[Event]);
    /// Patch one feature's style-relevant response property by id.
    fn set_response(&mut self, event_id: &str, value: ResponseValue);
    /// Remove the response property from a feature by id.
    fn clear_response(&mut self, event_id: &str);
}

/// Sink for callers with no renderer attached; every call is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn replace_all(&mut self, _events: &[Event]) {}
    fn set_response(&mut self, _event_id: &str, _value: ResponseValue) {}
    fn clear_response(&mut self, _event_id: &str) {}
}

pub struct ViewPublisher<R: RenderSink> {
    sink: R,
}

impl<R: RenderSink> ViewPublisher<R> {
    pub fn new(sink: R) -> Self {
        ViewPublisher { sink }
    }

    /// Recompute what the renderer shows after a filter change: only
    /// features whose id is in the visible set survive.
    pub fn publish_visible(&mut self, events: &[Event], visible: &HashSet<String>) {
        let filtered: Vec<Event> = events
            .iter()
            .filter(|e| visible.contains(&e.id))
            .cloned()
            .collect();
        debug!(visible = filtered.len(), total = events.len(), "publishing visible features");
        self.sink.replace_all(&filtered);
    }

    /// Patch a single feature after one response change. `None` removes the
    /// response property entirely.
    pub fn publish_response(&mut self, event_id: &str, value: Option<ResponseValue>) {
        match value {
            Some(value) => self.sink.set_response(event_id, value),
            None => self.sink.clear_response(event_id),
        }
    }

    /// Full dataset replace for bulk reshuffles (visibility mode switches,
    /// compound filter changes).
    pub fn publish_dataset(&mut self, events: &[Event]) {
        debug!(count = events.len(), "replacing render dataset");
        self.sink.replace_all(events);
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventStats, GeoPoint, Visibility};
    use chrono::{TimeZone, Utc};

    /// Records calls; pretends the visual source appears after `attach`.
    #[derive(Default)]
    struct RecordingSink {
        attached: bool,
        replaced: Vec<Vec<String>>,
        patches: Vec<(String, Option<ResponseValue>)>,
    }

    impl RenderSink for RecordingSink {
        fn replace_all(&mut self, events: &[Event]) {
            if !self.attached {
                return;
            }
            self.replaced
                .push(events.iter().map(|e| e.id.clone()).collect());
        }

        fn set_response(&mut self, event_id: &str, value: ResponseValue) {
            if !self.attached {
                return;
            }
            self.patches.push((event_id.to_string(), Some(value)));
        }

        fn clear_response(&mut self, event_id: &str) {
            if !self.attached {
                return;
            }
            self.patches.push((event_id.to_string(), None));
        }
    }

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            start: Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap(),
            location: GeoPoint { lat: 0.0, lng: 0.0 },
            visibility: Visibility::Public,
            tags: vec![],
            organizer_id: "org".to_string(),
            stats: EventStats::default(),
        }
    }

    #[test]
    fn test_publish_visible_filters_the_collection() {
        let mut publisher = ViewPublisher::new(RecordingSink {
            attached: true,
            ..RecordingSink::default()
        });

        let events = vec![event("a"), event("b"), event("c")];
        let visible: HashSet<String> = ["a".to_string(), "c".to_string()].into();
        publisher.publish_visible(&events, &visible);

        assert_eq!(publisher.sink().replaced.len(), 1);
        assert_eq!(publisher.sink().replaced[0], vec!["a", "c"]);
    }

    #[test]
    fn test_response_patch_and_clear() {
        let mut publisher = ViewPublisher::new(RecordingSink {
            attached: true,
            ..RecordingSink::default()
        });

        publisher.publish_response("a", Some(ResponseValue::Going));
        publisher.publish_response("a", None);

        assert_eq!(
            publisher.sink().patches,
            vec![
                ("a".to_string(), Some(ResponseValue::Going)),
                ("a".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_calls_before_source_exists_are_noops() {
        let mut publisher = ViewPublisher::new(RecordingSink::default());

        publisher.publish_dataset(&[event("a")]);
        publisher.publish_response("a", Some(ResponseValue::Going));

        assert!(publisher.sink().replaced.is_empty());
        assert!(publisher.sink().patches.is_empty());
    }
}
