//! Latest-response resolution over the append-only log.
//!
//! Resolution is a pure projection: given the same log contents, in any
//! order, it always yields the same answer. All functions are O(n) over the
//! log and sort internally where needed.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::response::{ResponseEntry, ResponseValue};

/// Total order on authority: the greater entry is the current one.
///
/// Newest `created_at` wins. Entries without a timestamp are older than any
/// timestamped entry. Among remaining ties a non-cleared final value beats a
/// cleared (or absent) one, and entry id breaks whatever is left so the
/// order is total.
fn authority(a: &ResponseEntry, b: &ResponseEntry) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(x), Some(y)) if x != y => x.cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => substance_rank(a)
            .cmp(&substance_rank(b))
            .then_with(|| a.id.cmp(&b.id)),
    }
}

fn substance_rank(entry: &ResponseEntry) -> u8 {
    match entry.final_response {
        None | Some(ResponseValue::Cleared) => 0,
        Some(_) => 1,
    }
}

/// The authoritative entry for a (user, event) pair, if any.
pub fn latest_entry_for<'a>(
    log: &'a [ResponseEntry],
    user_id: &str,
    event_id: &str,
) -> Option<&'a ResponseEntry> {
    log.iter()
        .filter(|e| e.user_id == user_id && e.event_id == event_id)
        .max_by(|a, b| authority(a, b))
}

/// The current response value for a (user, event) pair.
///
/// Returns `None` both when no entry exists and when the authoritative
/// entry was cleared to nothing; callers that must tell those apart use
/// [`latest_entry_for`].
pub fn latest_for(log: &[ResponseEntry], user_id: &str, event_id: &str) -> Option<ResponseValue> {
    latest_entry_for(log, user_id, event_id).and_then(|e| e.final_response)
}

/// The authoritative entry per event for one user.
pub fn latest_by_event(log: &[ResponseEntry], user_id: &str) -> HashMap<String, ResponseEntry> {
    let mut latest: HashMap<String, ResponseEntry> = HashMap::new();
    for entry in log.iter().filter(|e| e.user_id == user_id) {
        match latest.get(&entry.event_id) {
            Some(current) if authority(current, entry) != Ordering::Less => {}
            _ => {
                latest.insert(entry.event_id.clone(), entry.clone());
            }
        }
    }
    latest
}

/// The authoritative entry per user for one event.
pub fn latest_by_user(log: &[ResponseEntry], event_id: &str) -> HashMap<String, ResponseEntry> {
    let mut latest: HashMap<String, ResponseEntry> = HashMap::new();
    for entry in log.iter().filter(|e| e.event_id == event_id) {
        match latest.get(&entry.user_id) {
            Some(current) if authority(current, entry) != Ordering::Less => {}
            _ => {
                latest.insert(entry.user_id.clone(), entry.clone());
            }
        }
    }
    latest
}
