use anyhow::Result;
use owo_colors::OwoColorize;

use rally_core::response::latest_for;
use rally_core::sync::CatalogStore;

use crate::commands::viewer_tz;
use crate::store::JsonStore;

/// Show the viewer's response history, optionally for a single event.
pub async fn run(store: JsonStore, user: &str, event_id: Option<&str>) -> Result<()> {
    let log = store.fetch_responses().await?;
    let tz = viewer_tz();

    let mut entries: Vec<_> = log
        .iter()
        .filter(|e| e.user_id == user)
        .filter(|e| event_id.is_none_or(|id| e.event_id == id))
        .collect();

    if entries.is_empty() {
        println!("No response history");
        return Ok(());
    }

    // Untimestamped entries come first, matching their resolution authority
    entries.sort_by_key(|e| e.created_at);

    for entry in &entries {
        let when = match entry.created_at {
            Some(at) => at.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string(),
            None => "unknown time".to_string(),
        };
        let initial = entry.initial_response.map_or("null", |v| v.as_str());
        let final_value = entry.final_response.map_or("null", |v| v.as_str());
        println!(
            "{}  {}  {} {} {}",
            when.dimmed(),
            entry.event_id,
            initial,
            "->".dimmed(),
            final_value.bold()
        );
    }

    if let Some(id) = event_id {
        let current = latest_for(&log, user, id)
            .map_or("none".to_string(), |v| v.as_str().to_string());
        println!("\n{} {}", "Current response:".dimmed(), current.bold());
    }

    Ok(())
}
