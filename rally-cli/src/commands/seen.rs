use anyhow::{Result, bail};
use chrono::Utc;
use owo_colors::OwoColorize;

use rally_core::sync::{CatalogStore, SyncEngine};
use rally_core::view::{NullRenderSink, ViewPublisher};

use crate::store::JsonStore;

/// Open and close an event card without interacting: the cycle still
/// appends one entry recording that the viewer saw it.
pub async fn run(store: JsonStore, user: &str, event_id: &str) -> Result<()> {
    let events = store.fetch_events().await?;
    let Some(event) = events.iter().find(|e| e.id == event_id) else {
        bail!("Unknown event '{}'", event_id);
    };
    let log = store.fetch_responses().await?;

    let mut engine = SyncEngine::new(user, store, ViewPublisher::new(NullRenderSink), log);
    engine.open(event_id);
    let _ = engine.close(event_id, Utc::now())?;
    engine.flush_now().await;

    println!("{} {}", "Marked seen:".green(), event.title);
    Ok(())
}
