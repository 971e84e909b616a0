use anyhow::{Result, bail};
use chrono::Utc;
use owo_colors::OwoColorize;

use rally_core::response::ResponseValue;
use rally_core::sync::{CatalogStore, SyncEngine};
use rally_core::view::{NullRenderSink, ViewPublisher};

use crate::store::JsonStore;

/// One full open/interact/close cycle, flushed on the way out.
pub async fn run(store: JsonStore, user: &str, event_id: &str, value: ResponseValue) -> Result<()> {
    let events = store.fetch_events().await?;
    let Some(event) = events.iter().find(|e| e.id == event_id) else {
        bail!("Unknown event '{}'", event_id);
    };
    let log = store.fetch_responses().await?;

    let mut engine = SyncEngine::new(user, store, ViewPublisher::new(NullRenderSink), log);
    engine.open(event_id);
    engine.set_pending(event_id, value);
    let _ = engine.close(event_id, Utc::now())?;

    // Teardown: flush immediately instead of waiting out the debounce
    if engine.flush_now().await {
        println!(
            "{} {} for {}",
            "Recorded".green(),
            value.as_str().bold(),
            event.title
        );
    } else {
        println!(
            "{} {} for {} (sync pending, will retry)",
            "Recorded locally:".yellow(),
            value.as_str().bold(),
            event.title
        );
    }

    Ok(())
}
