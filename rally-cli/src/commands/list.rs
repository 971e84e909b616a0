use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;

use rally_core::calendar::group_and_count_events_by_period;
use rally_core::filter::{CriterionIdSets, FilterContext, FilterState, facet_counts};
use rally_core::response::{ResponseValue, latest_by_event};
use rally_core::sync::CatalogStore;

use crate::commands::viewer_tz;
use crate::store::JsonStore;

pub async fn run(store: JsonStore, user: &str, state: FilterState) -> Result<()> {
    let events = store.fetch_events().await?;
    let log = store.fetch_responses().await?;

    let responses = latest_by_event(&log, user);
    let ctx = FilterContext {
        now: Utc::now(),
        tz: viewer_tz(),
        responses: &responses,
    };

    let sets = CriterionIdSets::collect(&events, &state, &ctx);
    let visible = sets.visible_ids();
    let visible_events: Vec<_> = events
        .iter()
        .filter(|e| visible.contains(&e.id))
        .cloned()
        .collect();

    if visible_events.is_empty() {
        println!("No events match the current filters");
        return Ok(());
    }

    let (periods, _) = group_and_count_events_by_period(&visible_events, ctx.now, ctx.tz);

    for period in &periods {
        println!("{}", period.label.bold());
        for event in &period.events {
            let marker = match responses.get(&event.id).and_then(|e| e.final_response) {
                Some(ResponseValue::Going) => "going".green().to_string(),
                Some(ResponseValue::Interested) => "interested".yellow().to_string(),
                Some(ResponseValue::NotInterested) => "not interested".red().to_string(),
                Some(ResponseValue::Invited) => "invited".cyan().to_string(),
                _ => "-".dimmed().to_string(),
            };
            println!(
                "  {}  {}  [{}]",
                event.start.with_timezone(&ctx.tz).format("%a %d %b %H:%M"),
                event.title,
                marker
            );
        }
        println!();
    }

    // Tag suggestions with pre-intersection counts
    let counts = facet_counts(&events, &state, &ctx);
    if !counts.tags.is_empty() {
        let mut tags: Vec<_> = counts.tags.iter().collect();
        tags.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        let summary: Vec<String> = tags
            .iter()
            .take(8)
            .map(|(tag, n)| format!("{} ({})", tag, n))
            .collect();
        println!("{} {}", "tags:".dimmed(), summary.join("  "));
    }

    Ok(())
}
