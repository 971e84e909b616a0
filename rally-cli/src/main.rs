mod commands;
mod store;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rally_core::calendar::PeriodKey;
use rally_core::date_range::DateRange;
use rally_core::filter::{FilterState, ResponseFilter, VisibilityFilter};
use rally_core::response::ResponseValue;

use crate::store::JsonStore;

#[derive(Parser)]
#[command(name = "rally")]
#[command(about = "Track event responses and derived views from your terminal")]
struct Cli {
    /// Acting user id
    #[arg(short, long, default_value = "me")]
    user: String,

    /// Directory holding events.json / responses.json
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events grouped by period, honoring the saved filters
    List {
        /// Free-text search over every event field
        #[arg(short, long)]
        query: Option<String>,

        /// Tag to require (repeatable; all must match)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Period bucket (today, tomorrow, this-weekend, ...)
        #[arg(long)]
        period: Option<PeriodKey>,

        /// Response facet (going, no-answer, unresponded, ...)
        #[arg(long)]
        response: Option<ResponseFilter>,

        /// Only events by this organizer
        #[arg(long)]
        organizer: Option<String>,

        /// Only private events
        #[arg(long)]
        private: bool,

        /// Include events the viewer marked not interested
        #[arg(long)]
        show_hidden: bool,

        /// Hide events that already ended
        #[arg(long)]
        no_past: bool,

        /// Only events from this date (YYYY-MM-DD, or "start")
        #[arg(long)]
        from: Option<String>,

        /// Only events until this date (YYYY-MM-DD, or "end")
        #[arg(long)]
        to: Option<String>,

        /// Start from default filters instead of the saved ones
        #[arg(long)]
        reset: bool,
    },
    /// Record a response for an event
    Respond {
        event_id: String,

        /// going, interested, not-interested, or cleared
        value: ResponseValue,
    },
    /// Mark an event as seen without responding
    Seen { event_id: String },
    /// Show response history and the resolved current value
    Log { event_id: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => JsonStore::default_dir()?,
    };
    let store = JsonStore::new(data_dir);

    match cli.command {
        Commands::List {
            query,
            tag,
            period,
            response,
            organizer,
            private,
            show_hidden,
            no_past,
            from,
            to,
            reset,
        } => {
            let mut state = if reset {
                FilterState::default()
            } else {
                FilterState::load()
            };

            if let Some(query) = query {
                state.search_query = query;
            }
            if !tag.is_empty() {
                state.tags = tag;
            }
            if period.is_some() {
                state.period = period;
            }
            if response.is_some() {
                state.response = response;
            }
            if organizer.is_some() {
                state.organizer_id = organizer;
            }
            if private {
                state.visibility = VisibilityFilter::Private;
            }
            if show_hidden {
                state.show_hidden = true;
            }
            if no_past {
                state.exclude_past = true;
            }
            if from.is_some() || to.is_some() {
                let range = DateRange::from_args(from.as_deref(), to.as_deref())
                    .map_err(|e| anyhow::anyhow!(e))?;
                state.date_range = Some(range);
            }

            // Best effort; a read-only config dir shouldn't block listing
            let _ = state.save();

            commands::list::run(store, &cli.user, state).await
        }
        Commands::Respond { event_id, value } => {
            commands::respond::run(store, &cli.user, &event_id, value).await
        }
        Commands::Seen { event_id } => commands::seen::run(store, &cli.user, &event_id).await,
        Commands::Log { event_id } => {
            commands::log::run(store, &cli.user, event_id.as_deref()).await
        }
    }
}
