// Copyright 2025 Chatlens Contributors (https://github.com/chatlens/chatlens)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Chatlens CLI
//!
//! Generate synthetic chat traffic, compute dashboard snapshots and export
//! events to CSV.

mod config;

use anyhow::{Context, Result};
use chatlens_core::{ChatEvent, Intent, Region, SentimentLabel, Topic};
use chatlens_query::{DashboardSnapshot, EventFilter, TimeWindow};
use chatlens_storage::{
    load_or_synthesize, write_csv_file, EventStore, InMemoryEventStore, JsonFileEventStore,
};
use chatlens_synthetic::SyntheticEventGenerator;
use chatlens_telemetry::init_logging;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use config::ChatlensConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "chatlens")]
#[command(about = "Chatlens - chatbot conversation analytics", long_about = None)]
struct Cli {
    /// Config file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose mode
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic chat events as JSON
    Generate {
        /// Number of events
        #[arg(short = 'n', long, default_value = "100")]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the dashboard snapshot and print it as JSON
    Analyze {
        /// JSON or JSON Lines event file; synthetic events when absent or empty
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of synthetic events on fallback
        #[arg(short = 'n', long, default_value = "100")]
        count: usize,

        /// Seed for the synthetic fallback
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Export events to CSV
    Export {
        /// JSON or JSON Lines event file
        #[arg(short, long)]
        input: PathBuf,

        /// CSV file to write
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Keep only these actors (repeatable)
    #[arg(long = "actor")]
    actors: Vec<String>,

    /// Keep only these sentiment labels (repeatable)
    #[arg(long = "sentiment")]
    sentiments: Vec<String>,

    /// Keep only these topics (repeatable)
    #[arg(long = "topic")]
    topics: Vec<String>,

    /// Keep only these intents (repeatable)
    #[arg(long = "intent")]
    intents: Vec<String>,

    /// Keep only these regions (repeatable)
    #[arg(long = "region")]
    regions: Vec<String>,

    /// last_24_hours, last_7_days, last_30_days or all_time
    #[arg(long, default_value = "all_time")]
    window: TimeWindow,

    /// Case-insensitive text search over messages and replies
    #[arg(long)]
    search: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> EventFilter {
        let mut filter = EventFilter::new()
            .actors(self.actors.iter().cloned())
            .sentiments(self.sentiments.iter().map(|s| SentimentLabel::from(s.as_str())))
            .topics(self.topics.iter().map(|s| Topic::from(s.as_str())))
            .intents(self.intents.iter().map(|s| Intent::from(s.as_str())))
            .regions(self.regions.iter().map(|s| Region::from(s.as_str())))
            .window(self.window);
        if let Some(term) = &self.search {
            filter = filter.search(term.clone());
        }
        filter
    }
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn apply_filter(events: Vec<ChatEvent>, args: &FilterArgs) -> Vec<ChatEvent> {
    let filter = args.to_filter();
    if filter.is_unrestricted() {
        return events;
    }
    let before = events.len();
    let kept = filter.apply(&events, Utc::now());
    info!(before, after = kept.len(), "applied event filter");
    kept
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ChatlensConfig::load(cli.config.as_deref())?;
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging = logging.verbose();
    }
    if cli.json_logs {
        logging = logging.json(true);
    }
    init_logging(&logging).context("Failed to initialize logging")?;
    debug!(?config, "loaded configuration");

    let generator = SyntheticEventGenerator::new(config.profiles.clone(), config.synthetic.clone())
        .context("Failed to build synthetic generator")?;

    match cli.command {
        Commands::Generate {
            count,
            seed,
            output,
        } => {
            let events = generator
                .generate(count, &mut rng_for(seed))
                .context("Failed to generate events")?;
            match output {
                Some(path) => {
                    JsonFileEventStore::write(&path, &events)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), count = events.len(), "wrote synthetic events");
                }
                None => println!("{}", serde_json::to_string_pretty(&events)?),
            }
        }

        Commands::Analyze {
            input,
            count,
            seed,
            filter,
        } => {
            let store: Box<dyn EventStore> = match input {
                Some(path) => Box::new(JsonFileEventStore::new(path)),
                None => Box::new(InMemoryEventStore::default()),
            };
            let loaded = load_or_synthesize(
                &*store,
                &generator,
                count,
                &mut rng_for(seed),
                Utc::now(),
            )
            .context("Failed to load events")?;
            info!(source = %loaded.source, events = loaded.events.len(), "events ready");

            let events = apply_filter(loaded.events, &filter);
            let snapshot = DashboardSnapshot::compute(&events, &config.analytics)
                .context("Failed to compute dashboard snapshot")?;
            println!("{}", snapshot.to_json_pretty()?);
        }

        Commands::Export {
            input,
            output,
            filter,
        } => {
            let events = JsonFileEventStore::new(&input)
                .fetch_all()
                .with_context(|| format!("Failed to read events from {}", input.display()))?;
            let events = apply_filter(events, &filter);
            let rows = write_csv_file(&events, &output)
                .with_context(|| format!("Failed to export to {}", output.display()))?;
            println!("✓ Exported {} events to {}", rows, output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_flags_map_to_filter() {
        let cli = Cli::parse_from([
            "chatlens",
            "analyze",
            "--actor",
            "user1",
            "--actor",
            "user2",
            "--sentiment",
            "negative",
            "--topic",
            "billing questions",
            "--window",
            "last_7_days",
        ]);
        let Commands::Analyze { filter, .. } = cli.command else {
            panic!("expected analyze");
        };
        let filter = filter.to_filter();
        assert_eq!(filter.actors, vec!["user1", "user2"]);
        assert_eq!(filter.sentiments, vec![SentimentLabel::Negative]);
        assert_eq!(filter.topics, vec![Topic::from("billing questions")]);
        assert_eq!(filter.window, TimeWindow::Last7Days);
        assert!(!filter.is_unrestricted());
    }

    #[test]
    fn test_default_filter_is_unrestricted() {
        let cli = Cli::parse_from(["chatlens", "--verbose", "generate", "-n", "5"]);
        assert!(cli.verbose);
        let Commands::Generate { count, seed, .. } = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(count, 5);
        assert_eq!(seed, None);
        assert!(FilterArgs::default().to_filter().is_unrestricted());
    }
}
