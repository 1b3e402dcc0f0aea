//! `overlaps` CLI — validate event snapshots and report overlapping events.
//!
//! ## Usage
//!
//! ```sh
//! # Report overlapping pairs (stdin → stdout)
//! cat events.json | overlaps detect
//!
//! # From file to file, with overlap durations
//! overlaps detect -i events.json -o overlaps.json --detailed
//!
//! # Check every event in a snapshot
//! overlaps validate -i events.json
//!
//! # Print the normalized events (ids assigned, times in RFC 3339)
//! overlaps list -i events.json
//!
//! # Debug logging on stderr
//! RUST_LOG=overlap_engine=debug overlaps detect -i events.json
//! ```
//!
//! Input is a JSON array of objects with `title`, `startTime`, `endTime` and an
//! optional `description`.

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use overlap_engine::{find_overlaps, EventDraft, EventService, InMemoryEventStore};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "overlaps",
    version,
    about = "Validate calendar events and report which ones overlap"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity on stderr (-v info, -vv debug). RUST_LOG wins if set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Report every pair of overlapping events
    Detect {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Include the overlap duration in minutes for each pair
        #[arg(long)]
        detailed: bool,
    },
    /// Validate every event and report the problems found
    Validate {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the validated events as JSON
    List {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// A pair with its overlap duration, as printed by `detect --detailed`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailedPair<'a> {
    event1: &'a str,
    event2: &'a str,
    overlap_minutes: i64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Detect {
            input,
            output,
            detailed,
        } => {
            let service = load_events(input.as_deref())?;
            let json = if detailed {
                let snapshot = service.list()?;
                let pairs: Vec<DetailedPair<'_>> = find_overlaps(&snapshot)
                    .iter()
                    .map(|o| DetailedPair {
                        event1: o.first.title(),
                        event2: o.second.title(),
                        overlap_minutes: o.overlap_minutes,
                    })
                    .collect();
                info!(overlaps = pairs.len(), "detect_complete");
                serde_json::to_string_pretty(&pairs)?
            } else {
                let pairs = service.overlaps()?;
                info!(overlaps = pairs.len(), "detect_complete");
                serde_json::to_string_pretty(&pairs)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Validate { input } => {
            let drafts = read_drafts(input.as_deref())?;
            let service = EventService::new(InMemoryEventStore::new());
            let mut invalid = 0usize;
            for (index, draft) in drafts.iter().enumerate() {
                match service.create(draft) {
                    Ok(event) => println!("event {index} ({:?}): ok", event.title()),
                    Err(err) => {
                        invalid += 1;
                        for message in err.messages() {
                            println!("event {index}: {message}");
                        }
                    }
                }
            }
            if invalid > 0 {
                bail!("{invalid} of {} events are invalid", drafts.len());
            }
            println!("{} events valid", drafts.len());
        }
        Commands::List { input } => {
            let service = load_events(input.as_deref())?;
            let events = service.list()?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_drafts(path: Option<&str>) -> Result<Vec<EventDraft>> {
    let json = read_input(path)?;
    let drafts: Vec<EventDraft> =
        serde_json::from_str(&json).context("Failed to parse events JSON")?;
    debug!(count = drafts.len(), "drafts_read");
    Ok(drafts)
}

/// Validate every draft into a fresh in-memory store.
///
/// Fails if any draft is invalid, listing every problem with its event index.
fn load_events(path: Option<&str>) -> Result<EventService<InMemoryEventStore>> {
    let drafts = read_drafts(path)?;
    let service = EventService::new(InMemoryEventStore::new());

    let mut problems = Vec::new();
    for (index, draft) in drafts.iter().enumerate() {
        if let Err(err) = service.create(draft) {
            problems.push(format!("event {index}: {err}"));
        }
    }
    if !problems.is_empty() {
        bail!("Invalid events in input:\n{}", problems.join("\n"));
    }

    info!(events = service.store().len(), "snapshot_loaded");
    Ok(service)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
