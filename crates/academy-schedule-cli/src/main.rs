//! `academy-schedule` CLI — timetable conflicts, to-do recurrence and month
//! layout from the command line.
//!
//! Every subcommand reads JSON from `-i FILE` (or stdin) and writes JSON to
//! `-o FILE` (or stdout).
//!
//! ## Usage
//!
//! ```sh
//! # Would this class clash with the student's other classes?
//! academy-schedule conflicts -i enroll.json
//!
//! # List every clash, not just the first
//! academy-schedule conflicts --all -i enroll.json
//!
//! # Does a to-do rule apply on a date?
//! echo '{"kind":"weekly","anchor_date":"2026-01-05","due_date":"2026-01-05"}' \
//!   | academy-schedule applies-on --date 2026-01-12
//!
//! # Done, pending or overdue, judged as of an explicit date
//! academy-schedule status --date 2026-01-10 --assignee s1 --today 2026-01-11 -i todo.json
//!
//! # Occurrence marks for a calendar view
//! academy-schedule occurrences --from 2026-01-01 --to 2026-01-31 -i rule.json
//!
//! # Flip completion for one assignee
//! academy-schedule toggle --date 2026-01-12 --assignee s1 -i records.json
//!
//! # Lay out range events over a month grid
//! academy-schedule layout --month 2026-02 --week-start monday -i events.json
//! ```

mod config;

use academy_schedule::layout::{layout_month, RangeEvent, WeekSegment};
use academy_schedule::occurrence::{toggle, CompletionRecord, OccurrenceTracker};
use academy_schedule::recurrence::RecurrenceRule;
use academy_schedule::schedule::WeeklySchedule;
use academy_schedule::{conflict, parse_date, WeekStart};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(
    name = "academy-schedule",
    version,
    about = "Timetable conflicts, to-do recurrence and calendar layout"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter directives (overrides RUST_LOG), e.g. "debug"
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(clap::Args)]
struct Io {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a candidate schedule against existing ones: {"candidate": .., "existing": [..]}
    Conflicts {
        #[command(flatten)]
        io: Io,
        /// Report every clash instead of the first
        #[arg(long)]
        all: bool,
    },
    /// Print whether a recurrence rule applies on a date
    AppliesOn {
        #[command(flatten)]
        io: Io,
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
    },
    /// List a rule's occurrence dates within an inclusive window
    Occurrences {
        #[command(flatten)]
        io: Io,
        #[arg(long, value_parser = date_arg)]
        from: NaiveDate,
        #[arg(long, value_parser = date_arg)]
        to: NaiveDate,
    },
    /// Status of one occurrence for one assignee: {"rule": .., "records": [..]}
    Status {
        #[command(flatten)]
        io: Io,
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
        #[arg(long)]
        assignee: String,
        /// Reference date for overdue checks, YYYY-MM-DD. Required so that
        /// results never depend on the machine's clock or time zone.
        #[arg(long, value_parser = date_arg)]
        today: NaiveDate,
    },
    /// Toggle completion of one occurrence in a records array
    Toggle {
        #[command(flatten)]
        io: Io,
        #[arg(long, value_parser = date_arg)]
        date: NaiveDate,
        #[arg(long)]
        assignee: String,
    },
    /// Lay out multi-day events over a month grid
    Layout {
        #[command(flatten)]
        io: Io,
        /// Month as YYYY-MM
        #[arg(long, value_parser = month_arg)]
        month: (i32, u32),
        /// First column of the grid (overrides ACADEMY_WEEK_START)
        #[arg(long)]
        week_start: Option<WeekStart>,
    },
}

#[derive(Deserialize)]
struct ConflictRequest {
    candidate: WeeklySchedule,
    #[serde(default)]
    existing: Vec<WeeklySchedule>,
}

#[derive(Deserialize)]
struct StatusRequest {
    rule: RecurrenceRule,
    #[serde(default)]
    records: Vec<CompletionRecord>,
}

#[derive(Serialize)]
struct LayoutRow {
    dates: Vec<NaiveDate>,
    segments: Vec<WeekSegment>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::from_env()?;

    let filter = cli.log_level.as_deref().unwrap_or(&config.log_filter);
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).context("Invalid --log-level")?)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Conflicts { io, all } => {
            let request: ConflictRequest = read_json(&io)?;
            let json = if all {
                let found = conflict::find_all(&request.candidate, &request.existing);
                serde_json::to_string_pretty(&found)?
            } else {
                let found = conflict::check(&request.candidate, &request.existing);
                serde_json::to_string_pretty(&found)?
            };
            write_output(io.output.as_deref(), &json)?;
        }
        Commands::AppliesOn { io, date } => {
            let rule: RecurrenceRule = read_json(&io)?;
            write_output(io.output.as_deref(), &rule.applies_on(date).to_string())?;
        }
        Commands::Occurrences { io, from, to } => {
            anyhow::ensure!(from <= to, "--from {} is after --to {}", from, to);
            let rule: RecurrenceRule = read_json(&io)?;
            let dates = rule.occurrences_between(from, to);
            write_output(io.output.as_deref(), &serde_json::to_string_pretty(&dates)?)?;
        }
        Commands::Status {
            io,
            date,
            assignee,
            today,
        } => {
            let request: StatusRequest = read_json(&io)?;
            let status = OccurrenceTracker::new(&request.rule, &request.records)
                .status(date, &assignee, today);
            write_output(io.output.as_deref(), &serde_json::to_string(&status)?)?;
        }
        Commands::Toggle { io, date, assignee } => {
            let records: Vec<CompletionRecord> = read_json(&io)?;
            let next = toggle(&records, date, &assignee);
            write_output(io.output.as_deref(), &serde_json::to_string_pretty(&next)?)?;
        }
        Commands::Layout {
            io,
            month: (year, month),
            week_start,
        } => {
            let events: Vec<RangeEvent> = read_json(&io)?;
            let week_start = week_start.unwrap_or(config.week_start);
            tracing::info!(year, month, %week_start, events = events.len(), "laying out month");
            let rows: Vec<LayoutRow> = layout_month(year, month, week_start, &events)
                .context("Failed to lay out month")?
                .into_iter()
                .map(|(row, segments)| LayoutRow {
                    dates: row.dates().to_vec(),
                    segments,
                })
                .collect();
            write_output(io.output.as_deref(), &serde_json::to_string_pretty(&rows)?)?;
        }
    }

    Ok(())
}

fn date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

/// Parse `YYYY-MM` into `(year, month)`.
fn month_arg(s: &str) -> std::result::Result<(i32, u32), String> {
    let invalid = || format!("Invalid month: '{}' (expected YYYY-MM)", s);
    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

fn read_json<T: serde::de::DeserializeOwned>(io: &Io) -> Result<T> {
    let raw = read_input(io.input.as_deref())?;
    serde_json::from_str(&raw).context("Failed to parse input JSON")
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
