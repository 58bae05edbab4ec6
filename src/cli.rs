//! CLI interface for Callsheet.
//!
//! Every subcommand is non-interactive: arguments in, JSON out on stdout.
//! Short human-readable notes go to stderr so the JSON can be piped.
//!
//! Records are referenced by full UUID or an unambiguous prefix (e.g. `a3b`).

mod format;
mod resolve;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use jiff::civil::Date;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::Settings;
use crate::costing::compute_job_financials;
use crate::interval::Interval;
use crate::ledger::Ledger;
use crate::model::{CrewMember, InventoryItem, Job, Rental, Snapshot};
use crate::rest::{evaluate_rest, evaluate_roster};
use crate::rollup::build_yearly_report;
use crate::storage::{Admission, Storage};

use format::{describe_admission, describe_availability, describe_financials, describe_rest};
use resolve::resolve;

/// Callsheet: gear, crew, and money for live productions.
#[derive(Debug, Parser)]
#[command(name = "callsheet", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Production book to use. Defaults to `~/.callsheet/book.sqlite`.
    #[arg(long, global = true)]
    book: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r#"Workflow:
  1. callsheet import snapshot.json
  2. callsheet availability 6f1c --from 2025-01-04 --to 2025-01-04
  3. callsheet reserve job new-job.json
  4. callsheet costs 0d8f
  5. callsheet report 2025
  6. callsheet rest --all --year 2025 --month 1"#;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a JSON snapshot into the book, replacing records with the same id.
    Import {
        /// Snapshot file with any of: inventory, jobs, rentals, crew,
        /// companyExpenses, recurringPayments, personnelCosts.
        file: PathBuf,
    },

    /// How many units of an item are free over a date range, and who holds the rest.
    Availability {
        /// Inventory item ID or prefix.
        item: String,

        /// First day, inclusive (YYYY-MM-DD).
        #[arg(long)]
        from: Date,

        /// Last day, inclusive (YYYY-MM-DD). Defaults to `--from`.
        #[arg(long)]
        to: Option<Date>,

        /// Booking (job or rental) to leave out, e.g. the one being edited.
        #[arg(long)]
        exclude: Option<String>,
    },

    /// Direct costs, revenue, and margin for a job.
    Costs {
        /// Job ID or prefix.
        job: String,
    },

    /// Monthly revenue and cost for a year, with totals and a cost breakdown.
    Report { year: i16 },

    /// Worked days and missed rest days for a month.
    Rest {
        /// Crew member ID or prefix. Omit with `--all`.
        crew: Option<String>,

        /// Evaluate the whole roster.
        #[arg(long, conflicts_with = "crew")]
        all: bool,

        #[arg(long)]
        year: i16,

        #[arg(long)]
        month: i8,
    },

    /// Create or update a booking only if its gear fits.
    ///
    /// Exits non-zero and writes nothing when any item would be over-allocated.
    Reserve {
        #[command(subcommand)]
        booking: ReserveBooking,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReserveBooking {
    /// Reserve a job from a JSON file.
    Job { file: PathBuf },

    /// Reserve a rental from a JSON file.
    Rental { file: PathBuf },
}

/// Run the CLI, returning an error message on failure.
pub fn run(settings: &Settings) -> Result<(), String> {
    let cli = Cli::parse();

    let path = match cli.book {
        Some(p) => p,
        None => Storage::default_path().ok_or("could not determine home directory")?,
    };
    let storage =
        Storage::open(&path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;

    match cli.command {
        Command::Import { file } => cmd_import(&storage, &file),
        Command::Availability {
            item,
            from,
            to,
            exclude,
        } => cmd_availability(&storage, &item, from, to, exclude.as_deref()),
        Command::Costs { job } => cmd_costs(&storage, settings, &job),
        Command::Report { year } => cmd_report(&storage, settings, year),
        Command::Rest {
            crew,
            all,
            year,
            month,
        } => cmd_rest(&storage, settings, crew.as_deref(), all, year, month),
        Command::Reserve { booking } => match booking {
            ReserveBooking::Job { file } => {
                let job: Job = read_json(&file)?;
                let admission = storage
                    .reserve_job(&job)
                    .map_err(|e| format!("failed to reserve job: {e}"))?;
                report_admission(&job.name, &admission)
            }
            ReserveBooking::Rental { file } => {
                let rental: Rental = read_json(&file)?;
                let admission = storage
                    .reserve_rental(&rental)
                    .map_err(|e| format!("failed to reserve rental: {e}"))?;
                report_admission(&rental.client, &admission)
            }
        },
    }
}

fn load(storage: &Storage) -> Result<Snapshot, String> {
    storage
        .load_snapshot()
        .map_err(|e| format!("failed to load book: {e}"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| format!("invalid JSON in {}: {e}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}

fn cmd_import(storage: &Storage, file: &Path) -> Result<(), String> {
    let snapshot: Snapshot = read_json(file)?;
    let written = storage
        .import(&snapshot)
        .map_err(|e| format!("failed to import: {e}"))?;
    eprintln!("Imported {written} record(s) from {}", file.display());
    Ok(())
}

fn cmd_availability(
    storage: &Storage,
    item: &str,
    from: Date,
    to: Option<Date>,
    exclude: Option<&str>,
) -> Result<(), String> {
    let snapshot = load(storage)?;
    let item: &InventoryItem = resolve(&snapshot.inventory, item)?;
    let ledger = Ledger::from_snapshot(&snapshot);
    let exclude = match exclude {
        Some(r) => Some(resolve(ledger.bookings(), r)?.id),
        None => None,
    };

    let interval = Interval::new(from, to.unwrap_or(from));
    let availability = ledger.check_availability(item.id, &interval, exclude);

    eprintln!("{}", describe_availability(item, &interval, &availability));
    print_json(&availability)
}

fn cmd_costs(storage: &Storage, settings: &Settings, job: &str) -> Result<(), String> {
    let snapshot = load(storage)?;
    let job: &Job = resolve(&snapshot.jobs, job)?;
    let financials = compute_job_financials(job, &snapshot.crew, settings);

    eprintln!("{}", describe_financials(job, &financials));
    print_json(&financials)
}

fn cmd_report(storage: &Storage, settings: &Settings, year: i16) -> Result<(), String> {
    let snapshot = load(storage)?;
    let report = build_yearly_report(year, &snapshot, settings);

    eprintln!(
        "{year}: revenue {}, cost {}, net {}",
        report.total_revenue.round_dp(2),
        report.total_cost.round_dp(2),
        report.net_profit.round_dp(2),
    );
    print_json(&report)
}

fn cmd_rest(
    storage: &Storage,
    settings: &Settings,
    crew: Option<&str>,
    all: bool,
    year: i16,
    month: i8,
) -> Result<(), String> {
    if !(1..=12).contains(&month) {
        return Err(format!("month must be 1-12, got {month}"));
    }
    let snapshot = load(storage)?;

    if all {
        let reports = evaluate_roster(&snapshot.jobs, &snapshot.crew, year, month, settings);
        for r in &reports {
            eprintln!("{}", describe_rest(&r.name, &r.report));
        }
        return print_json(&reports);
    }

    let reference = crew.ok_or("specify a crew member or --all")?;
    let member: &CrewMember = resolve(&snapshot.crew, reference)?;
    let report = evaluate_rest(&snapshot.jobs, member.id, year, month, settings);

    eprintln!("{}", describe_rest(&member.name, &report));
    print_json(&report)
}

fn report_admission(label: &str, admission: &Admission) -> Result<(), String> {
    eprintln!("{}", describe_admission(label, admission));
    print_json(admission)?;
    match admission {
        Admission::Committed => Ok(()),
        Admission::Rejected { .. } => Err(format!("reservation for '{label}' rejected")),
    }
}
