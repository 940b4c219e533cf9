//! # concrete-qa
//!
//! Command-line front end for concrete_core.
//!
//! ## Commands
//!
//! - `run`: Evaluate one batch file and print the result
//! - `report`: Evaluate several batch files into one JSON report
//! - `check`: Validate batch files without computing them
//! - `tables`: Print the correction tables in effect
//!
//! Results go to stdout, logs to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};

use concrete_core::calculations::TestBatch;
use concrete_core::report::TestReport;
use concrete_core::tables::{CorrectionTables, FgDiameterPolicy};
use concrete_core::telemetry::init_tracing;

#[derive(Parser)]
#[command(name = "concrete-qa")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concrete core, pull-off and Schmidt hammer test calculations", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Correction table overrides (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    tables: Option<PathBuf>,

    /// Snap core diameters to the nearest grid diameter before the Fg lookup
    #[arg(long, global = true)]
    snap_fg_diameter: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single batch file
    Run {
        /// Batch JSON with a "protocol" tag
        batch: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Evaluate batch files into one report
    Report {
        /// Batch JSON files, evaluated in order
        #[arg(required = true)]
        batches: Vec<PathBuf>,

        #[arg(long, default_value = "")]
        laboratory: String,

        #[arg(long, default_value = "")]
        job_id: String,

        #[arg(long, default_value = "")]
        client: String,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate batch files without computing them
    Check {
        #[arg(required = true)]
        batches: Vec<PathBuf>,
    },

    /// Print the effective correction tables
    Tables,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json_logs, level);

    let tables = load_tables(cli.tables.as_deref(), cli.snap_fg_diameter)?;
    debug!(fg_diameter = %tables.settings.fg_diameter_policy, "correction tables ready");

    match cli.command {
        Commands::Run { batch, format } => cmd_run(&batch, format, &tables),
        Commands::Report {
            batches,
            laboratory,
            job_id,
            client,
            output,
        } => cmd_report(&batches, &laboratory, &job_id, &client, output.as_deref(), &tables),
        Commands::Check { batches } => cmd_check(&batches),
        Commands::Tables => cmd_tables(&tables),
    }
}

fn load_tables(path: Option<&Path>, snap_fg_diameter: bool) -> Result<CorrectionTables> {
    let tables = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read tables file: {:?}", path))?;
            let tables = CorrectionTables::from_json(&json)
                .with_context(|| format!("Invalid tables file: {:?}", path))?;
            info!(path = ?path, "loaded correction table overrides");
            tables
        }
        None => CorrectionTables::default(),
    };

    Ok(if snap_fg_diameter {
        tables.with_fg_policy(FgDiameterPolicy::SnapToStandard)
    } else {
        tables
    })
}

fn read_batch(path: &Path) -> Result<TestBatch> {
    let json = std::fs::read_to_string(path).with_context(|| format!("Failed to read batch file: {:?}", path))?;
    let batch: TestBatch =
        serde_json::from_str(&json).with_context(|| format!("Batch file is not a valid test batch: {:?}", path))?;
    debug!(path = ?path, protocol = batch.protocol(), label = batch.label(), "batch loaded");
    Ok(batch)
}

fn cmd_run(path: &Path, format: OutputFormat, tables: &CorrectionTables) -> Result<()> {
    let batch = read_batch(path)?;
    let outcome = batch
        .evaluate(tables)
        .with_context(|| format!("Batch '{}' failed validation", batch.label()))?;

    match format {
        OutputFormat::Text => println!("{}", outcome.format_report()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}

fn cmd_report(
    paths: &[PathBuf],
    laboratory: &str,
    job_id: &str,
    client: &str,
    output: Option<&Path>,
    tables: &CorrectionTables,
) -> Result<()> {
    let mut report = TestReport::new(laboratory, job_id, client, tables.settings);
    for path in paths {
        let batch = read_batch(path)?;
        let id = report
            .evaluate_and_add(&batch, tables)
            .with_context(|| format!("Batch '{}' in {:?} failed validation", batch.label(), path))?;
        info!(%id, protocol = batch.protocol(), label = batch.label(), "batch evaluated");
    }

    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json).with_context(|| format!("Failed to write report to {:?}", path))?;
            info!(path = ?path, entries = report.entry_count(), "report written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_check(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        check_batch(path)?;
        println!("{}: ok", path.display());
    }
    Ok(())
}

fn check_batch(path: &Path) -> Result<TestBatch> {
    let batch = read_batch(path)?;
    batch
        .validate()
        .with_context(|| format!("Batch '{}' in {:?} failed validation", batch.label(), path))?;
    Ok(batch)
}

fn cmd_tables(tables: &CorrectionTables) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(tables)?);
    Ok(())
}
