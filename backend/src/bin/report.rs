//! Command-line coverage report.
//!
//! ```bash
//! tro-report pages.csv                    # revenue priority
//! tro-report pages.csv traffic out.csv
//! ```
//!
//! Prints the summary table and writes the combined export. Validation
//! failures are listed one per line and exit with status 1.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use tro_rust::config::AppConfig;
use tro_rust::error::CoverageError;
use tro_rust::models::PriorityMetric;
use tro_rust::preprocessing::IngestPipeline;
use tro_rust::services::{analyze, report::render_summary_table};

const USAGE: &str = "usage: tro-report <input.csv> [traffic|revenue] [output.csv]";

struct Args {
    input: PathBuf,
    priority: Option<PriorityMetric>,
    output: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let (input, rest) = match args.split_first() {
        Some((input, rest)) => (PathBuf::from(input), rest),
        None => bail!(USAGE),
    };
    if rest.len() > 2 {
        bail!(USAGE);
    }

    let priority = rest
        .first()
        .map(|p| p.parse::<PriorityMetric>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("{}\n{}", e, USAGE))?;
    let output = rest.get(1).map(PathBuf::from);

    Ok(Args {
        input,
        priority,
        output,
    })
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let priority = args.priority.unwrap_or(config.coverage.priority);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.coverage.export_filename));

    let dataset = IngestPipeline::ingest_file(&args.input)?;
    for warning in &dataset.warnings {
        eprintln!("warning: {}", warning);
    }

    let report = analyze(&dataset, priority, &config.coverage.thresholds)?;
    print!("{}", render_summary_table(&report.summary));

    std::fs::write(&output, report.export_csv()?)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Export written to {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::WARN),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let result = parse_args(&args).and_then(run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CoverageError>() {
                Some(CoverageError::Validation(errors)) => {
                    for error in errors.errors() {
                        eprintln!("{}", error);
                    }
                }
                _ => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}
