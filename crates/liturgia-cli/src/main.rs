//! messa - build the mass sheet for a Sunday
//!
//! ```text
//! messa                       # next Sunday
//! messa 2024-12-01 --no-save  # print only
//! messa 2024-12-01 --readings-html letture.html
//! ```
//!
//! Exit code 1 on any error.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;
use liturgia_core::{calendar, parse_date, Result};
use liturgia_pipeline::{Config, Pipeline, PipelineOutput};
use liturgia_readings::FileReadingsGateway;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the Sunday mass sheet: readings, antiphons and suggested hymns
#[derive(Parser, Debug)]
#[command(name = "messa")]
#[command(version)]
#[command(about = "Build the Sunday mass sheet with readings and suggested hymns")]
struct Cli {
    /// Date (YYYY-MM-DD); defaults to the next Sunday
    date: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hymn catalog, overrides the configuration
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output directory, overrides the configuration
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Do not write the sheet to disk
    #[arg(long)]
    no_save: bool,

    /// Parse a saved readings page instead of downloading it
    #[arg(long)]
    readings_html: Option<PathBuf>,

    /// Sentence-transformer directory, overrides the configuration
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Prefer hymns tagged with the day's season
    #[arg(long)]
    season_filter: bool,

    /// Print the whole sheet as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let date = target_date(cli.date.as_deref())?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(dir) = cli.model_dir {
        config.model_dir = Some(dir);
    }
    if cli.no_save {
        config.save = false;
    }
    if cli.season_filter {
        config.season_filter = true;
    }
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let pipeline = match cli.readings_html {
        Some(page) => Pipeline::with_gateway(config, Box::new(FileReadingsGateway::new(page))),
        None => Pipeline::new(config)?,
    };
    let output = pipeline.run(date)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.sheet)?);
    } else {
        print_summary(&output);
    }
    Ok(())
}

fn target_date(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(text) if !text.trim().is_empty() => parse_date(text),
        _ => {
            let sunday = calendar::next_sunday_after(Local::now().date_naive());
            eprintln!("No date given, using next Sunday {}", sunday);
            Ok(sunday)
        }
    }
}

fn print_summary(output: &PipelineOutput) {
    println!("{}", output.sheet.title);
    for rec in &output.report.recommendations {
        let reused = if rec.duplicate { " (reused)" } else { "" };
        println!("  {:<10} {} [{:.3}]{}", rec.category, rec.title, rec.score, reused);
    }
    for category in &output.report.unfilled {
        println!("  {:<10} -", category);
    }
    if let Some(path) = &output.saved_to {
        println!("Saved to {}", path.display());
    }
}
