//! Catalog checker.
//!
//! Loads a catalog JSON file and reports every season that cannot be played
//! (empty, duplicate ids, air orders that are not exactly `1..=N`). Exits
//! non-zero when any season has problems.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use guesseries::catalog::{audit, Catalog, SeasonReport};
use guesseries::types::Language;

#[derive(Parser)]
#[command(author, version, about = "Check a series catalog for unplayable seasons")]
struct Cli {
    /// Catalog JSON file (an array of series)
    #[arg(default_value = "data/series.json")]
    catalog: PathBuf,
    /// Only check this series id
    #[arg(short, long)]
    series: Option<String>,
    /// Skip malformed entries instead of failing
    #[arg(long, default_value_t = false)]
    lenient: bool,
    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Language for series titles (en, es)
    #[arg(long, default_value = "en")]
    lang: String,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let language = Language::from_str(&cli.lang)
        .with_context(|| format!("unsupported language: {}", cli.lang))?;

    let raw = fs::read_to_string(&cli.catalog)
        .with_context(|| format!("reading {}", cli.catalog.display()))?;
    let catalog = if cli.lenient {
        Catalog::from_json_lenient(&raw)
    } else {
        Catalog::from_json(&raw)
    }
    .with_context(|| format!("parsing {}", cli.catalog.display()))?;

    let reports: Vec<SeasonReport> = audit(&catalog)
        .into_iter()
        .filter(|r| cli.series.as_deref().map_or(true, |id| r.series_id == id))
        .collect();

    if let Some(id) = &cli.series {
        if catalog.find(id).is_none() {
            anyhow::bail!("series not found: {}", id);
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            let title = catalog
                .find(&report.series_id)
                .map(|s| s.title.text(language))
                .unwrap_or("");
            if report.is_playable() {
                println!(
                    "ok    {} ({}) season {}: {} episodes",
                    report.series_id, title, report.season_number, report.episode_count
                );
            } else {
                println!(
                    "FAIL  {} ({}) season {}: {} episodes",
                    report.series_id, title, report.season_number, report.episode_count
                );
                for issue in &report.issues {
                    println!("        - {}", issue);
                }
            }
        }
    }

    let failing = reports.iter().filter(|r| !r.is_playable()).count();
    tracing::info!(seasons = reports.len(), failing, "catalog checked");

    Ok(if failing == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
