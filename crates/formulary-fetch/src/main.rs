//! Formulary Fetch - Entry Point
//!
//! Fetches one page of formulary records and writes it as CSV or JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use formulary_fetch::export::{self, ExportFormat};
use formulary_fetch::filter::RecordFilter;
use formulary_fetch::logging::init_tracing;
use formulary_fetch::{Config, FormularyClient};

#[derive(Parser, Debug)]
#[command(name = "formulary-fetch")]
#[command(about = "Fetch CMS Monthly Prescription Drug Plan Formulary data")]
#[command(version)]
struct Cli {
    /// Number of records to retrieve
    #[arg(long)]
    size: Option<u64>,

    /// Starting position for pagination
    #[arg(long)]
    offset: Option<u64>,

    /// Output file (default: stdout)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output as JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// Keep only records whose organization name contains this text
    #[arg(long)]
    organization: Option<String>,

    /// Keep only records for this two-letter state code
    #[arg(long)]
    state: Option<String>,

    /// Dataset API root (for mirrors and testing)
    #[arg(long, env = "FORMULARY_API_BASE_URL")]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(base_url) = cli.base_url.filter(|u| !u.is_empty()) {
        config = config.with_base_url(base_url);
    }

    let client = FormularyClient::new(config)?;
    let fetched = client.fetch(cli.size, cli.offset).await.context("Error fetching data")?;
    let fetched_count = fetched.len();

    let mut filter = RecordFilter::new();
    if let Some(org) = &cli.organization {
        filter = filter.organization(org);
    }
    if let Some(state) = &cli.state {
        filter = filter.state(state);
    }
    let records = filter.apply(&fetched);

    let format = if cli.json { ExportFormat::Json } else { ExportFormat::Csv };
    export::export(&records, format, cli.output.as_deref())
        .with_context(|| match &cli.output {
            Some(path) => format!("Failed to write {}", path.display()),
            None => "Failed to write to stdout".to_string(),
        })?;

    tracing::info!(kept = records.len(), "Retrieved {} records", fetched_count);

    Ok(())
}
