//! Fetch MAPD formulary records for Devoted, UHC, Humana, Wellcare and Aetna
//! plans in Florida and write them to `florida_mapd_formulary.csv`.

use anyhow::Context;

use formulary_fetch::export::{self, ExportFormat, ExportOutcome};
use formulary_fetch::logging::init_tracing;
use formulary_fetch::{BatchConfig, Config, FormularyClient, run_batch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info", false);

    let client = FormularyClient::new(Config::from_env()?)?;
    let config = BatchConfig::default();

    let report = run_batch(&client, &config).await;

    let failed: Vec<&str> = report.failures().map(|f| f.organization.as_str()).collect();
    if !failed.is_empty() {
        tracing::warn!(organizations = %failed.join(", "), "Skipped after fetch errors");
    }

    let records = report.records();
    let outcome = export::export(&records, ExportFormat::Csv, Some(config.output_path.as_path()))
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;

    match outcome {
        ExportOutcome::Written { records, .. } => {
            tracing::info!(records, path = %config.output_path.display(), "Data exported");
        }
        ExportOutcome::Skipped => tracing::warn!("No matching records found"),
    }

    Ok(())
}
