//! CSV and JSON export of record lists.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ExportResult;
use crate::models::Record;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Comma-separated values with a sorted-union header row
    #[default]
    Csv,
    /// Indented JSON array
    Json,
}

/// What an export call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Records were written.
    Written {
        /// Number of records written
        records: usize,
        /// File path, or `None` for stdout
        destination: Option<PathBuf>,
    },
    /// Nothing to export; nothing was written.
    Skipped,
}

impl ExportOutcome {
    /// Returns true if anything was written.
    #[must_use]
    pub const fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Sorted union of every field name across `records`.
#[must_use]
pub fn csv_header(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.fields())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Write `records` as CSV. Missing fields and nulls become empty cells.
pub fn write_csv<W: Write>(records: &[Record], writer: W) -> ExportResult<()> {
    let header = csv_header(records);
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|field| record.get(field).unwrap_or("")))?;
    }

    writer.flush()?;
    Ok(())
}

/// Write `records` as a 2-space indented JSON array followed by a newline.
pub fn write_json<W: Write>(records: &[Record], mut writer: W) -> ExportResult<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Export `records` to a file, or to stdout when `destination` is `None`.
///
/// An empty list logs a warning and writes nothing, not even a header.
/// The file is closed when this returns, including on write errors.
pub fn export(
    records: &[Record],
    format: ExportFormat,
    destination: Option<&Path>,
) -> ExportResult<ExportOutcome> {
    if records.is_empty() {
        tracing::warn!("No data to export");
        return Ok(ExportOutcome::Skipped);
    }

    match destination {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            write_format(records, format, file)?;
            tracing::debug!(path = %path.display(), records = records.len(), ?format, "Wrote export");
        }
        None => write_format(records, format, io::stdout().lock())?,
    }

    Ok(ExportOutcome::Written {
        records: records.len(),
        destination: destination.map(Path::to_path_buf),
    })
}

fn write_format<W: Write>(records: &[Record], format: ExportFormat, writer: W) -> ExportResult<()> {
    match format {
        ExportFormat::Csv => write_csv(records, writer),
        ExportFormat::Json => write_json(records, writer),
    }
}
