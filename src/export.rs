//! JSON and CSV writers for normalized records.
//!
//! The JSON array and CSV writers buffer the batch so that a failed batch
//! leaves the output untouched. JSON lines streams record by record.
//!
//! Writers take any error type convertible into [`ExportError`], so both
//! normalization failures and upstream read failures abort the export.
use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::error::ExportError;
use crate::record::{BASE_FIELDS, FieldValue, Normalized};

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// One compact JSON object per line
    Jsonl,
    /// Comma-separated values with a header row
    Csv,
}

/// Writes `records` to `writer` in `format`, returning the number of records written.
pub fn write<W, I, E>(format: ExportFormat, writer: W, records: I) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = Result<Normalized, E>>,
    ExportError: From<E>,
{
    match format {
        ExportFormat::Json => write_json(writer, records),
        ExportFormat::Jsonl => write_json_lines(writer, records),
        ExportFormat::Csv => write_csv(writer, records),
    }
}

pub fn write_json<W, I, E>(mut writer: W, records: I) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = Result<Normalized, E>>,
    ExportError: From<E>,
{
    let records = records
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(ExportError::from)?;
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(records.len())
}

pub fn write_json_lines<W, I, E>(mut writer: W, records: I) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = Result<Normalized, E>>,
    ExportError: From<E>,
{
    let mut count = 0;
    for record in records {
        let record = record.map_err(ExportError::from)?;
        serde_json::to_writer(&mut writer, &record)?;
        writeln!(writer)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// CSV with the base fields as leading columns, followed by the extension
/// fields in first-seen order across the batch.
pub fn write_csv<W, I, E>(writer: W, records: I) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = Result<Normalized, E>>,
    ExportError: From<E>,
{
    let rows = records
        .into_iter()
        .map(|record| record.map(|r| r.fields()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ExportError::from)?;

    let header = csv_header(&rows);
    debug!(columns = header.len(), rows = rows.len(), "writing CSV");

    let mut out = csv::Writer::from_writer(writer);
    if !header.is_empty() {
        out.write_record(&header)?;
    }
    for fields in &rows {
        let cells: HashMap<&str, &FieldValue> =
            fields.iter().map(|(name, value)| (*name, value)).collect();
        out.write_record(
            header
                .iter()
                .map(|name| cells.get(name).map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }
    out.flush()?;
    Ok(rows.len())
}

fn csv_header(rows: &[Vec<(&'static str, FieldValue)>]) -> Vec<&'static str> {
    if rows.is_empty() {
        return Vec::new();
    }
    let mut header = BASE_FIELDS.to_vec();
    for &(name, _) in rows.iter().flatten() {
        if !header.contains(&name) {
            header.push(name);
        }
    }
    header
}
