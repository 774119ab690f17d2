//! File import: JSON or CSV candles into a validated series.
//!
//! JSON is an array of `{time, open, high, low, close}` objects. CSV has the
//! header `time,open,high,low,close`; extra columns are ignored. The format
//! follows the file extension.

use super::provider::{DataError, DataSource};
use crate::domain::{Candle, Series};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// CSV row. Extra columns (volume, close time, ...) are skipped by serde.
#[derive(Debug, Deserialize)]
struct CsvRow {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

impl From<CsvRow> for Candle {
    fn from(row: CsvRow) -> Self {
        Candle::new(row.time, row.open, row.high, row.low, row.close)
    }
}

/// Parse candles from CSV text.
pub fn candles_from_csv<R: Read>(reader: R) -> Result<Vec<Candle>, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    reader
        .deserialize::<CsvRow>()
        .map(|row| Ok(Candle::from(row?)))
        .collect()
}

/// Parse candles from a JSON array.
pub fn candles_from_json<R: Read>(reader: R) -> Result<Vec<Candle>, DataError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Which parser a path selects.
pub fn source_for_path(path: &Path) -> Result<DataSource, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => Ok(DataSource::CsvImport),
        Some("json") => Ok(DataSource::JsonImport),
        _ => Err(DataError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Load and validate a candle file.
pub fn load_series(path: &Path) -> Result<Series, DataError> {
    let source = source_for_path(path)?;
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let reader = BufReader::new(file);

    let candles = match source {
        DataSource::CsvImport => candles_from_csv(reader)?,
        _ => candles_from_json(reader)?,
    };
    tracing::info!(path = %path.display(), count = candles.len(), "candles loaded");

    Ok(Series::new(candles)?)
}

/// Write candles as a JSON array (the format `load_series` reads back).
pub fn save_json(path: &Path, candles: &[Candle]) -> Result<(), DataError> {
    let file = File::create(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), candles)?;
    Ok(())
}
