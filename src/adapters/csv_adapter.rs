//! CSV file data adapter.
//!
//! Expected header: `timestamp,open,high,low,close,volume`. Rows are taken in
//! file order; ordering problems surface as `DataOrderingViolation`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::{PriceBar, Series};
use crate::ports::data_port::DataPort;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DataPort for CsvAdapter {
    fn load_series(&self) -> Result<Series, SigtraderError> {
        let file = File::open(&self.path).map_err(|e| SigtraderError::DataSource {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let series = read_series(file)?;
        info!(path = %self.path.display(), bars = series.len(), "loaded bars");
        Ok(series)
    }
}

pub fn read_series<R: Read>(reader: R) -> Result<Series, SigtraderError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();

    for (i, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = result.map_err(|e| SigtraderError::DataSource {
            reason: format!("CSV parse error on row {}: {}", i + 1, e),
        })?;
        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| SigtraderError::DataSource {
            reason: format!("invalid timestamp '{}' on row {}", row.timestamp, i + 1),
        })?;
        bars.push(PriceBar {
            timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    Series::new(bars)
}

/// Accepts datetime strings, plain dates (midnight) and Unix seconds.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.naive_utc())
}
