//! CSV price history loading.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use charter_core::{Bar, TimePoint};

use crate::history::{DataError, PriceHistory};
use crate::source::PriceProvider;
use crate::validation::validate_bar;

/// Reads `<SYMBOL>.csv` files from a directory.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the CSV file for `symbol`.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl PriceProvider for CsvProvider {
    fn history(&self, symbol: &str) -> Result<PriceHistory, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::NotFound(symbol.to_string()));
        }
        let bars = load_bars_from_csv(&path)?;
        if bars.is_empty() {
            return Err(DataError::Empty);
        }
        log::info!("Loaded {} bars for {} from {:?}", bars.len(), symbol, path);
        Ok(PriceHistory::from_bars(bars))
    }
}

/// Parse an optional numeric cell. Empty cells and `NaN` are missing.
fn parse_cell(raw: Option<&str>, row: usize, column: &'static str) -> Result<Option<f64>, DataError> {
    let s = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(s) => s,
    };
    let value: f64 = s.parse().map_err(|_| DataError::InvalidValue {
        row,
        column,
        value: s.to_string(),
    })?;
    Ok((!value.is_nan()).then_some(value))
}

/// Load bars from a CSV file with a header row.
///
/// Columns are found by header name (case-insensitive): `date`, `time` or
/// `timestamp` for the time, plus `open`, `high`, `low`, `close` and `volume`.
/// Only the time and close columns are required. Rows with no close are
/// dropped, invalid bars are skipped, and the result is sorted by time.
pub fn load_bars_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>, DataError> {
    let mut reader = csv::ReaderBuilder::new().delimiter(b',').flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let headers_lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let column = |name: &str| headers_lower.iter().position(|h| h == name);

    let time_col = headers_lower
        .iter()
        .position(|h| h == "date" || h == "time" || h.contains("timestamp"))
        .ok_or(DataError::MissingColumn("date"))?;
    let close_col = column("close").ok_or(DataError::MissingColumn("close"))?;
    let open_col = column("open");
    let high_col = column("high");
    let low_col = column("low");
    let volume_col = column("volume");

    let mut bars = Vec::new();
    let mut dropped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // header is line 1
        let row = i + 2;

        let raw_time = record.get(time_col).unwrap_or("");
        let time = TimePoint::parse(raw_time).ok_or_else(|| DataError::InvalidValue {
            row,
            column: "date",
            value: raw_time.to_string(),
        })?;

        let Some(close) = parse_cell(record.get(close_col), row, "close")? else {
            dropped += 1;
            continue;
        };

        let cell = |col: Option<usize>, name: &'static str| match col {
            Some(c) => parse_cell(record.get(c), row, name),
            None => Ok(None),
        };
        let bar = Bar {
            time,
            open: cell(open_col, "open")?,
            high: cell(high_col, "high")?,
            low: cell(low_col, "low")?,
            close,
            volume: cell(volume_col, "volume")?,
        };

        if !validate_bar(&bar) {
            log::warn!("Skipping invalid bar at row {}: {:?}", row, bar);
            dropped += 1;
            continue;
        }
        bars.push(bar);
    }

    if dropped > 0 {
        log::debug!("Dropped {} rows without a usable close", dropped);
    }

    bars.sort_by_key(|b| b.time);
    analyze_data_gaps(&bars.iter().map(|b| b.time).collect::<Vec<_>>());

    Ok(bars)
}

/// Log the most common bar interval and how many bars appear to be missing.
pub fn analyze_data_gaps(times: &[TimePoint]) {
    if times.len() < 2 {
        return;
    }

    let mut intervals: HashMap<i64, usize> = HashMap::new();
    for window in times.windows(2) {
        let diff = window[1].unix_seconds() - window[0].unix_seconds();
        *intervals.entry(diff).or_insert(0) += 1;
    }

    let expected_interval = intervals
        .iter()
        .max_by_key(|(_, count)| *count)
        .map(|(interval, _)| *interval)
        .unwrap_or(86_400);
    if expected_interval <= 0 {
        return;
    }

    let mut total_gaps = 0;
    let mut largest_gap = 0i64;
    for window in times.windows(2) {
        let diff = window[1].unix_seconds() - window[0].unix_seconds();
        if diff > expected_interval {
            total_gaps += 1;
            largest_gap = largest_gap.max(diff);
        }
    }

    log::debug!(
        "{} bars, expected interval {}s, {} gaps (largest {}s)",
        times.len(),
        expected_interval,
        total_gaps,
        largest_gap
    );
}
