//! Aligned price history for one symbol.

use charter_core::{Bar, TimePoint};
use thiserror::Error;

/// Price history load failures.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("no price history for {0}")]
    NotFound(String),
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("dates and closes are misaligned ({dates} dates, {closes} closes)")]
    Misaligned { dates: usize, closes: usize },
    #[error("price history is empty")]
    Empty,
}

/// Index-aligned dates and closes, with full bars when the source has them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceHistory {
    dates: Vec<TimePoint>,
    closes: Vec<f64>,
    ohlc: Option<Vec<Bar>>,
}

impl PriceHistory {
    /// Build from parallel date and close arrays.
    pub fn new(dates: Vec<TimePoint>, closes: Vec<f64>) -> Result<Self, DataError> {
        if dates.len() != closes.len() {
            return Err(DataError::Misaligned {
                dates: dates.len(),
                closes: closes.len(),
            });
        }
        Ok(Self {
            dates,
            closes,
            ohlc: None,
        })
    }

    /// Build from bars in time order.
    ///
    /// `ohlc` is kept only when every bar carries open, high and low.
    pub fn from_bars(bars: Vec<Bar>) -> Self {
        let dates = bars.iter().map(|b| b.time).collect();
        let closes = bars.iter().map(|b| b.close).collect();
        let ohlc = (!bars.is_empty() && bars.iter().all(Bar::has_ohlc)).then_some(bars);
        Self { dates, closes, ohlc }
    }

    pub fn dates(&self) -> &[TimePoint] {
        &self.dates
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn ohlc(&self) -> Option<&[Bar]> {
        self.ohlc.as_deref()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Index of the point at exactly `time`.
    pub fn index_of(&self, time: TimePoint) -> Option<usize> {
        self.dates.binary_search(&time).ok()
    }

    /// The bar at exactly `time`, close-only when no OHLC data is present.
    pub fn bar_at(&self, time: TimePoint) -> Option<Bar> {
        let i = self.index_of(time)?;
        match &self.ohlc {
            Some(bars) => bars.get(i).copied(),
            None => Some(Bar::new(time, self.closes[i])),
        }
    }

    /// The most recent `n` points.
    pub fn tail(&self, n: usize) -> Self {
        let start = self.len().saturating_sub(n);
        Self {
            dates: self.dates[start..].to_vec(),
            closes: self.closes[start..].to_vec(),
            ohlc: self.ohlc.as_ref().map(|bars| bars[start..].to_vec()),
        }
    }
}
