//! Price bar data structure.

use serde::{Deserialize, Serialize};

use crate::time::TimePoint;

/// One bar of price history.
///
/// Only `close` is required; the other fields are present when the price
/// provider supplies full OHLCV data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: TimePoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    /// A close-only bar.
    pub fn new(time: TimePoint, close: f64) -> Self {
        Self {
            time,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// A full OHLCV bar.
    pub fn ohlcv(time: TimePoint, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close,
            volume: Some(volume),
        }
    }

    /// Whether open, high and low are all present.
    pub fn has_ohlc(&self) -> bool {
        self.open.is_some() && self.high.is_some() && self.low.is_some()
    }
}
