//! Relative Strength Index with Wilder smoothing.

use charter_core::TimeSeries;
use serde::{Deserialize, Serialize};

use crate::indicator::{Indicator, IndicatorConfig, IndicatorOutput, PriceSource};
use crate::moving_average::has_output;

/// RS used when the average loss is zero.
const ZERO_LOSS_RS: f64 = 100.0;

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 { ZERO_LOSS_RS } else { avg_gain / avg_loss };
    100.0 - 100.0 / (1.0 + rs)
}

/// Wilder's RSI.
///
/// Gains and losses of the first `period` changes are averaged at index
/// `period`; later averages are smoothed as `(avg * (period - 1) + x) / period`.
/// Slots before `period` are undefined.
pub fn rsi(values: &[f64], period: usize) -> TimeSeries<f64> {
    let mut out = TimeSeries::undefined(values.len());
    if !has_output(values.len(), period) {
        return out;
    }

    let p = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..values.len() {
        let change = values[i] - values[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i <= period {
            avg_gain += gain;
            avg_loss += loss;
            if i == period {
                avg_gain /= p;
                avg_loss /= p;
                out.set(i, Some(rsi_value(avg_gain, avg_loss)));
            }
        } else {
            avg_gain = (avg_gain * (p - 1.0) + gain) / p;
            avg_loss = (avg_loss * (p - 1.0) + loss) / p;
            out.set(i, Some(rsi_value(avg_gain, avg_loss)));
        }
    }

    out
}

/// RSI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    pub period: usize,
    /// Overbought guide level.
    pub overbought: f64,
    /// Oversold guide level.
    pub oversold: f64,
    pub price_source: PriceSource,
    pub enabled: bool,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
            price_source: PriceSource::Close,
            enabled: false,
        }
    }
}

impl IndicatorConfig for RsiConfig {}

/// RSI indicator.
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, values: &[f64]) -> IndicatorOutput {
        IndicatorOutput::Oscillator {
            values: rsi(values, self.config.period),
            upper_bound: self.config.overbought,
            lower_bound: self.config.oversold,
        }
    }

    fn min_periods(&self) -> usize {
        self.config.period + 1
    }

    fn is_overlay(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "RSI"
    }

    fn label(&self) -> String {
        format!("RSI {}", self.config.period)
    }
}
