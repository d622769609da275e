//! Simple and exponential moving averages.

use charter_core::TimeSeries;
use serde::{Deserialize, Serialize};

use crate::indicator::{Indicator, IndicatorConfig, IndicatorOutput, PriceSource};

/// Whether `period` can produce any output over `len` values.
///
/// A period of zero, or one that is not shorter than the input, yields an
/// entirely undefined series.
pub(crate) fn has_output(len: usize, period: usize) -> bool {
    period > 0 && period < len
}

/// Rolling arithmetic mean over `period` values.
///
/// Slot `i` is defined for `i >= period - 1`. Runs in O(n) by keeping a
/// running window sum.
pub fn sma(values: &[f64], period: usize) -> TimeSeries<f64> {
    let mut out = TimeSeries::undefined(values.len());
    if !has_output(values.len(), period) {
        return out;
    }

    let mut sum = 0.0;
    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out.set(i, Some(sum / period as f64));
        }
    }

    out
}

/// Raw EMA recurrence from index 0, seeded with `values[0]`.
pub(crate) fn ema_recurrence(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(&first) => first,
        None => return out,
    };
    out.push(prev);
    for &value in &values[1..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }
    out
}

/// Exponential moving average with smoothing factor `2 / (period + 1)`.
///
/// The recurrence is seeded with `values[0]` and runs from index 0, but only
/// slots `i >= period - 1` are exposed; earlier values are under-converged.
pub fn ema(values: &[f64], period: usize) -> TimeSeries<f64> {
    if !has_output(values.len(), period) {
        return TimeSeries::undefined(values.len());
    }

    ema_recurrence(values, period)
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i + 1 >= period).then_some(v))
        .collect()
}

/// SMA indicator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaConfig {
    pub period: usize,
    pub price_source: PriceSource,
    pub enabled: bool,
}

impl Default for SmaConfig {
    fn default() -> Self {
        Self {
            period: 20,
            price_source: PriceSource::Close,
            enabled: true,
        }
    }
}

impl IndicatorConfig for SmaConfig {}

/// Simple moving average indicator.
pub struct Sma {
    config: SmaConfig,
}

impl Indicator for Sma {
    type Config = SmaConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, values: &[f64]) -> IndicatorOutput {
        IndicatorOutput::Line(sma(values, self.config.period))
    }

    fn min_periods(&self) -> usize {
        self.config.period
    }

    fn is_overlay(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "SMA"
    }

    fn label(&self) -> String {
        format!("SMA {}", self.config.period)
    }
}

/// EMA indicator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaConfig {
    pub period: usize,
    pub price_source: PriceSource,
    pub enabled: bool,
}

impl Default for EmaConfig {
    fn default() -> Self {
        Self {
            period: 20,
            price_source: PriceSource::Close,
            enabled: false,
        }
    }
}

impl IndicatorConfig for EmaConfig {}

/// Exponential moving average indicator.
pub struct Ema {
    config: EmaConfig,
}

impl Indicator for Ema {
    type Config = EmaConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, values: &[f64]) -> IndicatorOutput {
        IndicatorOutput::Line(ema(values, self.config.period))
    }

    fn min_periods(&self) -> usize {
        self.config.period
    }

    fn is_overlay(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "EMA"
    }

    fn label(&self) -> String {
        format!("EMA {}", self.config.period)
    }
}
