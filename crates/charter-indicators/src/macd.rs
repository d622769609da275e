//! MACD (Moving Average Convergence Divergence) indicator.

use charter_core::TimeSeries;
use serde::{Deserialize, Serialize};

use crate::indicator::{Indicator, IndicatorConfig, IndicatorOutput, PriceSource};
use crate::moving_average::ema;

/// MACD indicator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    /// Fast EMA period (default: 12).
    pub fast_period: usize,
    /// Slow EMA period (default: 26).
    pub slow_period: usize,
    /// Signal line EMA period (default: 9).
    pub signal_period: usize,
    /// Price source for calculation.
    pub price_source: PriceSource,
    /// Whether this MACD instance is enabled.
    pub enabled: bool,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
            price_source: PriceSource::Close,
            enabled: false,
        }
    }
}

impl IndicatorConfig for MacdConfig {}

/// MACD indicator output.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdOutput {
    /// MACD line values (fast EMA - slow EMA).
    pub macd_line: TimeSeries<f64>,
    /// Signal line values (EMA of MACD line).
    pub signal_line: TimeSeries<f64>,
    /// Histogram values (MACD - Signal).
    pub histogram: TimeSeries<f64>,
}

/// Compute MACD over a dense value array.
///
/// The signal line is the EMA of the MACD line with its undefined warm-up
/// slots fed in as `0`. This pulls the early signal towards zero instead of
/// skipping the gap; kept as-is for compatibility with existing charts.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdOutput {
    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let macd_line: TimeSeries<f64> = (0..values.len())
        .map(|i| match (fast_ema.get(i), slow_ema.get(i)) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let filled: Vec<f64> = macd_line.values().iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal_line = ema(&filled, signal);

    let histogram: TimeSeries<f64> = (0..values.len())
        .map(|i| match (macd_line.get(i), signal_line.get(i)) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdOutput {
        macd_line,
        signal_line,
        histogram,
    }
}

/// MACD indicator.
pub struct Macd {
    config: MacdConfig,
}

impl Indicator for Macd {
    type Config = MacdConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, values: &[f64]) -> IndicatorOutput {
        let output = self.calculate_macd(values);

        IndicatorOutput::MultiLine(vec![
            ("line".to_string(), output.macd_line),
            ("signal".to_string(), output.signal_line),
            ("histogram".to_string(), output.histogram),
        ])
    }

    fn min_periods(&self) -> usize {
        self.config.slow_period.max(self.config.fast_period)
    }

    fn is_overlay(&self) -> bool {
        // MACD is displayed in a separate pane, not overlaid on price
        false
    }

    fn name(&self) -> &str {
        "MACD"
    }

    fn label(&self) -> String {
        format!(
            "MACD {}/{}/{}",
            self.config.fast_period, self.config.slow_period, self.config.signal_period
        )
    }
}

impl Macd {
    /// Calculate MACD values and return structured output.
    pub fn calculate_macd(&self, values: &[f64]) -> MacdOutput {
        macd(
            values,
            self.config.fast_period,
            self.config.slow_period,
            self.config.signal_period,
        )
    }

    /// Get the configuration.
    pub fn config(&self) -> &MacdConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising(n: usize) -> Vec<f64> {
        (1..=n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn test_macd_basic() {
        let values = rising(50);
        let output = macd(&values, 12, 26, 9);

        assert_eq!(output.macd_line.len(), 50);
        // MACD line starts where the slow EMA is exposed
        assert_eq!(output.macd_line.first_defined(), Some(25));
        // Signal EMA runs over the zero-filled line, so it is exposed from signal - 1
        assert_eq!(output.signal_line.first_defined(), Some(8));
        // Histogram needs both
        assert_eq!(output.histogram.first_defined(), Some(25));
    }

    #[test]
    fn test_signal_smooths_through_zero_gap() {
        let values = rising(40);
        let output = macd(&values, 3, 6, 4);

        let fast = ema(&values, 3);
        let slow = ema(&values, 6);
        let filled: Vec<f64> = (0..values.len())
            .map(|i| match (fast.get(i), slow.get(i)) {
                (Some(f), Some(s)) => f - s,
                _ => 0.0,
            })
            .collect();
        let expected = ema(&filled, 4);
        assert_eq!(output.signal_line, expected);
        // Slots before the MACD line exists are smoothed zeros
        assert_eq!(output.signal_line.get(3), Some(&0.0));
    }

    #[test]
    fn test_histogram_identity() {
        let values: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let output = macd(&values, 12, 26, 9);
        for (i, h) in output.histogram.iter() {
            let m = output.macd_line.get(i).unwrap();
            let s = output.signal_line.get(i).unwrap();
            assert!((h - (m - s)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_macd_short_input() {
        let output = macd(&[1.0, 2.0, 3.0], 12, 26, 9);
        assert_eq!(output.macd_line.len(), 3);
        assert!(output.macd_line.first_defined().is_none());
        assert!(output.histogram.first_defined().is_none());
    }

    #[test]
    fn test_macd_label() {
        let macd = Macd::new(MacdConfig::default());
        assert_eq!(macd.label(), "MACD 12/26/9");
        assert!(!macd.is_overlay());
    }
}
