//! Core indicator traits and types.

use charter_core::{Bar, TimeSeries};
use serde::{Deserialize, Serialize};

/// Trait for indicator configuration.
pub trait IndicatorConfig: Clone + Default {}

/// Which price to use for indicator calculation.
///
/// Sources other than `Close` fall back to the close when the bar has no
/// OHLC data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Open,
    High,
    Low,
    #[default]
    Close,
    /// (High + Low) / 2
    HL2,
    /// (High + Low + Close) / 3
    HLC3,
    /// (Open + High + Low + Close) / 4
    OHLC4,
}

impl PriceSource {
    /// Extract the price from a bar based on this source.
    pub fn extract(&self, bar: &Bar) -> f64 {
        let c = bar.close;
        match self {
            PriceSource::Open => bar.open.unwrap_or(c),
            PriceSource::High => bar.high.unwrap_or(c),
            PriceSource::Low => bar.low.unwrap_or(c),
            PriceSource::Close => c,
            PriceSource::HL2 => match (bar.high, bar.low) {
                (Some(h), Some(l)) => (h + l) / 2.0,
                _ => c,
            },
            PriceSource::HLC3 => match (bar.high, bar.low) {
                (Some(h), Some(l)) => (h + l + c) / 3.0,
                _ => c,
            },
            PriceSource::OHLC4 => match (bar.open, bar.high, bar.low) {
                (Some(o), Some(h), Some(l)) => (o + h + l + c) / 4.0,
                _ => c,
            },
        }
    }
}

/// Output from an indicator calculation.
///
/// Every series is aligned 1:1 with the input values.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorOutput {
    /// Single line output (e.g., SMA, EMA).
    Line(TimeSeries<f64>),
    /// Multiple named lines (e.g., Bollinger Bands, MACD).
    MultiLine(Vec<(String, TimeSeries<f64>)>),
    /// Oscillator with values and guide levels (e.g., RSI).
    Oscillator {
        values: TimeSeries<f64>,
        upper_bound: f64,
        lower_bound: f64,
    },
}

impl IndicatorOutput {
    /// All `(line name, series)` pairs of this output.
    ///
    /// A single line or oscillator is named `label`.
    pub fn lines(&self, label: &str) -> Vec<(String, &TimeSeries<f64>)> {
        match self {
            IndicatorOutput::Line(series) => vec![(label.to_string(), series)],
            IndicatorOutput::MultiLine(lines) => lines
                .iter()
                .map(|(name, series)| (format!("{label} {name}"), series))
                .collect(),
            IndicatorOutput::Oscillator { values, .. } => vec![(label.to_string(), values)],
        }
    }
}

/// Trait for technical indicators.
pub trait Indicator {
    /// The configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Create a new indicator with the given configuration.
    fn new(config: Self::Config) -> Self;

    /// Calculate the indicator over a dense value array.
    fn calculate(&self, values: &[f64]) -> IndicatorOutput;

    /// Minimum number of values required before the indicator produces valid output.
    fn min_periods(&self) -> usize;

    /// Whether this indicator should be overlaid on the price chart (true)
    /// or displayed in a separate pane (false).
    fn is_overlay(&self) -> bool;

    /// Human-readable name of the indicator.
    fn name(&self) -> &str;

    /// Name including parameters, e.g. `SMA 20`.
    fn label(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_core::TimePoint;

    #[test]
    fn test_price_source_falls_back_to_close() {
        let bar = Bar::new(TimePoint::from_unix_seconds(0), 10.0);
        assert_eq!(PriceSource::High.extract(&bar), 10.0);
        assert_eq!(PriceSource::OHLC4.extract(&bar), 10.0);
    }

    #[test]
    fn test_price_source_ohlc() {
        let bar = Bar::ohlcv(TimePoint::from_unix_seconds(0), 1.0, 4.0, 0.0, 3.0, 100.0);
        assert_eq!(PriceSource::HL2.extract(&bar), 2.0);
        assert!((PriceSource::HLC3.extract(&bar) - 7.0 / 3.0).abs() < 1e-12);
        assert_eq!(PriceSource::OHLC4.extract(&bar), 2.0);
    }

    #[test]
    fn test_output_lines_are_prefixed() {
        let out = IndicatorOutput::MultiLine(vec![
            ("upper".to_string(), TimeSeries::new()),
            ("lower".to_string(), TimeSeries::new()),
        ]);
        let names: Vec<String> = out.lines("BB 20").into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["BB 20 upper", "BB 20 lower"]);
    }
}
