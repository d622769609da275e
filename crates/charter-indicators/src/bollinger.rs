//! Bollinger Bands.

use charter_core::TimeSeries;
use serde::{Deserialize, Serialize};

use crate::indicator::{Indicator, IndicatorConfig, IndicatorOutput, PriceSource};
use crate::moving_average::sma;

/// Bollinger Bands output.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub upper: TimeSeries<f64>,
    pub middle: TimeSeries<f64>,
    pub lower: TimeSeries<f64>,
}

/// SMA middle band with bands `mult` population standard deviations away.
///
/// The deviation uses divisor `period`, not `period - 1`. A constant window
/// has zero width.
pub fn bollinger(values: &[f64], period: usize, mult: f64) -> BollingerOutput {
    let middle = sma(values, period);
    let mut upper = TimeSeries::undefined(values.len());
    let mut lower = TimeSeries::undefined(values.len());

    for (i, &mean) in middle.iter() {
        let window = &values[i + 1 - period..=i];
        let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
        let sigma = variance.sqrt();
        upper.set(i, Some(mean + mult * sigma));
        lower.set(i, Some(mean - mult * sigma));
    }

    BollingerOutput { upper, middle, lower }
}

/// Bollinger Bands configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    pub period: usize,
    /// Band width in standard deviations.
    pub multiplier: f64,
    pub price_source: PriceSource,
    pub enabled: bool,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            multiplier: 2.0,
            price_source: PriceSource::Close,
            enabled: false,
        }
    }
}

impl IndicatorConfig for BollingerConfig {}

/// Bollinger Bands indicator.
pub struct Bollinger {
    config: BollingerConfig,
}

impl Indicator for Bollinger {
    type Config = BollingerConfig;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    fn calculate(&self, values: &[f64]) -> IndicatorOutput {
        let out = bollinger(values, self.config.period, self.config.multiplier);
        IndicatorOutput::MultiLine(vec![
            ("upper".to_string(), out.upper),
            ("middle".to_string(), out.middle),
            ("lower".to_string(), out.lower),
        ])
    }

    fn min_periods(&self) -> usize {
        self.config.period
    }

    fn is_overlay(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "BB"
    }

    fn label(&self) -> String {
        format!("BB {}", self.config.period)
    }
}
