//! Per-symbol indicator configuration.

use serde::{Deserialize, Serialize};

use crate::bollinger::BollingerConfig;
use crate::macd::MacdConfig;
use crate::moving_average::{EmaConfig, SmaConfig};
use crate::rsi::RsiConfig;

/// Which indicators are enabled for a symbol and with what parameters.
///
/// Missing fields fall back to their defaults, so older persisted records
/// keep loading as indicators are added.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSet {
    pub sma: SmaConfig,
    pub ema: EmaConfig,
    pub bollinger: BollingerConfig,
    pub rsi: RsiConfig,
    pub macd: MacdConfig,
}

impl IndicatorSet {
    /// Number of enabled indicators.
    pub fn enabled_count(&self) -> usize {
        [
            self.sma.enabled,
            self.ema.enabled,
            self.bollinger.enabled,
            self.rsi.enabled,
            self.macd.enabled,
        ]
        .iter()
        .filter(|&&on| on)
        .count()
    }
}
