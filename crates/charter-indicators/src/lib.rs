//! Technical indicator engine.
//!
//! Every function here is pure: it takes a dense value array and returns
//! series aligned 1:1 with it, with warm-up slots left undefined rather than
//! zeroed. Nothing is cached between calls.

pub mod align;
pub mod analysis;
pub mod bollinger;
pub mod indicator;
pub mod macd;
pub mod moving_average;
pub mod rsi;
pub mod set;

pub use align::align;
pub use analysis::{analyze, AnalysisParams, AssetSignal, Contribution, Features, SignalLabel};
pub use bollinger::{bollinger, Bollinger, BollingerConfig, BollingerOutput};
pub use indicator::{Indicator, IndicatorConfig, IndicatorOutput, PriceSource};
pub use macd::{macd, Macd, MacdConfig, MacdOutput};
pub use moving_average::{ema, sma, Ema, EmaConfig, Sma, SmaConfig};
pub use rsi::{rsi, Rsi, RsiConfig};
pub use set::IndicatorSet;
