//! Runtime indicator registry.
//!
//! Indicators are stored as trait objects so the set for a symbol can be
//! rebuilt from its persisted [`IndicatorSet`] without compile-time
//! knowledge of which ones are enabled. Computed lines are aligned to the
//! history's times and handed to the host as [`PlottedSeries`].

use charter_core::TimePoint;
use charter_data::{Persistence, PriceHistory, StoreError};
use charter_indicators::{
    align, Bollinger, Ema, Indicator, IndicatorOutput, IndicatorSet, Macd, PriceSource, Rsi, Sma,
};

/// Object-safe view of an [`Indicator`].
pub trait DynIndicator {
    /// Calculate over a dense value array.
    fn calculate(&self, values: &[f64]) -> IndicatorOutput;

    fn name(&self) -> &str;

    /// Name including parameters, used to name plotted lines.
    fn label(&self) -> String;

    /// Whether this indicator is drawn over the price series.
    fn is_overlay(&self) -> bool;

    fn min_periods(&self) -> usize;
}

impl<I: Indicator> DynIndicator for I {
    fn calculate(&self, values: &[f64]) -> IndicatorOutput {
        Indicator::calculate(self, values)
    }

    fn name(&self) -> &str {
        Indicator::name(self)
    }

    fn label(&self) -> String {
        Indicator::label(self)
    }

    fn is_overlay(&self) -> bool {
        Indicator::is_overlay(self)
    }

    fn min_periods(&self) -> usize {
        Indicator::min_periods(self)
    }
}

/// Which pane a plotted line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    /// Overlaid on the price series.
    Price,
    /// Separate oscillator pane below the price chart.
    Oscillator,
}

/// One gap-free line ready for the host chart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlottedSeries {
    /// Line name, e.g. `SMA 20` or `BB 20 upper`.
    pub name: String,
    pub pane: Pane,
    pub points: Vec<(TimePoint, f64)>,
    /// Horizontal guide levels (RSI overbought/oversold).
    pub levels: Vec<f64>,
}

/// Host-side receiver of plotted indicator lines.
pub trait SeriesSurface {
    /// Replace every plotted line.
    fn set_series(&mut self, series: &[PlottedSeries]);
}

/// A registered indicator with the price it reads and its latest output.
pub struct IndicatorInstance {
    pub indicator: Box<dyn DynIndicator>,
    pub source: PriceSource,
    pub output: Option<IndicatorOutput>,
}

impl IndicatorInstance {
    fn new<I: Indicator + 'static>(indicator: I, source: PriceSource) -> Self {
        Self {
            indicator: Box::new(indicator),
            source,
            output: None,
        }
    }

    /// Calculate over `history` and return the aligned lines.
    pub fn compute(&mut self, history: &PriceHistory) -> Vec<PlottedSeries> {
        let values: Vec<f64> = match history.ohlc() {
            Some(bars) => bars.iter().map(|bar| self.source.extract(bar)).collect(),
            None => history.closes().to_vec(),
        };

        let output = self.indicator.calculate(&values);
        let pane = if self.indicator.is_overlay() { Pane::Price } else { Pane::Oscillator };
        let levels = match &output {
            IndicatorOutput::Oscillator {
                upper_bound,
                lower_bound,
                ..
            } => vec![*upper_bound, *lower_bound],
            _ => Vec::new(),
        };

        let label = self.indicator.label();
        let series = output
            .lines(&label)
            .into_iter()
            .map(|(name, line)| PlottedSeries {
                name,
                pane,
                points: align(history.dates(), line),
                levels: levels.clone(),
            })
            .collect();

        self.output = Some(output);
        series
    }
}

/// The enabled indicators of the active symbol.
pub struct IndicatorRegistry {
    config: IndicatorSet,
    instances: Vec<IndicatorInstance>,
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new(IndicatorSet::default())
    }
}

impl IndicatorRegistry {
    pub fn new(config: IndicatorSet) -> Self {
        let instances = build_instances(&config);
        Self { config, instances }
    }

    /// Registry for `symbol`, falling back to `defaults` when nothing is
    /// persisted or the stored configuration cannot be read.
    pub fn load(persistence: &dyn Persistence, symbol: &str, defaults: &IndicatorSet) -> Self {
        let config = match persistence.load_indicator_config(symbol) {
            Ok(Some(config)) => config,
            Ok(None) => {
                log::debug!("No indicator config for {}; using defaults", symbol);
                defaults.clone()
            }
            Err(e) => {
                log::warn!("Failed to load indicator config for {}: {}; using defaults", symbol, e);
                defaults.clone()
            }
        };
        Self::new(config)
    }

    pub fn config(&self) -> &IndicatorSet {
        &self.config
    }

    /// Replace the configuration and rebuild the instances.
    pub fn set_config(&mut self, config: IndicatorSet) {
        self.instances = build_instances(&config);
        self.config = config;
    }

    pub fn save(&self, persistence: &mut dyn Persistence, symbol: &str) -> Result<(), StoreError> {
        persistence.save_indicator_config(symbol, &self.config)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndicatorInstance> {
        self.instances.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Recompute every instance over `history`.
    pub fn compute(&mut self, history: &PriceHistory) -> Vec<PlottedSeries> {
        self.instances
            .iter_mut()
            .flat_map(|instance| instance.compute(history))
            .collect()
    }
}

fn build_instances(config: &IndicatorSet) -> Vec<IndicatorInstance> {
    let mut instances = Vec::with_capacity(config.enabled_count());
    if config.sma.enabled {
        instances.push(IndicatorInstance::new(Sma::new(config.sma.clone()), config.sma.price_source));
    }
    if config.ema.enabled {
        instances.push(IndicatorInstance::new(Ema::new(config.ema.clone()), config.ema.price_source));
    }
    if config.bollinger.enabled {
        instances.push(IndicatorInstance::new(
            Bollinger::new(config.bollinger.clone()),
            config.bollinger.price_source,
        ));
    }
    if config.rsi.enabled {
        instances.push(IndicatorInstance::new(Rsi::new(config.rsi.clone()), config.rsi.price_source));
    }
    if config.macd.enabled {
        instances.push(IndicatorInstance::new(Macd::new(config.macd.clone()), config.macd.price_source));
    }
    instances
}
