//! Headless chart summary.
//!
//! Loads a symbol's price history, runs the chart controller over it without
//! a display, and prints the indicator readings, the asset signal and the
//! persisted annotations.
//!
//! Usage: charter [SYMBOL] [--data-dir DIR] [--config FILE]

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use charter::{
    BarTimeScale, ChartController, ChartOptions, LinearPriceScale, OverlaySurface, PlottedSeries, ResolvedShape,
    SeriesSurface, Style, SurfaceSize,
};
use charter_config::Config;
use charter_data::{CsvProvider, JsonFileStore, PriceProvider};
use charter_indicators::analyze;

/// Logical plot size of the headless chart.
const PLOT_WIDTH: f64 = 960.0;
const PLOT_HEIGHT: f64 = 540.0;
const BAR_SPACING: f64 = 8.0;

#[derive(Parser)]
#[command(name = "charter")]
#[command(about = "Print indicators, signal and annotations for a symbol", long_about = None)]
struct Cli {
    /// Symbol to load (defaults to general.default_symbol)
    symbol: Option<String>,

    /// Directory holding <SYMBOL>.csv files and the annotation store
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Overlay that only counts what would be drawn.
#[derive(Default)]
struct HeadlessOverlay {
    shapes: Rc<Cell<usize>>,
}

impl OverlaySurface for HeadlessOverlay {
    fn set_buffer_size(&mut self, width: u32, height: u32) {
        log::debug!("Overlay buffer {}x{}", width, height);
    }

    fn set_scale(&mut self, _device_pixel_ratio: f64) {}

    fn clear(&mut self) {
        self.shapes.set(0);
    }

    fn draw_shape(&mut self, _shape: &ResolvedShape, _style: &Style) {
        self.shapes.set(self.shapes.get() + 1);
    }
}

/// Keeps the most recently plotted series for printing.
#[derive(Default)]
struct LatestSeries(Rc<RefCell<Vec<PlottedSeries>>>);

impl SeriesSurface for LatestSeries {
    fn set_series(&mut self, series: &[PlottedSeries]) {
        *self.0.borrow_mut() = series.to_vec();
    }
}

fn run() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load_default(),
    };
    let symbol = cli.symbol.unwrap_or_else(|| config.general.default_symbol.clone());
    let data_dir = cli.data_dir.unwrap_or_else(|| config.storage.get_data_dir());

    let provider = CsvProvider::new(&data_dir);
    let history = provider
        .history(&symbol)
        .with_context(|| format!("loading price history for {symbol}"))?;
    let store = JsonFileStore::open(data_dir.join("store"))
        .with_context(|| format!("opening annotation store in {}", data_dir.display()))?;

    let time_scale = Rc::new(RefCell::new(BarTimeScale::new(PLOT_WIDTH, BAR_SPACING)));
    let price_scale = Rc::new(RefCell::new(LinearPriceScale::new(PLOT_HEIGHT)));
    let overlay = HeadlessOverlay::default();
    let drawn = Rc::clone(&overlay.shapes);
    let series = LatestSeries::default();
    let plotted = Rc::clone(&series.0);

    let mut chart = ChartController::new(
        time_scale.clone(),
        price_scale.clone(),
        Box::new(overlay),
        Box::new(series),
        Rc::new(RefCell::new(store)),
        ChartOptions::from(&config),
    );
    chart.resize(SurfaceSize::new(PLOT_WIDTH, PLOT_HEIGHT, 1.0));
    chart
        .set_symbol(&symbol)
        .with_context(|| format!("loading annotations for {symbol}"))?;

    let window = history.tail(config.general.chart_points);
    time_scale.borrow_mut().set_times(window.dates().to_vec());
    price_scale.borrow_mut().autoscale(window.closes(), 0.05);
    chart.set_history(window);
    chart.frame();

    println!("{symbol}: {} bars", history.len());
    if let (Some(first), Some(last)) = (history.dates().first(), history.dates().last()) {
        println!("  range      {first} .. {last}");
    }

    match analyze(history.closes(), &config.analysis) {
        Some(signal) => {
            let change = format_change(signal.change_pct);
            println!("  last       {:.2} ({change})", signal.latest_price);
            println!("  signal     {} (score {})", signal.label, signal.score);
            for reason in &signal.reasons {
                println!("    - {reason}");
            }
        }
        None => println!("  signal     insufficient data"),
    }

    for line in plotted.borrow().iter() {
        match line.points.last() {
            Some((time, value)) => println!("  {:<24} {value:>10.4}  @ {time}", line.name),
            None => println!("  {:<24} {:>10}", line.name, "-"),
        }
    }

    let annotations = chart.annotations();
    println!("  annotations {} ({} in view)", annotations.len(), drawn.get());
    for annotation in annotations {
        let anchor = annotation.anchor1();
        println!(
            "    {} {:<14} {} @ {:.2}",
            annotation.id(),
            annotation.kind().name(),
            anchor.time,
            anchor.price
        );
    }

    chart.destroy();
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Close-to-close change, given as a fraction, in percent.
fn format_change(change: Option<f64>) -> String {
    change.map_or_else(|| "n/a".to_string(), |c| format!("{:+.2}%", c * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_change_in_percent() {
        assert_eq!(format_change(Some(0.012)), "+1.20%");
        assert_eq!(format_change(Some(-0.05)), "-5.00%");
        assert_eq!(format_change(None), "n/a");
    }
}
