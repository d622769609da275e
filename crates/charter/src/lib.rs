//! Charter - annotation and indicator layer for a host price chart.
//!
//! - [`coords`] - pixel / chart-space mapping over the host axes
//! - [`scales`] - concrete bar-time and linear price axes
//! - [`drawing`] - annotation store, interaction session, hit testing
//! - [`indicators`] - per-symbol indicator registry and plotted series
//! - [`render`] - coalescing overlay render loop
//! - [`chart`] - [`ChartController`], the surface the host UI drives

pub mod chart;
pub mod coords;
pub mod drawing;
pub mod events;
pub mod indicators;
pub mod render;
pub mod scales;

pub use chart::{ChartController, ChartOptions, HoverInfo, SharedPriceScale, SharedTimeScale};
pub use coords::{CoordinateMapper, PriceScale, RangeCallback, ScreenPos, SubscriptionId, TimeScale};
pub use drawing::{AnnotationStore, ClickOutcome, DrawingManager, DrawingMode, ResolvedShape, Style};
pub use events::{InputEvent, Key};
pub use indicators::{IndicatorRegistry, Pane, PlottedSeries, SeriesSurface};
pub use render::{OverlaySurface, RenderLoop, SurfaceSize};
pub use scales::{BarTimeScale, LinearPriceScale};
