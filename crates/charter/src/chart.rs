//! The chart controller: the surface the host UI talks to.
//!
//! Wires the host axes, the overlay and series surfaces, and persistence to
//! the annotation store, the interaction session, the indicator registry
//! and the render loop.

use std::cell::RefCell;
use std::rc::Rc;

use charter_config::Config;
use charter_core::{Annotation, AnnotationId, Bar, Point, TimePoint};
use charter_data::{PriceHistory, StoreError};
use charter_indicators::IndicatorSet;

use crate::coords::{CoordinateMapper, PriceScale, SubscriptionId, TimeScale};
use crate::drawing::{
    prepare_overlay, AnnotationStore, ClickOutcome, DrawingManager, DrawingMode, SharedPersistence, HIT_TOLERANCE,
};
use crate::events::{InputEvent, Key};
use crate::indicators::{IndicatorRegistry, SeriesSurface};
use crate::render::{OverlaySurface, RenderLoop, SurfaceSize};

pub type SharedTimeScale = Rc<RefCell<dyn TimeScale>>;
pub type SharedPriceScale = Rc<RefCell<dyn PriceScale>>;

/// Payload of the hover callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverInfo {
    pub time: TimePoint,
    /// The bar at exactly `time`, if the history has one.
    pub bar: Option<Bar>,
}

pub type HoverCallback = Box<dyn FnMut(&HoverInfo)>;

/// Settings the controller takes from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub hit_tolerance: f64,
    /// Indicators for symbols with no persisted configuration.
    pub default_indicators: IndicatorSet,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            hit_tolerance: HIT_TOLERANCE,
            default_indicators: IndicatorSet::default(),
        }
    }
}

impl From<&Config> for ChartOptions {
    fn from(config: &Config) -> Self {
        Self {
            hit_tolerance: config.drawing.hit_tolerance_px,
            default_indicators: config.indicators.clone(),
        }
    }
}

/// Annotation and indicator layer over a host chart.
///
/// After [`destroy`](Self::destroy) every method is a no-op.
pub struct ChartController {
    time_scale: SharedTimeScale,
    price_scale: SharedPriceScale,
    overlay: Box<dyn OverlaySurface>,
    series: Box<dyn SeriesSurface>,
    persistence: SharedPersistence,
    store: AnnotationStore,
    session: DrawingManager,
    indicators: IndicatorRegistry,
    default_indicators: IndicatorSet,
    render: RenderLoop,
    history: Option<PriceHistory>,
    hover: Option<HoverCallback>,
    subscription: Option<SubscriptionId>,
    destroyed: bool,
}

impl ChartController {
    pub fn new(
        time_scale: SharedTimeScale,
        price_scale: SharedPriceScale,
        overlay: Box<dyn OverlaySurface>,
        series: Box<dyn SeriesSurface>,
        persistence: SharedPersistence,
        options: ChartOptions,
    ) -> Self {
        let mut chart = Self {
            time_scale,
            price_scale,
            overlay,
            series,
            store: AnnotationStore::new(Rc::clone(&persistence)),
            persistence,
            session: DrawingManager::new(options.hit_tolerance),
            indicators: IndicatorRegistry::new(options.default_indicators.clone()),
            default_indicators: options.default_indicators,
            render: RenderLoop::new(),
            history: None,
            hover: None,
            subscription: None,
            destroyed: false,
        };
        chart.subscribe();
        chart
    }

    /// Switch the drawing mode, abandoning any pending gesture.
    pub fn set_mode(&mut self, mode: DrawingMode) {
        if self.destroyed {
            return;
        }
        log::debug!("Drawing mode: {}", mode.name());
        self.session.set_mode(mode);
        self.render.request();
    }

    /// Switch to `symbol`: reload its annotations and indicator
    /// configuration and forget the session state of the previous one.
    ///
    /// The price history is cleared until [`set_history`](Self::set_history)
    /// supplies the new symbol's data. A failed annotation load leaves an
    /// empty set and is returned.
    pub fn set_symbol(&mut self, symbol: &str) -> Result<(), StoreError> {
        if self.destroyed {
            return Ok(());
        }
        log::info!("Switching chart to {}", symbol);

        self.unsubscribe();
        self.subscribe();

        self.session.reset_for_symbol();
        self.history = None;
        self.series.set_series(&[]);
        self.indicators = IndicatorRegistry::load(&*self.persistence.borrow(), symbol, &self.default_indicators);

        let result = self.store.load(symbol);
        self.render.request();
        result
    }

    /// Supply the active symbol's price history and replot its indicators.
    pub fn set_history(&mut self, history: PriceHistory) {
        if self.destroyed {
            return;
        }
        self.history = Some(history);
        self.replot();
        self.render.request();
    }

    /// Replace the active symbol's indicator configuration, replot and
    /// persist it. Refused with [`StoreError::NoSymbol`] before the first
    /// [`set_symbol`](Self::set_symbol).
    pub fn set_indicator_config(&mut self, config: IndicatorSet) -> Result<(), StoreError> {
        if self.destroyed {
            return Ok(());
        }
        let Some(symbol) = self.store.symbol().map(str::to_owned) else {
            log::warn!("Indicator config change before any symbol was set");
            return Err(StoreError::NoSymbol);
        };
        self.indicators.set_config(config);
        self.replot();

        let result = self.indicators.save(&mut *self.persistence.borrow_mut(), &symbol);
        if let Err(e) = &result {
            log::error!("Failed to save indicator config for {}: {}", symbol, e);
        }
        result
    }

    /// Delete the selected annotation, if any.
    pub fn delete_selected(&mut self) -> Result<Option<AnnotationId>, StoreError> {
        if self.destroyed || self.session.selected().is_none() {
            return Ok(None);
        }
        let result = self.session.delete_selected(&mut self.store);
        self.render.request();
        result
    }

    /// Apply a new overlay size and pixel ratio.
    pub fn resize(&mut self, size: SurfaceSize) {
        if self.destroyed {
            return;
        }
        self.render.resize(size, self.overlay.as_mut());
    }

    /// Repaint now, whether or not anything changed.
    pub fn redraw(&mut self) {
        if self.destroyed {
            return;
        }
        self.render.request();
        self.frame();
    }

    /// Paint if a repaint is pending. Returns whether a paint happened.
    ///
    /// The host calls this once per display frame.
    pub fn frame(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let time = self.time_scale.borrow();
        let price = self.price_scale.borrow();
        let mapper = CoordinateMapper::new(&*time, &*price);
        let (store, session) = (&self.store, &self.session);
        self.render
            .frame(self.overlay.as_mut(), || prepare_overlay(store.all(), session, &mapper))
    }

    /// Process one input event.
    ///
    /// `Err` means a mutation was applied in memory but not persisted.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<(), StoreError> {
        if self.destroyed {
            return Ok(());
        }
        match event {
            InputEvent::Click(_) if self.store.symbol().is_none() => {
                log::debug!("Click ignored: no symbol loaded");
                Ok(())
            }

            InputEvent::Click(pos) => {
                let time = self.time_scale.borrow();
                let price = self.price_scale.borrow();
                let mapper = CoordinateMapper::new(&*time, &*price);

                let outcome = self.session.handle_click(pos, &mapper, &mut self.store);
                if !matches!(outcome, Ok(ClickOutcome::Ignored)) {
                    self.render.request();
                }
                outcome.map(|_| ())
            }

            InputEvent::Move(pos) => {
                let time = self.time_scale.borrow();
                let price = self.price_scale.borrow();
                let mapper = CoordinateMapper::new(&*time, &*price);

                if self.session.handle_move(pos, &mapper) {
                    self.render.request();
                }
                if let (Some(callback), Some(at)) = (self.hover.as_mut(), mapper.time_at(pos.x)) {
                    let bar = self.history.as_ref().and_then(|h| h.bar_at(at));
                    callback(&HoverInfo { time: at, bar });
                }
                Ok(())
            }

            InputEvent::Key(key) if key.is_delete() => self.delete_selected().map(|_| ()),

            InputEvent::Key(Key::Escape) => {
                self.session.cancel();
                self.render.request();
                Ok(())
            }

            InputEvent::Key(key) => {
                if let Some(mode) = key.mode_shortcut() {
                    self.set_mode(mode);
                }
                Ok(())
            }
        }
    }

    /// Register the hover callback, replacing any previous one.
    pub fn on_hover<F>(&mut self, callback: F)
    where
        F: FnMut(&HoverInfo) + 'static,
    {
        if self.destroyed {
            return;
        }
        self.hover = Some(Box::new(callback));
    }

    /// Tear down: release the range subscription, clear both surfaces and
    /// drop callbacks. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.unsubscribe();
        self.overlay.clear();
        self.series.set_series(&[]);
        self.hover = None;
        self.destroyed = true;
        log::info!("Chart destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn mode(&self) -> DrawingMode {
        self.session.mode()
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.session.selected()
    }

    pub fn pending(&self) -> Option<Point> {
        self.session.pending()
    }

    pub fn symbol(&self) -> Option<&str> {
        self.store.symbol()
    }

    /// Annotations of the active symbol in z-order.
    pub fn annotations(&self) -> &[Annotation] {
        self.store.all()
    }

    /// Most recent persistence failure not yet followed by a successful write.
    pub fn persistence_error(&self) -> Option<&str> {
        self.store.last_error()
    }

    pub fn indicators(&self) -> &IndicatorRegistry {
        &self.indicators
    }

    pub fn history(&self) -> Option<&PriceHistory> {
        self.history.as_ref()
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render
    }

    fn replot(&mut self) {
        if let Some(history) = &self.history {
            let series = self.indicators.compute(history);
            self.series.set_series(&series);
        }
    }

    fn subscribe(&mut self) {
        let handle = self.render.handle();
        let id = self
            .time_scale
            .borrow_mut()
            .subscribe_range_change(Box::new(move || handle.request()));
        self.subscription = Some(id);
    }

    fn unsubscribe(&mut self) {
        let Some(id) = self.subscription.take() else {
            return;
        };
        match self.time_scale.try_borrow_mut() {
            Ok(mut scale) => scale.unsubscribe_range_change(id),
            Err(_) => log::warn!("Time scale busy; could not release {}", id),
        }
    }
}

impl Drop for ChartController {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
