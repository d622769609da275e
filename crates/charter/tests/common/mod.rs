//! Fake host axes and recording surfaces shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use charter::drawing::SharedPersistence;
use charter::{
    ChartController, ChartOptions, InputEvent, OverlaySurface, PlottedSeries, PriceScale, RangeCallback,
    ResolvedShape, ScreenPos, SeriesSurface, Style, SubscriptionId, TimeScale,
};
use charter_core::TimePoint;
use charter_data::{KeyValueStore, MemoryStore, StoreError};

/// Plot width and height in logical pixels.
pub const PLOT: f64 = 100.0;

/// One minute per pixel, visible over `0..=PLOT`.
#[derive(Default)]
pub struct FakeTimeScale {
    /// Minutes scrolled; pixel 0 shows minute `offset`.
    pub offset: i64,
    subscribers: Vec<(SubscriptionId, RangeCallback)>,
    next: u64,
}

impl FakeTimeScale {
    /// Scroll by whole minutes and notify subscribers.
    pub fn pan(&mut self, minutes: i64) {
        self.offset += minutes;
        for (_, callback) in &mut self.subscribers {
            callback();
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl TimeScale for FakeTimeScale {
    fn pixel_to_time(&self, x: f64) -> Option<TimePoint> {
        (0.0..=PLOT)
            .contains(&x)
            .then(|| TimePoint::from_unix_seconds((x.round() as i64 + self.offset) * 60))
    }

    fn time_to_pixel(&self, time: TimePoint) -> Option<f64> {
        let x = (time.unix_seconds() / 60 - self.offset) as f64;
        (0.0..=PLOT).contains(&x).then_some(x)
    }

    fn subscribe_range_change(&mut self, callback: RangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next);
        self.next += 1;
        self.subscribers.push((id, callback));
        id
    }

    fn unsubscribe_range_change(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub, _)| *sub != id);
    }
}

/// Price 100 at the top edge, 0 at the bottom.
pub struct FakePriceScale;

impl PriceScale for FakePriceScale {
    fn pixel_to_price(&self, y: f64) -> Option<f64> {
        (0.0..=PLOT).contains(&y).then(|| PLOT - y)
    }

    fn price_to_pixel(&self, price: f64) -> Option<f64> {
        Some(PLOT - price)
    }
}

/// Calls made on the overlay, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    BufferSize(u32, u32),
    Scale(f64),
    Clear,
    Shape(ResolvedShape, Style),
}

pub struct RecordingOverlay(pub Rc<RefCell<Vec<Op>>>);

impl OverlaySurface for RecordingOverlay {
    fn set_buffer_size(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().push(Op::BufferSize(width, height));
    }

    fn set_scale(&mut self, device_pixel_ratio: f64) {
        self.0.borrow_mut().push(Op::Scale(device_pixel_ratio));
    }

    fn clear(&mut self) {
        self.0.borrow_mut().push(Op::Clear);
    }

    fn draw_shape(&mut self, shape: &ResolvedShape, style: &Style) {
        self.0.borrow_mut().push(Op::Shape(*shape, *style));
    }
}

pub struct RecordingSeries(pub Rc<RefCell<Vec<PlottedSeries>>>);

impl SeriesSurface for RecordingSeries {
    fn set_series(&mut self, series: &[PlottedSeries]) {
        *self.0.borrow_mut() = series.to_vec();
    }
}

/// Key-value store whose writes fail while `fail` is set.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    pub fail: bool,
    pub writes: usize,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Backend("quota exceeded".to_string()));
        }
        self.writes += 1;
        self.inner.set(key, value)
    }
}

pub struct Harness {
    pub chart: ChartController,
    pub time: Rc<RefCell<FakeTimeScale>>,
    pub ops: Rc<RefCell<Vec<Op>>>,
    pub series: Rc<RefCell<Vec<PlottedSeries>>>,
}

impl Harness {
    pub fn new(persistence: SharedPersistence) -> Self {
        let time = Rc::new(RefCell::new(FakeTimeScale::default()));
        let ops = Rc::new(RefCell::new(Vec::new()));
        let series = Rc::new(RefCell::new(Vec::new()));
        let chart = ChartController::new(
            time.clone(),
            Rc::new(RefCell::new(FakePriceScale)),
            Box::new(RecordingOverlay(Rc::clone(&ops))),
            Box::new(RecordingSeries(Rc::clone(&series))),
            persistence,
            ChartOptions::default(),
        );
        Self { chart, time, ops, series }
    }

    /// A chart over an in-memory store with `symbol` active.
    pub fn with_symbol(symbol: &str) -> Self {
        let mut harness = Self::new(Rc::new(RefCell::new(MemoryStore::new())));
        harness.chart.set_symbol(symbol).unwrap();
        harness
    }

    pub fn click(&mut self, x: f64, y: f64) {
        self.chart.handle_event(InputEvent::Click(ScreenPos::new(x, y))).unwrap();
    }

    pub fn hover(&mut self, x: f64, y: f64) {
        self.chart.handle_event(InputEvent::Move(ScreenPos::new(x, y))).unwrap();
    }

    /// Shapes drawn by the most recent paint.
    pub fn last_paint(&self) -> Vec<(ResolvedShape, Style)> {
        let ops = self.ops.borrow();
        let start = ops.iter().rposition(|op| *op == Op::Clear).map_or(0, |i| i + 1);
        ops[start..]
            .iter()
            .filter_map(|op| match op {
                Op::Shape(shape, style) => Some((*shape, *style)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.ops.borrow().iter().filter(|op| **op == Op::Clear).count()
    }
}
