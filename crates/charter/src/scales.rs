//! Concrete axes for a bar chart.
//!
//! [`BarTimeScale`] lays bars out at a fixed pixel spacing with the newest
//! bar at the right edge, like a trading chart. [`LinearPriceScale`] maps a
//! price range linearly onto the plot height. Both are usable as the host
//! capabilities behind a [`CoordinateMapper`](crate::coords::CoordinateMapper).

use charter_core::TimePoint;

use crate::coords::{PriceScale, RangeCallback, SubscriptionId, TimeScale};

/// Minimum pixels per bar when zooming out.
const MIN_BAR_SPACING: f64 = 0.5;
/// Maximum pixels per bar when zooming in.
const MAX_BAR_SPACING: f64 = 100.0;

/// Horizontal axis over a sequence of bar times.
///
/// Bar `i` is centred at `width - (right_index - i) * bar_spacing`, so
/// panning moves `right_index` and zooming changes `bar_spacing`.
pub struct BarTimeScale {
    times: Vec<TimePoint>,
    width: f64,
    bar_spacing: f64,
    /// Fractional bar index at the right edge.
    right_index: f64,
    subscribers: Vec<(SubscriptionId, RangeCallback)>,
    next_subscription: u64,
}

impl BarTimeScale {
    pub fn new(width: f64, bar_spacing: f64) -> Self {
        Self {
            times: Vec::new(),
            width: width.max(0.0),
            bar_spacing: bar_spacing.clamp(MIN_BAR_SPACING, MAX_BAR_SPACING),
            right_index: 0.0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Replace the bar times and scroll to the newest bar.
    pub fn set_times(&mut self, times: Vec<TimePoint>) {
        self.times = times;
        self.scroll_to_latest();
    }

    pub fn times(&self) -> &[TimePoint] {
        &self.times
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }

    /// Number of active range subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width.max(0.0);
        self.notify();
    }

    /// Put the newest bar half a bar in from the right edge.
    pub fn scroll_to_latest(&mut self) {
        self.right_index = self.times.len() as f64 - 0.5;
        self.notify();
    }

    /// Fit every bar into the current width.
    pub fn fit_content(&mut self) {
        if !self.times.is_empty() && self.width > 0.0 {
            self.bar_spacing = self.width / self.times.len() as f64;
        }
        self.scroll_to_latest();
    }

    /// Pan by `dx` pixels. Positive values reveal older bars.
    pub fn scroll_by(&mut self, dx: f64) {
        self.right_index -= dx / self.bar_spacing;
        self.notify();
    }

    /// Zoom by `factor` keeping the bar under `anchor_x` in place.
    pub fn zoom(&mut self, factor: f64, anchor_x: f64) {
        let anchor_index = self.x_to_index(anchor_x);
        self.bar_spacing = (self.bar_spacing * factor).clamp(MIN_BAR_SPACING, MAX_BAR_SPACING);
        self.right_index = anchor_index + (self.width - anchor_x) / self.bar_spacing;
        self.notify();
    }

    /// Visible fractional index range `(left, right)`.
    pub fn visible_range(&self) -> (f64, f64) {
        (self.x_to_index(0.0), self.right_index)
    }

    fn index_to_x(&self, index: f64) -> f64 {
        self.width - (self.right_index - index) * self.bar_spacing
    }

    fn x_to_index(&self, x: f64) -> f64 {
        self.right_index - (self.width - x) / self.bar_spacing
    }

    /// Fractional bar index of `time`, interpolating between bars.
    fn index_of(&self, time: TimePoint) -> Option<f64> {
        let i = self.times.partition_point(|t| *t < time);
        if i < self.times.len() && self.times[i] == time {
            return Some(i as f64);
        }
        if i == 0 || i == self.times.len() {
            return None;
        }
        let (t0, t1) = (self.times[i - 1].unix_seconds(), self.times[i].unix_seconds());
        let frac = (time.unix_seconds() - t0) as f64 / (t1 - t0) as f64;
        Some((i - 1) as f64 + frac)
    }

    fn in_view(&self, x: f64) -> bool {
        x >= 0.0 && x <= self.width
    }

    fn notify(&mut self) {
        for (_, callback) in &mut self.subscribers {
            callback();
        }
    }
}

impl TimeScale for BarTimeScale {
    fn pixel_to_time(&self, x: f64) -> Option<TimePoint> {
        if !self.in_view(x) || self.times.is_empty() {
            return None;
        }
        let index = self.x_to_index(x).round();
        if index < 0.0 || index >= self.times.len() as f64 {
            return None;
        }
        self.times.get(index as usize).copied()
    }

    fn time_to_pixel(&self, time: TimePoint) -> Option<f64> {
        let x = self.index_to_x(self.index_of(time)?);
        self.in_view(x).then_some(x)
    }

    fn subscribe_range_change(&mut self, callback: RangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, callback));
        id
    }

    fn unsubscribe_range_change(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub, _)| *sub != id);
    }
}

/// Linear vertical axis with the highest price at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPriceScale {
    min: f64,
    max: f64,
    height: f64,
}

impl LinearPriceScale {
    /// An axis with no range yet; nothing resolves until one is set.
    pub fn new(height: f64) -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            height: height.max(0.0),
        }
    }

    pub fn set_range(&mut self, min: f64, max: f64) {
        self.min = min;
        self.max = max;
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height.max(0.0);
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Fit the range to `values` with `margin` (fraction of the span) above
    /// and below. Non-finite values are ignored.
    pub fn autoscale(&mut self, values: &[f64], margin: f64) {
        let (lo, hi) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        if lo > hi {
            return;
        }
        // a flat series still gets a usable range
        let span = if hi > lo { hi - lo } else { lo.abs().max(1.0) * 0.01 };
        self.min = lo - span * margin;
        self.max = hi + span * margin;
    }

    fn is_ready(&self) -> bool {
        self.height > 0.0 && self.min.is_finite() && self.max.is_finite() && self.max > self.min
    }
}

impl PriceScale for LinearPriceScale {
    fn pixel_to_price(&self, y: f64) -> Option<f64> {
        if !self.is_ready() || y < 0.0 || y > self.height {
            return None;
        }
        Some(self.max - y / self.height * (self.max - self.min))
    }

    fn price_to_pixel(&self, price: f64) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }
        Some((self.max - price) / (self.max - self.min) * self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn days(n: i64) -> Vec<TimePoint> {
        (0..n).map(|d| TimePoint::from_unix_seconds(d * 86_400)).collect()
    }

    #[test]
    fn test_latest_bar_at_right_edge() {
        let mut scale = BarTimeScale::new(100.0, 10.0);
        scale.set_times(days(20));

        // newest bar centred half a bar in from the right
        assert_eq!(scale.time_to_pixel(days(20)[19]), Some(95.0));
        assert_eq!(scale.pixel_to_time(95.0), Some(days(20)[19]));
        assert_eq!(scale.pixel_to_time(6.0), Some(days(20)[10]));
        // scrolled out on the left
        assert_eq!(scale.time_to_pixel(days(20)[0]), None);
    }

    #[test]
    fn test_pixel_outside_plot() {
        let mut scale = BarTimeScale::new(100.0, 10.0);
        scale.set_times(days(5));
        assert_eq!(scale.pixel_to_time(-1.0), None);
        assert_eq!(scale.pixel_to_time(101.0), None);
        // left of the first bar
        assert_eq!(scale.pixel_to_time(10.0), None);
    }

    #[test]
    fn test_time_between_bars_interpolates() {
        let mut scale = BarTimeScale::new(100.0, 10.0);
        scale.set_times(days(3));
        let noon = TimePoint::from_unix_seconds(86_400 + 43_200);
        assert_eq!(scale.time_to_pixel(noon), Some(90.0));
    }

    #[test]
    fn test_scroll_and_zoom_notify() {
        let hits = Rc::new(Cell::new(0));
        let mut scale = BarTimeScale::new(100.0, 10.0);
        let counter = hits.clone();
        let id = scale.subscribe_range_change(Box::new(move || counter.set(counter.get() + 1)));

        scale.set_times(days(50));
        scale.scroll_by(20.0);
        scale.zoom(2.0, 50.0);
        assert_eq!(hits.get(), 3);

        scale.unsubscribe_range_change(id);
        assert_eq!(scale.subscriber_count(), 0);
        scale.scroll_by(20.0);
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn test_zoom_keeps_anchor() {
        let mut scale = BarTimeScale::new(200.0, 10.0);
        scale.set_times(days(100));
        let before = scale.pixel_to_time(100.0);
        scale.zoom(2.0, 100.0);
        assert_eq!(scale.pixel_to_time(100.0), before);
        assert_eq!(scale.bar_spacing(), 20.0);
    }

    #[test]
    fn test_fit_content() {
        let mut scale = BarTimeScale::new(100.0, 10.0);
        scale.set_times(days(50));
        scale.fit_content();
        assert_eq!(scale.bar_spacing(), 2.0);
        assert!(scale.time_to_pixel(days(50)[0]).is_some());
    }

    #[test]
    fn test_price_scale() {
        let mut scale = LinearPriceScale::new(200.0);
        assert_eq!(scale.price_to_pixel(10.0), None);

        scale.set_range(0.0, 100.0);
        assert_eq!(scale.price_to_pixel(100.0), Some(0.0));
        assert_eq!(scale.price_to_pixel(25.0), Some(150.0));
        assert_eq!(scale.pixel_to_price(150.0), Some(25.0));
        assert_eq!(scale.pixel_to_price(201.0), None);
    }

    #[test]
    fn test_autoscale() {
        let mut scale = LinearPriceScale::new(100.0);
        scale.autoscale(&[10.0, 20.0, f64::NAN], 0.1);
        assert_eq!(scale.range(), (9.0, 21.0));

        scale.autoscale(&[5.0, 5.0], 0.0);
        let (lo, hi) = scale.range();
        assert!(hi > lo);
    }
}
