//! Coordinate mapping between overlay pixels and chart space.
//!
//! Two coordinate spaces are involved:
//!
//! - **Screen coordinates** ([`ScreenPos`]): logical (device-independent)
//!   pixels from the top-left of the plot area. X grows right, Y grows down.
//! - **Chart space** ([`Point`]): a time and a price.
//!
//! The host chart owns the actual axes. They are reached through the narrow
//! [`TimeScale`] and [`PriceScale`] capabilities, and [`CoordinateMapper`] is a
//! stateless adapter over a pair of them. Build a mapper whenever one is needed
//! so it always reflects the current pan and zoom.

use std::fmt;

use charter_core::{Point, TimePoint};

/// Screen coordinates in logical pixels from the top-left of the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPos {
    pub x: f64,
    pub y: f64,
}

impl ScreenPos {
    /// Create a new screen position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another screen position.
    #[must_use]
    pub fn distance_to(self, other: ScreenPos) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// Calculate squared distance (faster than distance_to when only comparing).
    #[must_use]
    pub fn distance_squared_to(self, other: ScreenPos) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for ScreenPos {
    fn from(pos: (f64, f64)) -> Self {
        Self::new(pos.0, pos.1)
    }
}

/// Handle for a range-change subscription on a [`TimeScale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Callback fired when the visible time range changes.
pub type RangeCallback = Box<dyn FnMut()>;

/// The host chart's horizontal axis.
pub trait TimeScale {
    /// Time under pixel column `x`, or `None` outside the resolvable range.
    fn pixel_to_time(&self, x: f64) -> Option<TimePoint>;

    /// Pixel column of `time`, or `None` when it is not in view.
    fn time_to_pixel(&self, time: TimePoint) -> Option<f64>;

    /// Register a callback for visible range changes (pan, zoom, new data).
    fn subscribe_range_change(&mut self, callback: RangeCallback) -> SubscriptionId;

    /// Drop a callback registered with [`subscribe_range_change`](Self::subscribe_range_change).
    fn unsubscribe_range_change(&mut self, id: SubscriptionId);
}

/// The host chart's vertical axis.
pub trait PriceScale {
    /// Price under pixel row `y`, or `None` outside the plot or before the
    /// axis has a range.
    fn pixel_to_price(&self, y: f64) -> Option<f64>;

    /// Pixel row of `price`, or `None` before the axis has a range.
    fn price_to_pixel(&self, price: f64) -> Option<f64>;
}

/// Bidirectional pixel / chart-space conversion over the host axes.
///
/// Holds no state of its own. Both directions fail together: a point only
/// maps to pixels if both of its axes resolve.
#[derive(Clone, Copy)]
pub struct CoordinateMapper<'a> {
    time: &'a dyn TimeScale,
    price: &'a dyn PriceScale,
}

impl<'a> CoordinateMapper<'a> {
    #[must_use]
    pub fn new(time: &'a dyn TimeScale, price: &'a dyn PriceScale) -> Self {
        Self { time, price }
    }

    /// Convert screen coordinates to chart space.
    #[must_use]
    pub fn to_chart_space(&self, pos: ScreenPos) -> Option<Point> {
        let time = self.time.pixel_to_time(pos.x)?;
        let price = self.price.pixel_to_price(pos.y)?;
        Some(Point::new(time, price))
    }

    /// Convert a chart-space point to screen coordinates.
    #[must_use]
    pub fn to_pixels(&self, point: Point) -> Option<ScreenPos> {
        let x = self.time.time_to_pixel(point.time)?;
        let y = self.price.price_to_pixel(point.price)?;
        Some(ScreenPos::new(x, y))
    }

    /// Pixel row of a price, ignoring the time axis.
    #[must_use]
    pub fn price_to_y(&self, price: f64) -> Option<f64> {
        self.price.price_to_pixel(price)
    }

    /// Time under a pixel column, ignoring the price axis.
    #[must_use]
    pub fn time_at(&self, x: f64) -> Option<TimePoint> {
        self.time.pixel_to_time(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One pixel per minute, visible from x = 0 to x = 100.
    struct MinuteScale;

    impl TimeScale for MinuteScale {
        fn pixel_to_time(&self, x: f64) -> Option<TimePoint> {
            (0.0..=100.0)
                .contains(&x)
                .then(|| TimePoint::from_unix_seconds((x * 60.0).round() as i64))
        }

        fn time_to_pixel(&self, time: TimePoint) -> Option<f64> {
            let x = time.unix_seconds() as f64 / 60.0;
            (0.0..=100.0).contains(&x).then_some(x)
        }

        fn subscribe_range_change(&mut self, _callback: RangeCallback) -> SubscriptionId {
            SubscriptionId(0)
        }

        fn unsubscribe_range_change(&mut self, _id: SubscriptionId) {}
    }

    /// Price 100 at the top, 0 at y = 100.
    struct InvertedScale {
        ready: bool,
    }

    impl PriceScale for InvertedScale {
        fn pixel_to_price(&self, y: f64) -> Option<f64> {
            (self.ready && (0.0..=100.0).contains(&y)).then(|| 100.0 - y)
        }

        fn price_to_pixel(&self, price: f64) -> Option<f64> {
            self.ready.then(|| 100.0 - price)
        }
    }

    #[test]
    fn test_round_trip() {
        let price = InvertedScale { ready: true };
        let mapper = CoordinateMapper::new(&MinuteScale, &price);

        let point = mapper.to_chart_space(ScreenPos::new(30.0, 25.0)).unwrap();
        assert_eq!(point.time.unix_seconds(), 1800);
        assert_eq!(point.price, 75.0);
        assert_eq!(mapper.to_pixels(point), Some(ScreenPos::new(30.0, 25.0)));
    }

    #[test]
    fn test_out_of_range_fails() {
        let price = InvertedScale { ready: true };
        let mapper = CoordinateMapper::new(&MinuteScale, &price);

        assert!(mapper.to_chart_space(ScreenPos::new(150.0, 10.0)).is_none());
        assert!(mapper.to_chart_space(ScreenPos::new(10.0, -5.0)).is_none());

        let scrolled_out = Point::new(TimePoint::from_unix_seconds(60 * 500), 50.0);
        assert!(mapper.to_pixels(scrolled_out).is_none());
        assert_eq!(mapper.price_to_y(50.0), Some(50.0));
    }

    #[test]
    fn test_axis_not_ready() {
        let price = InvertedScale { ready: false };
        let mapper = CoordinateMapper::new(&MinuteScale, &price);
        assert!(mapper.to_chart_space(ScreenPos::new(10.0, 10.0)).is_none());
        assert!(mapper.price_to_y(10.0).is_none());
    }

    #[test]
    fn test_screen_distance() {
        let a = ScreenPos::new(0.0, 0.0);
        let b = ScreenPos::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(a.distance_squared_to(b), 25.0);
    }
}
