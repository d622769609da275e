//! Validation utilities for loaded price data.

use charter_core::Bar;

/// Validate a bar has reasonable values.
///
/// Every present value must be finite, volume must not be negative and
/// `high` must not be below `low` when both are present.
pub fn validate_bar(bar: &Bar) -> bool {
    let prices_finite = [bar.open, bar.high, bar.low]
        .iter()
        .flatten()
        .all(|p| p.is_finite())
        && bar.close.is_finite();

    let volume_ok = bar.volume.map_or(true, |v| v.is_finite() && v >= 0.0);

    let range_ok = match (bar.high, bar.low) {
        (Some(high), Some(low)) => high >= low,
        _ => true,
    };

    prices_finite && volume_ok && range_ok
}
