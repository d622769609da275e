//! Alignment of indicator output with time labels.

use charter_core::TimeSeries;

/// Zip time labels with an indicator series, dropping undefined slots.
///
/// The result is sparse and gap-free, ready for a plotting surface that
/// cannot render holes. Extra labels or slots beyond the shorter of the two
/// inputs are ignored.
pub fn align<T: Copy>(times: &[T], series: &TimeSeries<f64>) -> Vec<(T, f64)> {
    times
        .iter()
        .zip(series.values())
        .filter_map(|(&t, v)| v.map(|v| (t, v)))
        .collect()
}
