//! Asset signal scoring from a close series.
//!
//! A handful of trailing-window features (return, volatility, moving-average
//! slope, drawdown) are scored into a bullish / bearish / neutral label. Each
//! rule that fires leaves a reason and a contribution behind so the score can
//! be explained.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::moving_average::sma;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const SLOPE_LOOKBACK: usize = 5;

/// Window sizes used by [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Trailing closes used for return, volatility and slope.
    pub window_days: usize,
    /// Trailing closes used for the drawdown.
    pub drawdown_window_days: usize,
    /// Moving average period for the slope feature.
    pub ma_period: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            window_days: 30,
            drawdown_window_days: 63,
            ma_period: 20,
        }
    }
}

/// Raw feature values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub ret_30d: f64,
    /// Annualized sample volatility of daily returns.
    pub vol_30d: f64,
    pub ma20_slope: f64,
    pub drawdown_3m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl SignalLabel {
    fn from_score(score: i32) -> Self {
        if score >= 2 {
            SignalLabel::Bullish
        } else if score <= -2 {
            SignalLabel::Bearish
        } else {
            SignalLabel::Neutral
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalLabel::Bullish => "bullish",
            SignalLabel::Bearish => "bearish",
            SignalLabel::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// One scoring rule that fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub feature: String,
    pub value: f64,
    pub impact: i32,
}

/// Scored signal for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSignal {
    pub label: SignalLabel,
    pub score: i32,
    pub reasons: Vec<String>,
    pub features: Features,
    pub contributions: Vec<Contribution>,
    pub latest_price: f64,
    /// Change of the last close against the previous one, as a fraction.
    pub change_pct: Option<f64>,
}

fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// Sample standard deviation (divisor `n - 1`); `0` below two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

/// Compute the features over the trailing windows of `closes`.
///
/// Returns `None` with fewer than two closes.
pub fn compute_features(closes: &[f64], params: &AnalysisParams) -> Option<Features> {
    let window = tail(closes, params.window_days);
    if window.len() < 2 {
        return None;
    }

    let first = window[0];
    let last = window[window.len() - 1];
    let ret_30d = if first != 0.0 { last / first - 1.0 } else { 0.0 };

    let changes: Vec<f64> = window
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect();
    let vol_30d = sample_std(&changes) * TRADING_DAYS_PER_YEAR.sqrt();

    let ma: Vec<f64> = sma(window, params.ma_period).iter().map(|(_, &v)| v).collect();
    let ma20_slope = if ma.len() < SLOPE_LOOKBACK {
        0.0
    } else {
        let base = ma[ma.len() - SLOPE_LOOKBACK];
        if base == 0.0 {
            0.0
        } else {
            (ma[ma.len() - 1] - base) / base
        }
    };

    let mut peak = f64::NEG_INFINITY;
    let mut drawdown_3m = 0.0_f64;
    for &close in tail(closes, params.drawdown_window_days) {
        peak = peak.max(close);
        if peak > 0.0 {
            drawdown_3m = drawdown_3m.min(close / peak - 1.0);
        }
    }

    Some(Features {
        ret_30d,
        vol_30d,
        ma20_slope,
        drawdown_3m,
    })
}

/// Score features into a label, reasons and contributions.
pub fn score(features: &Features) -> (SignalLabel, i32, Vec<String>, Vec<Contribution>) {
    let mut score = 0;
    let mut reasons = Vec::new();
    let mut contributions = Vec::new();
    let mut fire = |impact: i32, reason: &str, feature: &str, value: f64| {
        score += impact;
        reasons.push(reason.to_string());
        contributions.push(Contribution {
            feature: feature.to_string(),
            value,
            impact,
        });
    };

    if features.ret_30d > 0.03 {
        fire(2, "Positive 30-day return (over +3%).", "Return(30D)", features.ret_30d);
    } else if features.ret_30d < -0.03 {
        fire(-2, "Negative 30-day return (below -3%).", "Return(30D)", features.ret_30d);
    }

    if features.ma20_slope > 0.01 {
        fire(1, "Rising 20-day moving average.", "MA20 Slope", features.ma20_slope);
    } else if features.ma20_slope < -0.01 {
        fire(-1, "Falling 20-day moving average.", "MA20 Slope", features.ma20_slope);
    }

    if features.drawdown_3m < -0.08 {
        fire(-1, "Large 3-month drawdown.", "Drawdown(3M)", features.drawdown_3m);
    }

    (SignalLabel::from_score(score), score, reasons, contributions)
}

/// Analyze a close series. `None` with fewer than two closes.
pub fn analyze(closes: &[f64], params: &AnalysisParams) -> Option<AssetSignal> {
    let features = compute_features(closes, params)?;
    let (label, score, reasons, contributions) = score(&features);

    let latest_price = closes[closes.len() - 1];
    let prev = closes[closes.len() - 2];
    let change_pct = (prev != 0.0).then(|| latest_price / prev - 1.0);

    Some(AssetSignal {
        label,
        score,
        reasons,
        features,
        contributions,
        latest_price,
        change_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AnalysisParams {
        AnalysisParams::default()
    }

    #[test]
    fn test_insufficient_data() {
        assert!(analyze(&[], &params()).is_none());
        assert!(analyze(&[10.0], &params()).is_none());
        assert!(analyze(&[10.0, 11.0], &params()).is_some());
    }

    #[test]
    fn test_steady_uptrend_is_bullish() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let signal = analyze(&closes, &params()).unwrap();
        assert_eq!(signal.label, SignalLabel::Bullish);
        assert_eq!(signal.score, 3);
        assert_eq!(signal.reasons.len(), 2);
        assert!(signal.features.ma20_slope > 0.01);
        assert_eq!(signal.features.drawdown_3m, 0.0);
        assert!((signal.change_pct.unwrap() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_steady_downtrend_is_bearish() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 0.99_f64.powi(i)).collect();
        let signal = analyze(&closes, &params()).unwrap();
        assert_eq!(signal.label, SignalLabel::Bearish);
        // return, slope and drawdown all fire
        assert_eq!(signal.score, -4);
        let impacts: Vec<i32> = signal.contributions.iter().map(|c| c.impact).collect();
        assert_eq!(impacts, vec![-2, -1, -1]);
    }

    #[test]
    fn test_flat_series_is_neutral() {
        let signal = analyze(&[50.0; 40], &params()).unwrap();
        assert_eq!(signal.label, SignalLabel::Neutral);
        assert_eq!(signal.score, 0);
        assert!(signal.reasons.is_empty());
        assert_eq!(signal.features.vol_30d, 0.0);
    }

    #[test]
    fn test_return_uses_trailing_window() {
        // flat for 40 closes, then a 10% jump at the very end
        let mut closes = vec![100.0; 40];
        closes.push(110.0);
        let features = compute_features(&closes, &params()).unwrap();
        assert!((features.ret_30d - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_short_window_has_zero_slope() {
        let closes: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
        let features = compute_features(&closes, &params()).unwrap();
        assert_eq!(features.ma20_slope, 0.0);
    }

    #[test]
    fn test_zero_previous_close_has_no_change() {
        let signal = analyze(&[0.0, 5.0], &params()).unwrap();
        assert_eq!(signal.latest_price, 5.0);
        assert!(signal.change_pct.is_none());
    }
}
