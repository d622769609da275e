//! Chart time values.

use std::fmt;

use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// An opaque, totally ordered point on the chart's time axis.
///
/// Internally this is a unix timestamp in seconds, but nothing outside this
/// module should rely on that: chart code only compares time points and maps
/// them through a time scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePoint(i64);

impl TimePoint {
    /// Create a time point from unix seconds.
    #[must_use]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Unix seconds of this time point.
    #[must_use]
    pub const fn unix_seconds(self) -> i64 {
        self.0
    }

    /// Midnight UTC of the given calendar date.
    ///
    /// Returns `None` for out-of-range months or days.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) || year < 1970 {
            return None;
        }

        let mut days: i64 = 0;
        for y in 1970..year {
            days += if is_leap_year(y) { 366 } else { 365 };
        }
        let month_days = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
        days += month_days[month as usize - 1] as i64;
        if month > 2 && is_leap_year(year) {
            days += 1;
        }
        days += (day - 1) as i64;

        Some(Self(days * SECONDS_PER_DAY))
    }

    /// Parse a date label.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and unix timestamps in
    /// seconds or milliseconds (13+ digits).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(ts) = s.parse::<f64>() {
            if !ts.is_finite() {
                return None;
            }
            let seconds = if ts.abs() > 1e12 { ts / 1000.0 } else { ts };
            return Some(Self(seconds as i64));
        }

        let parts: Vec<&str> = s.split(&['-', ' ', ':', 'T']).filter(|p| !p.is_empty()).collect();
        if parts.len() != 3 && parts.len() < 6 {
            return None;
        }
        let year: i32 = parts[0].parse().ok()?;
        let month: u32 = parts[1].parse().ok()?;
        let day: u32 = parts[2].parse().ok()?;
        let date = Self::from_ymd(year, month, day)?;

        if parts.len() == 3 {
            return Some(date);
        }

        let hour: i64 = parts[3].parse().ok()?;
        let min: i64 = parts[4].parse().ok()?;
        let sec: i64 = parts[5].parse::<f64>().ok()? as i64;
        if hour > 23 || min > 59 || sec > 60 {
            return None;
        }
        Some(Self(date.0 + hour * 3600 + min * 60 + sec))
    }

    /// Calendar date `(year, month, day)` in UTC.
    #[must_use]
    pub fn ymd(self) -> (i32, u32, u32) {
        civil_from_days(self.0.div_euclid(SECONDS_PER_DAY))
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (y, m, d) = self.ymd();
        let secs = self.0.rem_euclid(SECONDS_PER_DAY);
        if secs == 0 {
            write!(f, "{y:04}-{m:02}-{d:02}")
        } else {
            write!(
                f,
                "{y:04}-{m:02}-{d:02} {:02}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            )
        }
    }
}

fn is_leap_year(y: i32) -> bool {
    y % 4 == 0 && (y % 100 != 0 || y % 400 == 0)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

// Days since 1970-01-01 to a proleptic Gregorian date.
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = (yoe + era * 400 + i64::from(month <= 2)) as i32;
    (year, month, day)
}
