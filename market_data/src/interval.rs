//! Sampling intervals supported by the service
//!
//! The wire strings match the Twelve Data interval names; the same enum also
//! drives how far apart the forecast timestamps are placed.

use crate::error::{MarketDataError, Result};
use chrono::{Duration, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Bar sampling interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interval {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    FourHours,
    OneDay,
}

impl Interval {
    /// Vendor query string for this interval
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1min",
            Interval::FiveMinutes => "5min",
            Interval::FifteenMinutes => "15min",
            Interval::ThirtyMinutes => "30min",
            Interval::OneHour => "1h",
            Interval::TwoHours => "2h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1day",
        }
    }

    /// Time between consecutive bars
    pub fn step(&self) -> Duration {
        match self {
            Interval::OneMinute => Duration::minutes(1),
            Interval::FiveMinutes => Duration::minutes(5),
            Interval::FifteenMinutes => Duration::minutes(15),
            Interval::ThirtyMinutes => Duration::minutes(30),
            Interval::OneHour => Duration::hours(1),
            Interval::TwoHours => Duration::hours(2),
            Interval::FourHours => Duration::hours(4),
            Interval::OneDay => Duration::days(1),
        }
    }

    /// Create `horizon` future timestamps following `last`, stepped by this
    /// interval. The first returned timestamp is one step after `last`.
    pub fn future_timestamps(&self, last: NaiveDateTime, horizon: usize) -> Vec<NaiveDateTime> {
        let mut timestamps = Vec::with_capacity(horizon);
        let mut current = last;

        for _ in 0..horizon {
            current = current + self.step();
            timestamps.push(current);
        }

        timestamps
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::OneHour
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1min" => Ok(Interval::OneMinute),
            "5min" => Ok(Interval::FiveMinutes),
            "15min" => Ok(Interval::FifteenMinutes),
            "30min" => Ok(Interval::ThirtyMinutes),
            "1h" => Ok(Interval::OneHour),
            "2h" => Ok(Interval::TwoHours),
            "4h" => Ok(Interval::FourHours),
            "1day" => Ok(Interval::OneDay),
            other => Err(MarketDataError::InvalidInterval(other.to_string())),
        }
    }
}
