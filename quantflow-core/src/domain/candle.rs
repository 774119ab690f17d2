//! Candle and Series: the input unit of every indicator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One OHLC price bar for a fixed interval.
///
/// `time` is the bar's open time in seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// Open time as a UTC timestamp, `None` if out of chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }

    /// Returns true if any price field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }
}

/// Boundary validation failures. Raised before any indicator runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,

    #[error("candle {index}: {field} is not a finite number")]
    NonFinite { index: usize, field: &'static str },

    #[error("candle {index}: high {high} is below low {low}")]
    InvertedRange { index: usize, high: f64, low: f64 },

    #[error("candle {index}: time {time} precedes previous time {previous}")]
    TimeOrder {
        index: usize,
        previous: i64,
        time: i64,
    },
}

/// Validated candle series, oldest first.
///
/// Invariants: at least one candle, every price finite, `high >= low`,
/// `time` non-decreasing. The series is never re-sorted; out-of-order input
/// is rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    candles: Vec<Candle>,
}

impl Series {
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesError> {
        if candles.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (index, c) in candles.iter().enumerate() {
            if c.is_void() {
                let field = [
                    ("open", c.open),
                    ("high", c.high),
                    ("low", c.low),
                    ("close", c.close),
                ]
                .into_iter()
                .find(|(_, v)| !v.is_finite())
                .map_or("close", |(field, _)| field);
                return Err(SeriesError::NonFinite { index, field });
            }
            if c.high < c.low {
                return Err(SeriesError::InvertedRange {
                    index,
                    high: c.high,
                    low: c.low,
                });
            }
        }

        if let Some(index) = candles.windows(2).position(|w| w[1].time < w[0].time) {
            return Err(SeriesError::TimeOrder {
                index: index + 1,
                previous: candles[index].time,
                time: candles[index + 1].time,
            });
        }

        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Always false for a constructed series; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// The newest candle.
    pub fn last(&self) -> &Candle {
        // Non-empty by construction.
        &self.candles[self.candles.len() - 1]
    }

}

impl AsRef<[Candle]> for Series {
    fn as_ref(&self) -> &[Candle] {
        &self.candles
    }
}

impl TryFrom<Vec<Candle>> for Series {
    type Error = SeriesError;

    fn try_from(candles: Vec<Candle>) -> Result<Self, Self::Error> {
        Series::new(candles)
    }
}
