//! Domain types: candles, validated series, signal records.

pub mod candle;
pub mod signal;

pub use candle::{Candle, Series, SeriesError};
pub use signal::{Bias, IndicatorKind, Outcome, SignalRecord};
