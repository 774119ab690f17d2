//! Concrete indicator implementations.
//!
//! Smoothing primitives (`sma`, `ema`, `extremum`, `atr`) are plain functions
//! over value sequences. The six signal indicators implement
//! `SignalIndicator` and are run independently over the same candle series.
//!
//! UT Bot and SMC are stateful: each bar's output folds over the previous
//! bar's state, so their recurrences are strictly sequential.

pub mod aroon;
pub mod atr;
pub mod ema;
pub mod extremum;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod smc;
pub mod smi;
pub mod ut_bot;

pub use aroon::{Aroon, AroonLines};
pub use atr::{true_range, Atr};
pub use ema::{ema_of_series, exponential_smooth, rma};
pub use extremum::{bars_since_highest, bars_since_lowest, rolling_max, rolling_min};
pub use macd::{Macd, MacdLines};
pub use rsi::Rsi;
pub use sma::sma_of_series;
pub use smc::{Smc, SwingState, SwingTrace};
pub use smi::{SmiErgodic, SmiLines};
pub use ut_bot::{trail_stop, TrailPosition, TrailState, TrailTrace, UtBot};

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for first bar), high = max(open,close) + 1.0,
/// low = min(open,close) - 1.0, one minute apart.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    use crate::domain::Candle;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Candle::new(1_700_000_000 + i as i64 * 60, open, high, low, close)
        })
        .collect()
}

/// Create candles from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Candle> {
    use crate::domain::Candle;
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| {
            Candle::new(1_700_000_000 + i as i64 * 60, open, high, low, close)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
