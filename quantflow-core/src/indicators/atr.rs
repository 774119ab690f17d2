//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! TR[0] = high[0] - low[0] (no previous close).
//! ATR uses Wilder smoothing (RMA, alpha = 1/period) seeded at TR[0].
//! Lookback: period.

use crate::components::indicator::{mask_warmup, Indicator};
use crate::domain::Candle;
use crate::indicators::ema::rma;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }

    /// Unmasked ATR: defined from bar 0.
    pub fn raw(&self, candles: &[Candle]) -> Vec<f64> {
        rma(&true_range(candles), self.period)
    }
}

/// Compute the True Range series from candles.
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(candles.len());

    if let Some(first) = candles.first() {
        tr.push(first.high - first.low);
    }

    for w in candles.windows(2) {
        let (prev, c) = (&w[0], &w[1]);
        let pc = prev.close;
        tr.push(
            (c.high - c.low)
                .max((c.high - pc).abs())
                .max((c.low - pc).abs()),
        );
    }

    tr
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        mask_warmup(self.raw(candles), self.period)
    }
}
