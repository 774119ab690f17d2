//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing (RMA) of gains and losses, seeded at the first
//! price change.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: length.
//! Edge cases: avg_gain == avg_loss == 0 → 50; avg_loss == 0 → 100.

use crate::components::indicator::{mask_warmup, Indicator, SignalIndicator};
use crate::domain::{Bias, Candle, IndicatorKind, Outcome, SignalRecord};
use crate::indicators::ema::rma;

#[derive(Debug, Clone)]
pub struct Rsi {
    length: usize,
    name: String,
}

impl Rsi {
    pub fn new(length: usize) -> Self {
        assert!(length >= 1, "RSI length must be >= 1");
        Self {
            length,
            name: format!("rsi_{length}"),
        }
    }

    /// Unmasked RSI: defined from bar 1.
    pub fn raw(&self, candles: &[Candle]) -> Vec<f64> {
        let n = candles.len();
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];
        for i in 1..n {
            let change = candles[i].close - candles[i - 1].close;
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        let avg_gain = rma(&gains, self.length);
        let avg_loss = rma(&losses, self.length);

        avg_gain
            .iter()
            .zip(&avg_loss)
            .map(|(&g, &l)| {
                if g.is_nan() || l.is_nan() {
                    f64::NAN
                } else {
                    compute_rsi(g, l)
                }
            })
            .collect()
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.length
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        mask_warmup(self.raw(candles), self.length)
    }
}

impl SignalIndicator for Rsi {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Rsi
    }

    fn evaluate(&self, candles: &[Candle]) -> Outcome {
        if let Some(undefined) = self.check_warmup(candles) {
            return undefined;
        }

        let rsi = self.raw(candles)[candles.len() - 1];
        Outcome::Signal(SignalRecord::new(rsi, Bias::from_cross(rsi, 50.0)))
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles};

    #[test]
    fn rsi_all_gains() {
        let candles = make_candles(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&candles);
        assert_approx(result[3], 100.0, 1e-9);
        assert_approx(result[5], 100.0, 1e-9);
    }

    #[test]
    fn rsi_all_losses() {
        let candles = make_candles(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&candles);
        assert_approx(result[3], 0.0, 1e-9);
    }

    #[test]
    fn rsi_flat_is_midline() {
        let candles = make_candles(&[100.0; 20]);
        let result = Rsi::new(14).compute(&candles);
        assert_eq!(result[14], 50.0);
        assert_eq!(result[19], 50.0);
    }

    #[test]
    fn rsi_mixed_hand_computed() {
        // Changes: +2, -1; length=2 → alpha 0.5
        // gains: seed 2, then 2 + 0.5*(0-2) = 1
        // losses: seed 0, then 0 + 0.5*(1-0) = 0.5
        // RSI = 100 - 100/(1 + 1/0.5) = 100 - 100/3
        let candles = make_candles(&[10.0, 12.0, 11.0]);
        let raw = Rsi::new(2).raw(&candles);
        assert!(raw[0].is_nan());
        assert_approx(raw[1], 100.0, 1e-9);
        assert_approx(raw[2], 100.0 - 100.0 / 3.0, 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let candles = make_candles(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&candles);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(
                    (0.0..=100.0).contains(&v),
                    "RSI out of bounds at bar {i}: {v}"
                );
            }
        }
    }

    #[test]
    fn rsi_signal_uses_midline() {
        let up = Rsi::new(3).evaluate(&make_candles(&[1.0, 2.0, 3.0, 4.0]));
        assert!(up.record().unwrap().bullish());

        let flat = Rsi::new(3).evaluate(&make_candles(&[5.0; 4]));
        let record = flat.record().unwrap();
        assert!(!record.bullish() && !record.bearish());
    }

    #[test]
    fn rsi_insufficient_data() {
        let outcome = Rsi::new(14).evaluate(&make_candles(&[1.0; 10]));
        assert!(!outcome.is_defined());
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
