//! MACD with a simple-moving-average signal line.
//!
//! macd = EMA(close, fast) - EMA(close, slow)
//! signal = SMA(macd, signal)   (not the conventional EMA)
//! histogram = macd - signal
//! Lookback: slow + signal - 2 (slow EMA span plus a full signal window).

use crate::components::indicator::{mask_warmup, Indicator, SignalIndicator};
use crate::domain::{Bias, Candle, IndicatorKind, Outcome, SignalRecord};
use crate::indicators::ema::ema_of_series;
use crate::indicators::sma::sma_of_series;

#[derive(Debug, Clone)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1, "MACD fast period must be >= 1");
        assert!(slow >= 1, "MACD slow period must be >= 1");
        assert!(signal >= 1, "MACD signal period must be >= 1");
        Self {
            fast,
            slow,
            signal,
            name: format!("macd_{fast}_{slow}_{signal}"),
        }
    }

    pub fn lines(&self, candles: &[Candle]) -> MacdLines {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);

        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = sma_of_series(&macd, self.signal);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        MacdLines {
            macd,
            signal,
            histogram,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.slow.max(self.fast) + self.signal - 2
    }

    /// Histogram series.
    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        mask_warmup(self.lines(candles).histogram, self.lookback())
    }
}

impl SignalIndicator for Macd {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Macd
    }

    fn evaluate(&self, candles: &[Candle]) -> Outcome {
        if let Some(undefined) = self.check_warmup(candles) {
            return undefined;
        }

        let lines = self.lines(candles);
        let last = candles.len() - 1;
        let (macd, signal) = (lines.macd[last], lines.signal[last]);

        Outcome::Signal(
            SignalRecord::new(macd, Bias::from_cross(macd, signal))
                .with_extra("signal_line", signal)
                .with_extra("histogram", lines.histogram[last]),
        )
    }
}
