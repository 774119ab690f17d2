//! Aroon Oscillator: time since highest high minus time since lowest low.
//!
//! Aroon Up = 100 * (length - bars_since_highest_high) / length
//! Aroon Down = 100 * (length - bars_since_lowest_low) / length
//! Oscillator = Up - Down, in [-100, 100].
//! Window: length + 1 bars, ties resolve to the earliest extremum.
//! Lookback: length.

use crate::components::indicator::{Indicator, SignalIndicator};
use crate::domain::{Bias, Candle, IndicatorKind, Outcome, SignalRecord};
use crate::indicators::extremum::{bars_since_highest, bars_since_lowest};

/// Both Aroon lines and their difference.
#[derive(Debug, Clone)]
pub struct AroonLines {
    pub up: Vec<f64>,
    pub down: Vec<f64>,
    pub oscillator: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Aroon {
    length: usize,
    name: String,
}

impl Aroon {
    pub fn new(length: usize) -> Self {
        assert!(length >= 1, "Aroon length must be >= 1");
        Self {
            length,
            name: format!("aroon_{length}"),
        }
    }

    pub fn lines(&self, candles: &[Candle]) -> AroonLines {
        let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
        let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
        let len = self.length as f64;

        let up: Vec<f64> = bars_since_highest(&highs, self.length)
            .into_iter()
            .map(|since| 100.0 * (len - since) / len)
            .collect();
        let down: Vec<f64> = bars_since_lowest(&lows, self.length)
            .into_iter()
            .map(|since| 100.0 * (len - since) / len)
            .collect();
        let oscillator = up.iter().zip(&down).map(|(u, d)| u - d).collect();

        AroonLines {
            up,
            down,
            oscillator,
        }
    }
}

impl Default for Aroon {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Aroon {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.length
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        self.lines(candles).oscillator
    }
}

impl SignalIndicator for Aroon {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Aroon
    }

    fn evaluate(&self, candles: &[Candle]) -> Outcome {
        if let Some(undefined) = self.check_warmup(candles) {
            return undefined;
        }

        let lines = self.lines(candles);
        let last = candles.len() - 1;
        let osc = lines.oscillator[last];

        Outcome::Signal(
            SignalRecord::new(osc, Bias::from_sign(osc))
                .with_extra("aroon_up", lines.up[last])
                .with_extra("aroon_down", lines.down[last]),
        )
    }
}
