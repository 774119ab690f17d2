//! SMI Ergodic: True Strength Index with an EMA signal line.
//!
//! diff = close[t] - close[t-1]
//! tsi = 100 * EMA(EMA(diff, long), short) / EMA(EMA(|diff|, long), short)
//! signal = EMA(tsi, signal)
//!
//! A zero denominator means no absolute movement has been smoothed in yet:
//! tsi is 0 when the numerator is 0 too, otherwise ±100 by its sign.
//!
//! Lookback: long + short + signal - 2.

use crate::components::indicator::{mask_warmup, Indicator, SignalIndicator};
use crate::domain::{Bias, Candle, IndicatorKind, Outcome, SignalRecord};
use crate::indicators::ema::ema_of_series;

#[derive(Debug, Clone)]
pub struct SmiLines {
    pub tsi: Vec<f64>,
    pub signal: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct SmiErgodic {
    long: usize,
    short: usize,
    signal: usize,
    name: String,
}

impl SmiErgodic {
    pub fn new(long: usize, short: usize, signal: usize) -> Self {
        assert!(long >= 1, "SMI long period must be >= 1");
        assert!(short >= 1, "SMI short period must be >= 1");
        assert!(signal >= 1, "SMI signal period must be >= 1");
        Self {
            long,
            short,
            signal,
            name: format!("smi_{long}_{short}_{signal}"),
        }
    }

    pub fn lines(&self, candles: &[Candle]) -> SmiLines {
        let n = candles.len();
        let mut diff = vec![f64::NAN; n];
        let mut abs_diff = vec![f64::NAN; n];
        for i in 1..n {
            let d = candles[i].close - candles[i - 1].close;
            diff[i] = d;
            abs_diff[i] = d.abs();
        }

        let num = ema_of_series(&ema_of_series(&diff, self.long), self.short);
        let den = ema_of_series(&ema_of_series(&abs_diff, self.long), self.short);

        let tsi: Vec<f64> = num
            .iter()
            .zip(&den)
            .map(|(&num, &den)| tsi_ratio(num, den))
            .collect();
        let signal = ema_of_series(&tsi, self.signal);

        SmiLines { tsi, signal }
    }
}

impl Default for SmiErgodic {
    fn default() -> Self {
        Self::new(20, 5, 5)
    }
}

fn tsi_ratio(num: f64, den: f64) -> f64 {
    if num.is_nan() || den.is_nan() {
        f64::NAN
    } else if den == 0.0 {
        if num == 0.0 {
            0.0
        } else {
            100.0 * num.signum()
        }
    } else {
        100.0 * num / den
    }
}

impl Indicator for SmiErgodic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.long + self.short + self.signal - 2
    }

    /// TSI series.
    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        mask_warmup(self.lines(candles).tsi, self.lookback())
    }
}

impl SignalIndicator for SmiErgodic {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Smi
    }

    fn evaluate(&self, candles: &[Candle]) -> Outcome {
        if let Some(undefined) = self.check_warmup(candles) {
            return undefined;
        }

        let lines = self.lines(candles);
        let last = candles.len() - 1;
        let (tsi, signal) = (lines.tsi[last], lines.signal[last]);

        Outcome::Signal(
            SignalRecord::new(tsi, Bias::from_cross(tsi, signal)).with_extra("signal_line", signal),
        )
    }
}
