//! SMC swing structure: pivot detection with Break-of-Structure trend.
//!
//! At bar i (for i >= swing_length) the candidate pivot is p = i - swing_length.
//! p is a pivot high when high[p] equals the max of high over
//! [max(0, p - swing_length), p + swing_length]; pivot lows are symmetric.
//! Confirmed pivots replace the last swing levels, then close[i] is checked
//! against them: above the swing high → Bullish, below the swing low → Bearish.
//!
//! State starts at (high[0], low[0], Neutral). A series no longer than
//! swing_length never confirms a pivot and yields that seed.
//!
//! A close that breaks both levels on the same bar has no defined direction;
//! the scan stops there and the bar is reported.

use crate::components::indicator::{Indicator, SignalIndicator};
use crate::domain::{Bias, Candle, IndicatorKind, Outcome, SignalRecord};

/// Swing levels and trend carried from bar to bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingState {
    pub last_swing_high: f64,
    pub last_swing_low: f64,
    pub trend: Bias,
}

impl SwingState {
    fn seed(first: &Candle) -> Self {
        Self {
            last_swing_high: first.high,
            last_swing_low: first.low,
            trend: Bias::Neutral,
        }
    }
}

/// Per-bar trend history plus the state after the last processed bar.
#[derive(Debug, Clone, PartialEq)]
pub struct SwingTrace {
    /// One entry per processed bar. Shorter than the input when the scan
    /// stopped at an ambiguous break.
    pub trend: Vec<Bias>,
    pub state: SwingState,
    /// Bar whose close broke both swing levels.
    pub ambiguous_at: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Smc {
    swing_length: usize,
    name: String,
}

impl Smc {
    pub fn new(swing_length: usize) -> Self {
        assert!(swing_length >= 1, "SMC swing length must be >= 1");
        Self {
            swing_length,
            name: format!("smc_{swing_length}"),
        }
    }

    /// Run the swing/BOS scan. `None` for an empty series.
    pub fn track(&self, candles: &[Candle]) -> Option<SwingTrace> {
        let first = candles.first()?;
        let n = candles.len();
        let len = self.swing_length;

        let mut state = SwingState::seed(first);
        let mut trend = Vec::with_capacity(n);
        trend.resize(n.min(len), Bias::Neutral);

        for i in len..n {
            let p = i - len;
            let window = &candles[p.saturating_sub(len)..=p + len];

            let pivot = &candles[p];
            if window.iter().all(|c| c.high <= pivot.high) {
                state.last_swing_high = pivot.high;
            }
            if window.iter().all(|c| c.low >= pivot.low) {
                state.last_swing_low = pivot.low;
            }

            let close = candles[i].close;
            let breaks_high = close > state.last_swing_high;
            let breaks_low = close < state.last_swing_low;
            match (breaks_high, breaks_low) {
                (true, true) => {
                    tracing::debug!(bar = i, close, "close broke both swing levels");
                    return Some(SwingTrace {
                        trend,
                        state,
                        ambiguous_at: Some(i),
                    });
                }
                (true, false) => state.trend = Bias::Bullish,
                (false, true) => state.trend = Bias::Bearish,
                (false, false) => {}
            }
            trend.push(state.trend);
        }

        Some(SwingTrace {
            trend,
            state,
            ambiguous_at: None,
        })
    }
}

impl Default for Smc {
    fn default() -> Self {
        Self::new(50)
    }
}

impl Indicator for Smc {
    fn name(&self) -> &str {
        &self.name
    }

    /// The seeded state is a defined result, so no warm-up is masked.
    fn lookback(&self) -> usize {
        0
    }

    /// Trend per bar as 1 / -1 / 0, NaN from an ambiguous break onward.
    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        let mut values = vec![f64::NAN; candles.len()];
        if let Some(trace) = self.track(candles) {
            for (slot, bias) in values.iter_mut().zip(&trace.trend) {
                *slot = bias.as_f64();
            }
        }
        values
    }
}

impl SignalIndicator for Smc {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::Smc
    }

    fn evaluate(&self, candles: &[Candle]) -> Outcome {
        if let Some(undefined) = self.check_warmup(candles) {
            return undefined;
        }

        match self.track(candles) {
            Some(SwingTrace {
                ambiguous_at: Some(bar),
                ..
            }) => Outcome::AmbiguousBreak { bar },
            Some(SwingTrace { state, .. }) => Outcome::Signal(
                SignalRecord::new(state.trend.as_f64(), state.trend)
                    .with_extra("last_swing_high", state.last_swing_high)
                    .with_extra("last_swing_low", state.last_swing_low),
            ),
            None => Outcome::InsufficientData {
                required: self.min_bars(),
                available: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc;

    /// Flat range with a pivot high of 120 at bar 50 and a close of 125 at bar 110.
    fn pivot_then_break(n: usize) -> Vec<Candle> {
        let data: Vec<(f64, f64, f64, f64)> = (0..n)
            .map(|i| match i {
                50 => (95.0, 120.0, 90.0, 95.0),
                110 => (95.0, 126.0, 90.0, 125.0),
                _ => (95.0, 100.0, 90.0, 95.0),
            })
            .collect();
        make_ohlc(&data)
    }

    #[test]
    fn break_of_confirmed_pivot_turns_bullish_exactly_there() {
        let trace = Smc::new(50).track(&pivot_then_break(120)).unwrap();
        assert_eq!(trace.trend.len(), 120);
        assert!(trace.trend[..110].iter().all(|&b| b == Bias::Neutral));
        assert_eq!(trace.trend[110], Bias::Bullish);
        assert_eq!(trace.trend[119], Bias::Bullish);
        assert_eq!(trace.state.last_swing_high, 120.0);
        assert_eq!(trace.state.last_swing_low, 90.0);
    }

    #[test]
    fn pivot_confirms_only_after_swing_length_bars() {
        // Before bar 100 the seed high (100) is still the swing high.
        let trace = Smc::new(50).track(&pivot_then_break(100)).unwrap();
        assert_eq!(trace.state.last_swing_high, 100.0);
        let trace = Smc::new(50).track(&pivot_then_break(101)).unwrap();
        assert_eq!(trace.state.last_swing_high, 120.0);
    }

    #[test]
    fn evaluate_reports_swing_levels() {
        let outcome = Smc::new(50).evaluate(&pivot_then_break(120));
        let record = outcome.record().unwrap();
        assert!(record.bullish());
        assert_eq!(record.value(), 1.0);
        assert_eq!(record.extra("last_swing_high"), Some(120.0));
        assert_eq!(record.extra("last_swing_low"), Some(90.0));
    }

    #[test]
    fn series_of_swing_length_returns_seed() {
        let candles = pivot_then_break(50);
        let outcome = Smc::new(50).evaluate(&candles);
        let record = outcome.record().unwrap();
        assert_eq!(record.bias(), Bias::Neutral);
        assert_eq!(record.extra("last_swing_high"), Some(candles[0].high));
        assert_eq!(record.extra("last_swing_low"), Some(candles[0].low));
    }

    #[test]
    fn single_candle_is_defined() {
        let outcome = Smc::default().evaluate(&pivot_then_break(1));
        assert!(outcome.is_defined());
        assert_eq!(outcome.bias(), Some(Bias::Neutral));
    }

    #[test]
    fn empty_series_is_insufficient() {
        assert_eq!(
            Smc::default().evaluate(&[]),
            Outcome::InsufficientData {
                required: 1,
                available: 0
            }
        );
    }

    #[test]
    fn bearish_break_below_swing_low() {
        let data: Vec<(f64, f64, f64, f64)> = (0..8)
            .map(|i| if i == 7 { (10.0, 10.5, 3.0, 4.0) } else { (10.0, 11.0, 9.0, 10.0) })
            .collect();
        let trace = Smc::new(2).track(&make_ohlc(&data)).unwrap();
        assert_eq!(trace.state.last_swing_low, 9.0);
        assert_eq!(trace.trend[6], Bias::Neutral);
        assert_eq!(trace.trend[7], Bias::Bearish);
    }

    #[test]
    fn close_through_both_levels_is_ambiguous() {
        // Pivot high 10 (bar 1) sits below a later pivot low 20 (bar 4);
        // bar 6 closes at 15, between them.
        let candles = make_ohlc(&[
            (7.5, 8.0, 7.0, 7.5),
            (8.5, 10.0, 8.0, 9.0),
            (9.0, 9.0, 8.5, 8.8),
            (22.5, 23.0, 22.0, 22.5),
            (21.0, 24.0, 20.0, 21.0),
            (22.0, 25.0, 21.0, 22.0),
            (25.0, 26.0, 14.0, 15.0),
        ]);
        let smc = Smc::new(1);
        let trace = smc.track(&candles).unwrap();
        assert_eq!(trace.ambiguous_at, Some(6));
        assert_eq!(trace.state.last_swing_high, 10.0);
        assert_eq!(trace.state.last_swing_low, 20.0);
        assert_eq!(trace.trend.len(), 6);

        assert_eq!(smc.evaluate(&candles), Outcome::AmbiguousBreak { bar: 6 });

        let values = smc.compute(&candles);
        assert_eq!(values[5], 1.0);
        assert!(values[6].is_nan());
    }
}
