//! UT Bot: ATR trailing stop with a crossover position tracker.
//!
//! Inherently sequential/stateful: `stop[i]` and `position[i]` are functions
//! of `stop[i-1]`, `position[i-1]` and bar i's close and loss only.
//!
//! loss[i] = key_value * ATR[i]   (ATR = RMA of true range, atr_period)
//!
//! Stop recurrence, with prev = close[i-1] and s = stop[i-1]:
//!   prev > s && close > s → max(s, close - loss)
//!   prev < s && close < s → min(s, close + loss)
//!   close > s            → close - loss
//!   otherwise            → close + loss
//!
//! Position recurrence compares against `stop[i-1]`, never `stop[i]`:
//!   prev < s && close > s → Long
//!   prev > s && close < s → Short
//!   otherwise             → position[i-1]
//!
//! Initialization: stop[0] = close[0] + loss[0], position[0] = Flat. The seed
//! sits above the first close, so a sustained advance registers as a Long
//! cross instead of trailing underneath price forever.
//!
//! The widely shared UT Bot script seeds the stop at 0 instead. Under a 0 (or
//! first-close) seed the stop trails below price from bar 1 and a rising
//! market never crosses it, so early-bar stops and positions here differ
//! from that script until the first genuine cross; afterwards both follow
//! the same recurrence.
//!
//! Lookback: atr_period.

use crate::components::indicator::{mask_warmup, Indicator, SignalIndicator};
use crate::domain::{Bias, Candle, IndicatorKind, Outcome, SignalRecord};
use crate::indicators::atr::Atr;
use serde::{Deserialize, Serialize};

/// Trailing-stop side carried bar to bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailPosition {
    Flat,
    Long,
    Short,
}

impl TrailPosition {
    pub fn bias(self) -> Bias {
        match self {
            TrailPosition::Flat => Bias::Neutral,
            TrailPosition::Long => Bias::Bullish,
            TrailPosition::Short => Bias::Bearish,
        }
    }
}

/// State carried from one bar to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailState {
    pub stop: f64,
    pub position: TrailPosition,
}

impl TrailState {
    /// Advance one bar.
    pub fn step(self, prev_close: f64, close: f64, loss: f64) -> TrailState {
        let s = self.stop;

        let stop = if prev_close > s && close > s {
            s.max(close - loss)
        } else if prev_close < s && close < s {
            s.min(close + loss)
        } else if close > s {
            close - loss
        } else {
            close + loss
        };

        let position = if prev_close < s && close > s {
            TrailPosition::Long
        } else if prev_close > s && close < s {
            TrailPosition::Short
        } else {
            self.position
        };

        TrailState { stop, position }
    }
}

/// Per-bar stop and position history.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailTrace {
    pub stop: Vec<f64>,
    pub position: Vec<TrailPosition>,
}

impl TrailTrace {
    pub fn last(&self) -> Option<TrailState> {
        Some(TrailState {
            stop: *self.stop.last()?,
            position: *self.position.last()?,
        })
    }
}

/// Run the trailing-stop recurrence over closes and per-bar loss distances.
///
/// `closes` and `loss` must have equal length.
pub fn trail_stop(closes: &[f64], loss: &[f64]) -> TrailTrace {
    debug_assert_eq!(closes.len(), loss.len());
    let n = closes.len().min(loss.len());
    let mut trace = TrailTrace {
        stop: Vec::with_capacity(n),
        position: Vec::with_capacity(n),
    };
    if n == 0 {
        return trace;
    }

    let mut state = TrailState {
        stop: closes[0] + loss[0],
        position: TrailPosition::Flat,
    };
    trace.stop.push(state.stop);
    trace.position.push(state.position);

    for i in 1..n {
        state = state.step(closes[i - 1], closes[i], loss[i]);
        trace.stop.push(state.stop);
        trace.position.push(state.position);
    }

    trace
}

#[derive(Debug, Clone)]
pub struct UtBot {
    key_value: f64,
    atr: Atr,
    atr_period: usize,
    name: String,
}

impl UtBot {
    pub fn new(key_value: f64, atr_period: usize) -> Self {
        assert!(atr_period >= 1, "UT Bot ATR period must be >= 1");
        assert!(
            key_value.is_finite() && key_value > 0.0,
            "UT Bot key value must be positive"
        );
        Self {
            key_value,
            atr: Atr::new(atr_period),
            atr_period,
            name: format!("ut_bot_{key_value}_{atr_period}"),
        }
    }

    /// Full stop/position history for the series.
    pub fn trace(&self, candles: &[Candle]) -> TrailTrace {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let loss: Vec<f64> = self
            .atr
            .raw(candles)
            .into_iter()
            .map(|atr| self.key_value * atr)
            .collect();
        trail_stop(&closes, &loss)
    }
}

impl Default for UtBot {
    fn default() -> Self {
        Self::new(1.0, 10)
    }
}

impl Indicator for UtBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.atr_period
    }

    /// Trailing stop series.
    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        mask_warmup(self.trace(candles).stop, self.atr_period)
    }
}

impl SignalIndicator for UtBot {
    fn kind(&self) -> IndicatorKind {
        IndicatorKind::UtBot
    }

    fn evaluate(&self, candles: &[Candle]) -> Outcome {
        if let Some(undefined) = self.check_warmup(candles) {
            return undefined;
        }

        match self.trace(candles).last() {
            Some(state) => Outcome::Signal(SignalRecord::new(state.stop, state.position.bias())),
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
    use crate::indicators::{assert_approx, make_candles, make_ohlc};
    use TrailPosition::{Flat, Long, Short};

    #[test]
    fn six_bar_fixture_matches_hand_computation() {
        // loss fixed at 1.0 on every bar.
        // bar 0: stop = 10 + 1 = 11, Flat
        // bar 1: 10 < 11 && 10.5 < 11 → min(11, 11.5) = 11; no cross → Flat
        // bar 2: 11.2 > 11 → stop = 10.2; 10.5 < 11 && 11.2 > 11 → Long
        //        (against stop[2] = 10.2 this would not be a cross)
        // bar 3: 11.2 > 10.2 but 10.0 < 10.2 → else → 11.0; 11.2 > 10.2 && 10 < 10.2 → Short
        // bar 4: 10 < 11 && 10.6 < 11 → min(11, 11.6) = 11; Short carried
        // bar 5: 12 > 11 → 11.0; 10.6 < 11 && 12 > 11 → Long
        let closes = [10.0, 10.5, 11.2, 10.0, 10.6, 12.0];
        let trace = trail_stop(&closes, &[1.0; 6]);

        let expected_stop = [11.0, 11.0, 10.2, 11.0, 11.0, 11.0];
        for (i, (&got, &want)) in trace.stop.iter().zip(&expected_stop).enumerate() {
            assert!((got - want).abs() < 1e-9, "stop mismatch at bar {i}: {got} vs {want}");
        }
        assert_eq!(trace.position, vec![Flat, Flat, Long, Short, Short, Long]);
    }

    #[test]
    fn position_uses_previous_bar_stop() {
        // stop[0] = 11; 10.9 never crosses it.
        let trace = trail_stop(&[10.0, 10.9], &[1.0, 0.1]);
        assert_eq!(trace.position[1], Flat);
        // 11.5 crosses stop[0] = 11 even though stop[1] = 10.5 sits below both closes.
        let crossed = trail_stop(&[10.0, 11.5], &[1.0, 1.0]);
        assert_eq!(crossed.position[1], Long);
        assert_approx(crossed.stop[1], 10.5, 1e-12);
    }

    #[test]
    fn stop_ratchets_up_while_long() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let candles = make_candles(&closes);
        let trace = UtBot::default().trace(&candles);
        // Bar 2 crosses the seed stop and flips it below price.
        assert_eq!(trace.position[2], Long);
        for i in 2..30 {
            assert!(trace.stop[i] < closes[i]);
            if i > 2 {
                assert!(trace.stop[i] >= trace.stop[i - 1], "stop loosened at bar {i}");
            }
        }
        assert_eq!(*trace.position.last().unwrap(), Long);
    }

    #[test]
    fn drop_through_stop_goes_short() {
        let mut data: Vec<(f64, f64, f64, f64)> = (0..15)
            .map(|i| {
                let c = 100.0 + i as f64 * 2.0;
                (c - 1.0, c + 0.5, c - 1.5, c)
            })
            .collect();
        data.push((128.0, 128.5, 100.0, 101.0));
        let outcome = UtBot::default().evaluate(&make_ohlc(&data));
        let record = outcome.record().unwrap();
        assert!(record.bearish());
        assert!(record.value() > 101.0);
    }

    #[test]
    fn ut_bot_insufficient_data() {
        let outcome = UtBot::default().evaluate(&make_candles(&[1.0; 10]));
        assert_eq!(
            outcome,
            Outcome::InsufficientData {
                required: 11,
                available: 10
            }
        );
    }

    #[test]
    fn empty_trace() {
        let trace = trail_stop(&[], &[]);
        assert!(trace.last().is_none());
    }
}
