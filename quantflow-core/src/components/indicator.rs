//! Indicator traits and the container for full value sequences.
//!
//! Indicators are pure functions: candle history in, numeric series out.
//! A signal indicator additionally reduces its series to a final-bar
//! [`Outcome`].

use crate::domain::{Candle, IndicatorKind, Outcome};
use std::collections::HashMap;

/// Trait for indicators.
///
/// Indicators take a full candle series and produce a numeric output series of
/// the same length. The first `lookback()` values are `f64::NAN` (warmup).
///
/// # Look-ahead contamination guard
/// No indicator value at bar t may depend on price data from bar t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name including parameters (e.g., "rsi_14", "ut_bot_1_10").
    fn name(&self) -> &str;

    /// Number of bars needed before the indicator produces valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire candle series.
    ///
    /// Returns a `Vec<f64>` of the same length as `candles`.
    fn compute(&self, candles: &[Candle]) -> Vec<f64>;
}

/// An indicator that reduces to a directional signal at the last bar.
pub trait SignalIndicator: Indicator {
    /// Key under which the outcome is reported.
    fn kind(&self) -> IndicatorKind;

    /// Reduce the series to the final bar's signal.
    ///
    /// Must return `Outcome::InsufficientData` rather than a neutral record
    /// when the series is too short for a defined final value.
    fn evaluate(&self, candles: &[Candle]) -> Outcome;

    /// Minimum series length for a defined final value.
    fn min_bars(&self) -> usize {
        self.lookback() + 1
    }

    /// `Some(InsufficientData)` when `candles` is shorter than `min_bars()`.
    fn check_warmup(&self, candles: &[Candle]) -> Option<Outcome> {
        let required = self.min_bars();
        (candles.len() < required).then_some(Outcome::InsufficientData {
            required,
            available: candles.len(),
        })
    }
}

/// Container for full indicator value sequences, keyed by indicator name.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Get the indicator value at a specific bar index.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Get the full series for a named indicator.
    pub fn get_series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(|v| v.as_slice())
    }

    /// Names of all stored series, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of indicator series stored.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Replace the first `lookback` values with NaN.
pub(crate) fn mask_warmup(mut values: Vec<f64>, lookback: usize) -> Vec<f64> {
    let n = values.len().min(lookback);
    values[..n].fill(f64::NAN);
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_values_insert_and_get() {
        let mut iv = IndicatorValues::new();
        iv.insert(
            "rsi_14",
            vec![f64::NAN; 14]
                .into_iter()
                .chain(vec![55.0, 61.0])
                .collect(),
        );
        assert!(iv.get("rsi_14", 0).unwrap().is_nan());
        assert_eq!(iv.get("rsi_14", 14), Some(55.0));
        assert_eq!(iv.get("rsi_14", 15), Some(61.0));
        assert_eq!(iv.get("rsi_14", 16), None); // out of bounds
    }

    #[test]
    fn indicator_values_missing_name() {
        let iv = IndicatorValues::new();
        assert_eq!(iv.get("nonexistent", 0), None);
        assert!(iv.get_series("nonexistent").is_none());
    }

    #[test]
    fn indicator_values_names_sorted() {
        let mut iv = IndicatorValues::new();
        assert!(iv.is_empty());
        iv.insert("smc_50", vec![0.0]);
        iv.insert("aroon_14", vec![0.0]);
        assert_eq!(iv.len(), 2);
        assert_eq!(iv.names(), vec!["aroon_14", "smc_50"]);
    }

    #[test]
    fn mask_warmup_clamps_to_length() {
        let masked = mask_warmup(vec![1.0, 2.0, 3.0], 2);
        assert!(masked[0].is_nan() && masked[1].is_nan());
        assert_eq!(masked[2], 3.0);

        let all = mask_warmup(vec![1.0], 5);
        assert!(all[0].is_nan());
    }
}
