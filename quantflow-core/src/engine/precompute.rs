//! Full-series indicator computation.
//!
//! Every indicator runs once over the whole candle series; results are
//! stored in an `IndicatorValues` container keyed by indicator name.

use crate::components::indicator::{IndicatorValues, SignalIndicator};
use crate::domain::Candle;

/// Compute every indicator's value sequence over one series.
pub fn precompute_indicators(
    candles: &[Candle],
    indicators: &[Box<dyn SignalIndicator>],
) -> IndicatorValues {
    let mut iv = IndicatorValues::new();
    for indicator in indicators {
        let series = indicator.compute(candles);
        debug_assert_eq!(
            series.len(),
            candles.len(),
            "indicator '{}' produced {} values for {} candles",
            indicator.name(),
            series.len(),
            candles.len(),
        );
        iv.insert(indicator.name(), series);
    }
    iv
}

/// Shortest series for which every indicator has a defined final value.
pub fn compute_warmup(indicators: &[Box<dyn SignalIndicator>]) -> usize {
    indicators.iter().map(|i| i.min_bars()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_candles, Aroon, Macd, Rsi, Smc};

    #[test]
    fn precompute_stores_one_series_per_indicator() {
        let candles = make_candles(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let indicators: Vec<Box<dyn SignalIndicator>> =
            vec![Box::new(Rsi::new(3)), Box::new(Aroon::new(2))];
        let iv = precompute_indicators(&candles, &indicators);

        assert_eq!(iv.len(), 2);
        assert_eq!(iv.names(), vec!["aroon_2", "rsi_3"]);
        assert!(iv.get("rsi_3", 2).unwrap().is_nan());
        assert!((iv.get("rsi_3", 3).unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(iv.get_series("aroon_2").unwrap().len(), 5);
    }

    #[test]
    fn warmup_is_largest_min_bars() {
        let indicators: Vec<Box<dyn SignalIndicator>> = vec![
            Box::new(Rsi::new(14)),
            Box::new(Macd::default()),
            Box::new(Smc::default()),
        ];
        assert_eq!(compute_warmup(&indicators), 34);
        assert_eq!(compute_warmup(&[]), 0);
    }
}
