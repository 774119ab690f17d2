//! Signal engine: runs every configured indicator over one candle series.
//!
//! The engine is a pure function of (config, series): indicators are
//! independent of each other, each reduces the same immutable candles to an
//! `Outcome`, and results are collected into a `BTreeMap` keyed by
//! indicator kind so that serialized reports are byte-stable.
//!
//! `evaluate_parallel` fans the indicators out over rayon's global pool. It
//! only changes scheduling; its report is identical to `evaluate`.

pub mod precompute;

pub use precompute::{compute_warmup, precompute_indicators};

use crate::components::indicator::{IndicatorValues, SignalIndicator};
use crate::config::{ConfigError, EngineConfig};
use crate::domain::{IndicatorKind, Outcome, Series};
use crate::fingerprint::Fingerprint;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything one evaluation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    /// Number of candles evaluated.
    pub bars: usize,
    /// Open time of the final candle; the report's notion of "now".
    pub last_time: i64,
    pub fingerprint: Fingerprint,
    pub signals: BTreeMap<IndicatorKind, Outcome>,
}

impl SignalReport {
    pub fn get(&self, kind: IndicatorKind) -> Option<&Outcome> {
        self.signals.get(&kind)
    }

    /// Number of indicators with a defined result.
    pub fn defined_count(&self) -> usize {
        self.signals.values().filter(|o| o.is_defined()).count()
    }
}

pub struct SignalEngine {
    config: EngineConfig,
    canonical_config: Vec<u8>,
    indicators: Vec<Box<dyn SignalIndicator>>,
}

impl SignalEngine {
    /// Validate the config and build its indicators.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let canonical_config = serde_json::to_vec(&config)?;
        let indicators = config.build_indicators();
        Ok(Self {
            config,
            canonical_config,
            indicators,
        })
    }

    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn indicators(&self) -> &[Box<dyn SignalIndicator>] {
        &self.indicators
    }

    /// Shortest series on which every indicator is defined.
    pub fn warmup(&self) -> usize {
        compute_warmup(&self.indicators)
    }

    /// Reduce every indicator to its final-bar outcome, one after another.
    pub fn evaluate(&self, series: &Series) -> SignalReport {
        let signals = self
            .indicators
            .iter()
            .map(|indicator| (indicator.kind(), Self::run_one(indicator.as_ref(), series)))
            .collect();
        self.report(series, signals)
    }

    /// Same result as [`evaluate`](Self::evaluate), indicators run on rayon's pool.
    pub fn evaluate_parallel(&self, series: &Series) -> SignalReport {
        let signals = self
            .indicators
            .par_iter()
            .map(|indicator| (indicator.kind(), Self::run_one(indicator.as_ref(), series)))
            .collect();
        self.report(series, signals)
    }

    /// Full value sequences of every indicator, keyed by indicator name.
    pub fn series(&self, series: &Series) -> IndicatorValues {
        precompute_indicators(series.candles(), &self.indicators)
    }

    fn run_one(indicator: &dyn SignalIndicator, series: &Series) -> Outcome {
        let outcome = indicator.evaluate(series.candles());
        match &outcome {
            Outcome::Signal(record) => tracing::debug!(
                indicator = indicator.name(),
                value = record.value(),
                bias = ?record.bias(),
                "indicator evaluated"
            ),
            undefined => tracing::debug!(
                indicator = indicator.name(),
                outcome = ?undefined,
                "indicator undefined"
            ),
        }
        outcome
    }

    fn report(&self, series: &Series, signals: BTreeMap<IndicatorKind, Outcome>) -> SignalReport {
        SignalReport {
            bars: series.len(),
            last_time: series.last().time,
            fingerprint: Fingerprint::from_canonical(&self.canonical_config, series.candles()),
            signals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;
    use crate::indicators::make_candles;

    fn series(closes: &[f64]) -> Series {
        Series::new(make_candles(closes)).unwrap()
    }

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.21).sin() * 8.0 + i as f64 * 0.05)
            .collect()
    }

    #[test]
    fn report_has_every_indicator() {
        let engine = SignalEngine::with_defaults().unwrap();
        let report = engine.evaluate(&series(&wave(200)));
        assert_eq!(report.bars, 200);
        let kinds: Vec<IndicatorKind> = report.signals.keys().copied().collect();
        assert_eq!(kinds, IndicatorKind::ALL.to_vec());
        assert_eq!(report.defined_count(), 6);
    }

    #[test]
    fn short_series_reports_undefined_not_neutral() {
        let engine = SignalEngine::with_defaults().unwrap();
        let report = engine.evaluate(&series(&wave(20)));
        assert_eq!(
            report.get(IndicatorKind::Macd),
            Some(&Outcome::InsufficientData {
                required: 34,
                available: 20
            })
        );
        assert!(report.get(IndicatorKind::Rsi).unwrap().is_defined());
        // SMC is defined for any non-empty series.
        assert!(report.get(IndicatorKind::Smc).unwrap().is_defined());
    }

    #[test]
    fn parallel_matches_sequential() {
        let engine = SignalEngine::with_defaults().unwrap();
        let s = series(&wave(300));
        assert_eq!(engine.evaluate(&s), engine.evaluate_parallel(&s));
    }

    #[test]
    fn last_time_comes_from_final_candle() {
        let engine = SignalEngine::with_defaults().unwrap();
        let candles = vec![
            Candle::new(1_000, 1.0, 2.0, 0.5, 1.5),
            Candle::new(2_000, 1.5, 2.5, 1.0, 2.0),
        ];
        let report = engine.evaluate(&Series::new(candles).unwrap());
        assert_eq!(report.last_time, 2_000);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.smi.short = 0;
        assert!(SignalEngine::new(config).is_err());
    }

    #[test]
    fn series_exposes_full_sequences() {
        let engine = SignalEngine::with_defaults().unwrap();
        let iv = engine.series(&series(&wave(120)));
        assert_eq!(iv.len(), 6);
        for name in iv.names() {
            assert_eq!(iv.get_series(name).unwrap().len(), 120);
        }
        assert_eq!(engine.warmup(), 34);
    }
}
