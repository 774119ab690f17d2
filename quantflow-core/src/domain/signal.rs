//! Signal records: the reduced, last-bar view of an indicator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Directional reading of an indicator at the final bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl Bias {
    /// Positive → bullish, negative → bearish, zero (or NaN) → neutral.
    pub fn from_sign(x: f64) -> Self {
        if x > 0.0 {
            Bias::Bullish
        } else if x < 0.0 {
            Bias::Bearish
        } else {
            Bias::Neutral
        }
    }

    /// Compare `a` against `b`: above → bullish, below → bearish.
    pub fn from_cross(a: f64, b: f64) -> Self {
        if a > b {
            Bias::Bullish
        } else if a < b {
            Bias::Bearish
        } else {
            Bias::Neutral
        }
    }

    /// Numeric encoding: 1 / -1 / 0.
    pub fn as_f64(self) -> f64 {
        match self {
            Bias::Bullish => 1.0,
            Bias::Bearish => -1.0,
            Bias::Neutral => 0.0,
        }
    }
}

/// Indicators known to the engine. Used as the key of a signal report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Aroon,
    Macd,
    Rsi,
    Smi,
    UtBot,
    Smc,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 6] = [
        IndicatorKind::Aroon,
        IndicatorKind::Macd,
        IndicatorKind::Rsi,
        IndicatorKind::Smi,
        IndicatorKind::UtBot,
        IndicatorKind::Smc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IndicatorKind::Aroon => "aroon",
            IndicatorKind::Macd => "macd",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Smi => "smi",
            IndicatorKind::UtBot => "ut_bot",
            IndicatorKind::Smc => "smc",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final-bar value of an indicator plus its directional classification.
///
/// Built from a [`Bias`], so `bullish` and `bearish` are never both true.
/// Secondary values (both oscillator lines, swing levels, ...) live in `extras`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    value: f64,
    bullish: bool,
    bearish: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extras: BTreeMap<String, f64>,
}

impl SignalRecord {
    pub fn new(value: f64, bias: Bias) -> Self {
        Self {
            value,
            bullish: bias == Bias::Bullish,
            bearish: bias == Bias::Bearish,
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: f64) -> Self {
        self.extras.insert(key.to_string(), value);
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn bullish(&self) -> bool {
        self.bullish
    }

    pub fn bearish(&self) -> bool {
        self.bearish
    }

    pub fn bias(&self) -> Bias {
        match (self.bullish, self.bearish) {
            (true, _) => Bias::Bullish,
            (_, true) => Bias::Bearish,
            _ => Bias::Neutral,
        }
    }

    pub fn extra(&self, key: &str) -> Option<f64> {
        self.extras.get(key).copied()
    }
}

/// Result of reducing one indicator over a series.
///
/// `InsufficientData` and `AmbiguousBreak` are undefined results; they are
/// never reported as a neutral signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Signal(SignalRecord),
    InsufficientData { required: usize, available: usize },
    AmbiguousBreak { bar: usize },
}

impl Outcome {
    pub fn record(&self) -> Option<&SignalRecord> {
        match self {
            Outcome::Signal(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Outcome::Signal(_))
    }

    /// Bias of a defined outcome, `None` when undefined.
    pub fn bias(&self) -> Option<Bias> {
        self.record().map(SignalRecord::bias)
    }
}
