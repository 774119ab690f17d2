//! Engine configuration: one section per indicator, loadable from TOML.
//!
//! Every section falls back to its documented defaults, so an empty file (or
//! a file naming only the parameters to override) is a valid configuration.

use crate::components::SignalIndicator;
use crate::domain::IndicatorKind;
use crate::indicators::{Aroon, Macd, Rsi, Smc, SmiErgodic, UtBot};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("encode config: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid {indicator} parameter `{name}` = {value}")]
    InvalidParameter {
        indicator: IndicatorKind,
        name: &'static str,
        value: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AroonConfig {
    pub length: usize,
}

impl Default for AroonConfig {
    fn default() -> Self {
        Self { length: 14 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    pub length: usize,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self { length: 14 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmiConfig {
    pub long: usize,
    pub short: usize,
    pub signal: usize,
}

impl Default for SmiConfig {
    fn default() -> Self {
        Self {
            long: 20,
            short: 5,
            signal: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtBotConfig {
    pub key_value: f64,
    pub atr_period: usize,
}

impl Default for UtBotConfig {
    fn default() -> Self {
        Self {
            key_value: 1.0,
            atr_period: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmcConfig {
    pub swing_length: usize,
}

impl Default for SmcConfig {
    fn default() -> Self {
        Self { swing_length: 50 }
    }
}

/// Parameters for every indicator the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub aroon: AroonConfig,
    pub macd: MacdConfig,
    pub rsi: RsiConfig,
    pub smi: SmiConfig,
    pub ut_bot: UtBotConfig,
    pub smc: SmcConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject parameters the indicators cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        type K = IndicatorKind;

        let periods = [
            (K::Aroon, "length", self.aroon.length),
            (K::Macd, "fast", self.macd.fast),
            (K::Macd, "slow", self.macd.slow),
            (K::Macd, "signal", self.macd.signal),
            (K::Rsi, "length", self.rsi.length),
            (K::Smi, "long", self.smi.long),
            (K::Smi, "short", self.smi.short),
            (K::Smi, "signal", self.smi.signal),
            (K::UtBot, "atr_period", self.ut_bot.atr_period),
            (K::Smc, "swing_length", self.smc.swing_length),
        ];
        for (indicator, name, value) in periods {
            if value == 0 {
                return Err(ConfigError::InvalidParameter {
                    indicator,
                    name,
                    value: 0.0,
                });
            }
        }

        let key = self.ut_bot.key_value;
        if !key.is_finite() || key <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                indicator: K::UtBot,
                name: "key_value",
                value: key,
            });
        }

        Ok(())
    }

    /// Build the configured indicators in report order.
    ///
    /// Callers must have validated the config; constructors assert on zero periods.
    pub fn build_indicators(&self) -> Vec<Box<dyn SignalIndicator>> {
        vec![
            Box::new(Aroon::new(self.aroon.length)),
            Box::new(Macd::new(self.macd.fast, self.macd.slow, self.macd.signal)),
            Box::new(Rsi::new(self.rsi.length)),
            Box::new(SmiErgodic::new(
                self.smi.long,
                self.smi.short,
                self.smi.signal,
            )),
            Box::new(UtBot::new(self.ut_bot.key_value, self.ut_bot.atr_period)),
            Box::new(Smc::new(self.smc.swing_length)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.macd.slow, 26);
        assert_eq!(config.smc.swing_length, 50);
        assert_eq!(config.ut_bot.key_value, 1.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [rsi]
            length = 7

            [macd]
            signal = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.rsi.length, 7);
        assert_eq!(config.macd.signal, 5);
        assert_eq!(config.macd.fast, 12);
        assert_eq!(config.aroon, AroonConfig::default());
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = EngineConfig::from_toml_str("[aroon]\nlength = 0\n").unwrap_err();
        match err {
            ConfigError::InvalidParameter {
                indicator, name, ..
            } => {
                assert_eq!(indicator, IndicatorKind::Aroon);
                assert_eq!(name, "length");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_positive_key_value_is_rejected() {
        let err = EngineConfig::from_toml_str("[ut_bot]\nkey_value = -2.0\n").unwrap_err();
        assert!(err.to_string().contains("key_value"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EngineConfig::from_toml_str("[rsi\nlength = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_round_trip() {
        let mut config = EngineConfig::default();
        config.ut_bot.key_value = 2.5;
        config.smc.swing_length = 10;
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn builds_one_indicator_per_kind() {
        let kinds: Vec<IndicatorKind> = EngineConfig::default()
            .build_indicators()
            .iter()
            .map(|i| i.kind())
            .collect();
        assert_eq!(kinds, IndicatorKind::ALL.to_vec());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/quantflow.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
