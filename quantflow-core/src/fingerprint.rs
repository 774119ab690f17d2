//! Report fingerprinting: deterministic identification of an evaluation.
//!
//! A fingerprint is the BLAKE3 hash of the engine configuration (canonical
//! JSON, fixed field order) followed by every candle field as little-endian
//! bytes. Identical config and series give identical fingerprints on every
//! platform.

use crate::config::EngineConfig;
use crate::domain::Candle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex-encoded BLAKE3 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn compute(config: &EngineConfig, candles: &[Candle]) -> Result<Self, serde_json::Error> {
        let canonical = serde_json::to_vec(config)?;
        Ok(Self::from_canonical(&canonical, candles))
    }

    /// Fingerprint from an already-serialized config.
    pub fn from_canonical(canonical: &[u8], candles: &[Candle]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(canonical.len() as u64).to_le_bytes());
        hasher.update(canonical);
        hasher.update(&(candles.len() as u64).to_le_bytes());
        for c in candles {
            hasher.update(&c.time.to_le_bytes());
            for field in [c.open, c.high, c.low, c.close] {
                hasher.update(&field.to_le_bytes());
            }
        }

        Self(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles() -> Vec<Candle> {
        vec![
            Candle::new(60, 1.0, 2.0, 0.5, 1.5),
            Candle::new(120, 1.5, 2.5, 1.0, 2.0),
        ]
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let config = EngineConfig::default();
        let a = Fingerprint::compute(&config, &candles()).unwrap();
        let b = Fingerprint::compute(&config, &candles()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
    }

    #[test]
    fn config_change_changes_fingerprint() {
        let mut tweaked = EngineConfig::default();
        tweaked.rsi.length = 7;
        let a = Fingerprint::compute(&EngineConfig::default(), &candles()).unwrap();
        let b = Fingerprint::compute(&tweaked, &candles()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn price_change_changes_fingerprint() {
        let mut moved = candles();
        moved[1].close = 2.0000001;
        let config = EngineConfig::default();
        assert_ne!(
            Fingerprint::compute(&config, &candles()).unwrap(),
            Fingerprint::compute(&config, &moved).unwrap()
        );
    }
}
