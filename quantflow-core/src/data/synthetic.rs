//! Synthetic candles for demos and tests.
//!
//! A random walk from 100.0 with per-bar returns in ±3% and wicks up to 1%
//! beyond the body. These are clearly fake and tagged as synthetic.

use super::provider::{CandleProvider, DataError, DataSource, FetchResult};
use crate::domain::Candle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const START_PRICE: f64 = 100.0;

/// Bar start used when the caller gives none: 2024-01-01T00:00:00Z.
pub const DEFAULT_START_TIME: i64 = 1_704_067_200;

/// Generate `count` candles spaced `interval_secs` apart.
///
/// The same seed always yields the same series.
pub fn random_walk(count: usize, seed: u64, start_time: i64, interval_secs: i64) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = START_PRICE;

    (0..count)
        .map(|i| {
            let bar_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + bar_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            price = close;
            Candle::new(start_time + i as i64 * interval_secs, open, high, low, close)
        })
        .collect()
}

/// Seconds per bar for a Binance-style interval string (`1m`, `4h`, `1d`, `1w`).
pub fn interval_seconds(interval: &str) -> Option<i64> {
    let split = interval.len().checked_sub(1)?;
    let (count, unit) = interval.split_at(split);
    let count: i64 = count.parse().ok().filter(|&n| n > 0)?;
    let unit_secs = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        "w" => 604_800,
        _ => return None,
    };
    Some(count * unit_secs)
}

/// Offline provider backed by `random_walk`.
///
/// The walk is seeded from the provider seed mixed with the symbol, so two
/// symbols never share a path but each is reproducible.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    start_time: i64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_time: DEFAULT_START_TIME,
        }
    }

    fn symbol_seed(&self, symbol: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }
}

impl CandleProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, interval: &str, limit: usize) -> Result<FetchResult, DataError> {
        let step = interval_seconds(interval)
            .ok_or_else(|| DataError::UnsupportedFormat(format!("interval {interval}")))?;
        let symbol = symbol.to_uppercase();
        let candles = random_walk(limit, self.symbol_seed(&symbol), self.start_time, step);
        tracing::debug!(%symbol, interval, count = candles.len(), "generated synthetic candles");
        Ok(FetchResult {
            symbol,
            interval: interval.to_string(),
            candles,
            source: DataSource::Synthetic,
        })
    }
}
