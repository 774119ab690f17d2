//! Candle provider trait and structured error types.
//!
//! The CandleProvider trait abstracts over market-data sources (Binance,
//! file import, synthetic) so the engine never depends on where candles
//! came from and tests can substitute a fixed series.

use crate::domain::{Candle, SeriesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} from {provider}")]
    Http { provider: &'static str, status: u16 },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("hard stop: provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),
}

/// Where the candles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Binance,
    CsvImport,
    JsonImport,
    Synthetic,
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub interval: String,
    pub candles: Vec<Candle>,
    pub source: DataSource,
}

/// Trait for candle providers.
///
/// Implementations return candles ordered oldest first; validation into a
/// `Series` happens at the caller's boundary.
pub trait CandleProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch up to `limit` of the most recent candles for `symbol` at `interval`.
    fn fetch(&self, symbol: &str, interval: &str, limit: usize) -> Result<FetchResult, DataError>;

    /// Whether the provider currently accepts requests.
    fn is_available(&self) -> bool {
        true
    }
}
