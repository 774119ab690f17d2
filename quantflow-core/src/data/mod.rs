//! Candle sources: Binance klines, file import, synthetic walks.

pub mod binance;
pub mod circuit_breaker;
pub mod import;
pub mod provider;
pub mod synthetic;

pub use binance::{parse_klines, BinanceProvider};
pub use circuit_breaker::CircuitBreaker;
pub use import::{load_series, save_json};
pub use provider::{CandleProvider, DataError, DataSource, FetchResult};
pub use synthetic::{interval_seconds, random_walk, SyntheticProvider};
