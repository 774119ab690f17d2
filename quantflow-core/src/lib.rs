//! QuantFlow Core: candle series in, directional signals out.
//!
//! This crate contains the signal engine:
//! - Domain types (candles, validated series, signal records, outcomes)
//! - Smoothing primitives (SMA, EMA, RMA) and rolling extremum helpers
//! - Oscillators (Aroon, MACD, RSI, SMI Ergodic) and stateful trackers
//!   (UT Bot trailing stop, SMC swing structure)
//! - Engine that reduces every configured indicator to a final-bar outcome
//! - Confluence analysis combining several outcomes into one trade call
//! - Candle sources: Binance klines, CSV/JSON import, synthetic walks

pub mod components;
pub mod config;
pub mod confluence;
pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod indicators;

pub use config::{ConfigError, EngineConfig};
pub use domain::{Bias, Candle, IndicatorKind, Outcome, Series, SeriesError, SignalRecord};
pub use engine::{SignalEngine, SignalReport};
