//! Binance kline provider.
//!
//! Fetches recent candles from the public `GET /api/v3/klines` endpoint (no
//! API key). Handles rate limiting and IP bans through the circuit breaker,
//! retries transient failures with exponential backoff, and converts the
//! array-of-arrays payload into candles.
//!
//! Kline array indices: [0] open time (ms), [1] open, [2] high, [3] low,
//! [4] close, then volume and trade statistics, which are ignored. Prices
//! arrive as decimal strings.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{CandleProvider, DataError, DataSource, FetchResult};
use crate::domain::Candle;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Candles requested when the caller does not say otherwise.
pub const DEFAULT_LIMIT: usize = 500;

/// Binance caps a single klines request at 1000 candles.
pub const MAX_LIMIT: usize = 1000;

/// Error body Binance returns alongside 4xx statuses.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

/// "Invalid symbol."
const INVALID_SYMBOL: i64 = -1121;

pub struct BinanceProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl BinanceProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        Self::with_base_url(DEFAULT_BASE_URL, circuit_breaker)
    }

    /// Point the provider at another host (testnet, mirror, local stub).
    pub fn with_base_url(
        base_url: impl Into<String>,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("quantflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            circuit_breaker,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    fn klines_url(&self) -> String {
        format!("{}/api/v3/klines", self.base_url)
    }

    fn fetch_with_retry(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, DataError> {
        let url = self.klines_url();
        let limit = limit.clamp(1, MAX_LIMIT).to_string();
        let query = [("symbol", symbol), ("interval", interval), ("limit", limit.as_str())];
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::debug!(attempt, ?delay, symbol, "retrying klines request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(&url).query(&query).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    self.circuit_breaker.record_failure();
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::IM_A_TEAPOT {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if status.is_client_error() {
                let api_error = resp.json::<ApiError>().ok();
                return Err(match api_error {
                    Some(err) if err.code == INVALID_SYMBOL => DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    },
                    Some(err) => {
                        tracing::warn!(code = err.code, msg = %err.msg, "binance rejected request");
                        DataError::Http {
                            provider: "binance",
                            status: status.as_u16(),
                        }
                    }
                    None => DataError::Http {
                        provider: "binance",
                        status: status.as_u16(),
                    },
                });
            }

            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Http {
                    provider: "binance",
                    status: status.as_u16(),
                });
                continue;
            }

            let body: Value = resp.json().map_err(|e| {
                DataError::ResponseFormat(format!("klines body for {symbol} is not JSON: {e}"))
            })?;
            let candles = parse_klines(&body)?;
            self.circuit_breaker.record_success();
            return Ok(candles);
        }

        Err(last_error.unwrap_or(DataError::CircuitBreakerTripped))
    }
}

impl CandleProvider for BinanceProvider {
    fn name(&self) -> &str {
        "binance"
    }

    fn fetch(&self, symbol: &str, interval: &str, limit: usize) -> Result<FetchResult, DataError> {
        let symbol = symbol.to_uppercase();
        tracing::info!(%symbol, interval, limit, "fetching klines");

        let candles = self.fetch_with_retry(&symbol, interval, limit)?;
        if candles.is_empty() {
            return Err(DataError::SymbolNotFound { symbol });
        }

        tracing::info!(%symbol, interval, count = candles.len(), "klines fetched");
        Ok(FetchResult {
            symbol,
            interval: interval.to_string(),
            candles,
            source: DataSource::Binance,
        })
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

/// Convert a klines payload into candles sorted oldest first.
///
/// `time` is the open time truncated to whole seconds.
pub fn parse_klines(body: &Value) -> Result<Vec<Candle>, DataError> {
    let rows = body
        .as_array()
        .ok_or_else(|| DataError::ResponseFormat("klines response is not an array".into()))?;

    let mut candles = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let fields = row
            .as_array()
            .filter(|f| f.len() >= 5)
            .ok_or_else(|| DataError::ResponseFormat(format!("kline {i} is not an OHLC array")))?;

        let open_time_ms = fields[0]
            .as_i64()
            .ok_or_else(|| DataError::ResponseFormat(format!("kline {i}: open time")))?;

        candles.push(Candle::new(
            open_time_ms / 1000,
            price(&fields[1], i, "open")?,
            price(&fields[2], i, "high")?,
            price(&fields[3], i, "low")?,
            price(&fields[4], i, "close")?,
        ));
    }

    candles.sort_by_key(|c| c.time);
    Ok(candles)
}

/// Binance sends prices as strings; accept bare numbers too.
fn price(value: &Value, index: usize, field: &str) -> Result<f64, DataError> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        other => other.as_f64(),
    };
    parsed.ok_or_else(|| DataError::ResponseFormat(format!("kline {index}: {field} = {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_kline_rows() {
        let body = json!([
            [1700000000000i64, "37000.10", "37100.00", "36950.50", "37050.25", "12.5",
             1700000059999i64, "463000.0", 120, "6.1", "226000.0", "0"],
            [1700000060000i64, "37050.25", "37080.00", "37010.00", "37020.00", "8.0",
             1700000119999i64, "296000.0", 80, "3.9", "144000.0", "0"]
        ]);
        let candles = parse_klines(&body).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].time, 1_700_000_000);
        assert_eq!(candles[0].open, 37000.10);
        assert_eq!(candles[0].high, 37100.00);
        assert_eq!(candles[0].low, 36950.50);
        assert_eq!(candles[0].close, 37050.25);
        assert_eq!(candles[1].time, 1_700_000_060);
    }

    #[test]
    fn output_is_sorted_oldest_first() {
        let body = json!([
            [120_000, "2", "3", "1", "2"],
            [60_000, "1", "2", "0.5", "1.5"]
        ]);
        let candles = parse_klines(&body).unwrap();
        assert_eq!(candles[0].time, 60);
        assert_eq!(candles[1].time, 120);
    }

    #[test]
    fn milliseconds_truncate_to_seconds() {
        let body = json!([[1_700_000_000_999i64, "1", "1", "1", "1"]]);
        assert_eq!(parse_klines(&body).unwrap()[0].time, 1_700_000_000);
    }

    #[test]
    fn rejects_non_array_payload() {
        let body = json!({"code": -1121, "msg": "Invalid symbol."});
        assert!(matches!(
            parse_klines(&body),
            Err(DataError::ResponseFormat(_))
        ));
    }

    #[test]
    fn rejects_unparseable_price() {
        let body = json!([[0, "abc", "1", "1", "1"]]);
        let err = parse_klines(&body).unwrap_err();
        assert!(err.to_string().contains("open"));
    }

    #[test]
    fn rejects_short_rows() {
        let body = json!([[0, "1", "1"]]);
        assert!(parse_klines(&body).is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let provider = BinanceProvider::with_base_url(
            "http://127.0.0.1:9/",
            Arc::new(CircuitBreaker::default_exchange()),
        )
        .unwrap();
        assert_eq!(provider.klines_url(), "http://127.0.0.1:9/api/v3/klines");
    }
}
