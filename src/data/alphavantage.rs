//! Alpha Vantage API integration for intraday quotes.

use std::collections::BTreeMap;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domain::SeriesPoint;
use crate::error::AppError;
use crate::io::ingest::parse_timestamp;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Payload keys the provider uses instead of data when a call is refused.
const ERROR_KEYS: &[&str] = &["Error Message", "Note", "Information"];

pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("ALPHAVANTAGE_API_KEY")
            .map_err(|_| AppError::input("Missing ALPHAVANTAGE_API_KEY in environment (.env)."))?;
        Ok(Self {
            client: Client::new(),
            api_key,
        })
    }

    /// Fetch the full intraday close history for `symbol`, oldest first.
    pub fn fetch_intraday(&self, symbol: &str, interval: &str) -> Result<Vec<SeriesPoint>, AppError> {
        let resp = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "TIME_SERIES_INTRADAY"),
                ("symbol", symbol),
                ("interval", interval),
                ("outputsize", "full"),
                ("apikey", &self.api_key),
            ])
            .send()
            .map_err(|e| AppError::upstream(format!("Alpha Vantage request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::upstream(format!(
                "Alpha Vantage request failed with status {}.",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .map_err(|e| AppError::upstream(format!("Failed to parse Alpha Vantage response: {e}")))?;

        let quotes = parse_intraday(&body, interval)?;
        info!(symbol, interval, quotes = quotes.len(), "fetched intraday quotes");
        Ok(quotes)
    }
}

#[derive(Debug, Deserialize)]
struct IntradayBar {
    #[serde(rename = "4. close")]
    close: String,
}

/// Extract `(timestamp, close)` pairs from a `TIME_SERIES_INTRADAY` payload.
pub fn parse_intraday(body: &Value, interval: &str) -> Result<Vec<SeriesPoint>, AppError> {
    for key in ERROR_KEYS {
        if let Some(message) = body.get(*key).and_then(Value::as_str) {
            return Err(AppError::upstream(format!("Alpha Vantage: {message}")));
        }
    }

    let series_key = format!("Time Series ({interval})");
    let raw = body
        .get(&series_key)
        .ok_or_else(|| AppError::upstream(format!("Alpha Vantage response has no '{series_key}' section.")))?;

    let bars: BTreeMap<String, IntradayBar> = serde_json::from_value(raw.clone())
        .map_err(|e| AppError::upstream(format!("Unexpected Alpha Vantage bar layout: {e}")))?;

    let mut out = Vec::with_capacity(bars.len());
    for (stamp, bar) in bars {
        let ds = parse_timestamp(&stamp)?;
        let y = bar
            .close
            .trim()
            .parse::<f64>()
            .map_err(|e| AppError::upstream(format!("Invalid close '{}' at {stamp}: {e}", bar.close)))?;
        if y.is_finite() {
            out.push(SeriesPoint { ds, y });
        }
    }
    out.sort_by_key(|p| p.ds);
    out.dedup_by_key(|p| p.ds);

    Ok(out)
}
