//! Twelve Data time-series client
//!
//! The vendor returns bars newest-first with every numeric field encoded as a
//! JSON string; both quirks are normalized away here.

use crate::error::{MarketDataError, Result};
use crate::interval::Interval;
use crate::series::{Bar, PriceSeries};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Maximum bars requested per call
const OUTPUT_SIZE: &str = "5000";

/// Client for the Twelve Data `time_series` endpoint
#[derive(Debug, Clone)]
pub struct TwelveDataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TwelveDataClient {
    /// Create a client against the given base URL (configurable so tests can
    /// point it at a stub)
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Fetch the historical series for a symbol at the given interval
    pub async fn time_series(&self, symbol: &str, interval: Interval) -> Result<PriceSeries> {
        let url = format!("{}/time_series", self.base_url);
        debug!(symbol, interval = %interval, "fetching Twelve Data time series");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("interval", interval.as_str()),
                ("apikey", self.api_key.as_str()),
                ("outputsize", OUTPUT_SIZE),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MarketDataError::VendorError(format!(
                "time_series returned status {}: {}",
                status.as_u16(),
                truncate(&body, 200)
            )));
        }

        parse_time_series(&body)
    }
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    values: Option<Vec<RawBar>>,
    code: Option<i64>,
    message: Option<String>,
    status: Option<String>,
}

/// Bar exactly as the vendor encodes it: numbers as strings
#[derive(Debug, Deserialize)]
struct RawBar {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: Option<String>,
}

/// Parse a Twelve Data `time_series` payload into a [`PriceSeries`]
pub fn parse_time_series(payload: &str) -> Result<PriceSeries> {
    let response: TimeSeriesResponse = serde_json::from_str(payload)
        .map_err(|e| MarketDataError::MalformedPayload(format!("time_series: {}", e)))?;

    let values = match response.values {
        Some(values) => values,
        None => {
            // Error payloads carry code/message instead of values; the vendor
            // answers code 400 for symbols it doesn't know
            let message = response
                .message
                .or(response.status)
                .unwrap_or_else(|| "response has no 'values' field".to_string());
            return Err(if response.code == Some(400) {
                MarketDataError::UnknownSymbol(message)
            } else {
                MarketDataError::VendorError(message)
            });
        }
    };

    let mut bars = Vec::with_capacity(values.len());
    for raw in &values {
        bars.push(Bar {
            timestamp: parse_vendor_datetime(&raw.datetime)?,
            open: parse_vendor_number("open", &raw.open)?,
            high: parse_vendor_number("high", &raw.high)?,
            low: parse_vendor_number("low", &raw.low)?,
            close: parse_vendor_number("close", &raw.close)?,
            volume: match &raw.volume {
                Some(v) => parse_vendor_number("volume", v)?,
                None => 0.0,
            },
        });
    }

    PriceSeries::from_bars(bars)
}

/// Intraday bars carry a full timestamp, daily bars a date only
fn parse_vendor_datetime(value: &str) -> Result<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(ts);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }

    Err(MarketDataError::MalformedPayload(format!(
        "bad datetime '{}'",
        value
    )))
}

fn parse_vendor_number(field: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|e| MarketDataError::MalformedPayload(format!("bad {} '{}': {}", field, value, e)))
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
