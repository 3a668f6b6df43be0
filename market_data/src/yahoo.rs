//! Yahoo-style daily history and quote-summary client
//!
//! The analytics endpoints need daily closes over a date range plus the
//! descriptive quote fields (profile, price statistics, analyst
//! recommendations). Missing optional fields degrade to zeroed defaults
//! instead of failing the response.

use crate::error::{MarketDataError, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Quote-summary modules requested per symbol
const QUOTE_MODULES: &str = "assetProfile,price,summaryDetail,recommendationTrend";

/// One daily closing price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// Analyst recommendation counts; zeroed when the vendor has none
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecommendationCounts {
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
}

/// Descriptive quote fields for one ticker
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummary {
    pub company_name: String,
    pub sector: String,
    pub industry: String,
    pub current_price: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub beta: f64,
    pub recommendations: RecommendationCounts,
}

/// Client for the Yahoo chart and quote-summary endpoints
#[derive(Debug, Clone)]
pub struct YahooClient {
    http: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    /// Create a client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Daily closing prices for `symbol` over `[start, end)`
    pub async fn daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>> {
        if start >= end {
            return Err(MarketDataError::DataError(format!(
                "start date {} is not before end date {}",
                start, end
            )));
        }

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        debug!(symbol, %start, %end, "fetching daily history");

        let period1 = date_to_unix(start)?.to_string();
        let period2 = date_to_unix(end)?.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(MarketDataError::VendorError(format!(
                "chart for {} returned status {}",
                symbol,
                status.as_u16()
            )));
        }

        parse_daily_closes(&body)
    }

    /// Descriptive quote fields for `symbol`
    pub async fn quote_summary(&self, symbol: &str) -> Result<QuoteSummary> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        debug!(symbol, "fetching quote summary");

        let response = self
            .http
            .get(&url)
            .query(&[("modules", QUOTE_MODULES)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(MarketDataError::VendorError(format!(
                "quoteSummary for {} returned status {}",
                symbol,
                status.as_u16()
            )));
        }

        parse_quote_summary(symbol, &body)
    }
}

// ---- chart payload ----

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Vec<Option<f64>>,
}

/// Parse a chart payload into daily closes; null closes (halted days) are
/// skipped
pub fn parse_daily_closes(payload: &str) -> Result<Vec<DailyClose>> {
    let response: ChartResponse = serde_json::from_str(payload)
        .map_err(|e| MarketDataError::MalformedPayload(format!("chart: {}", e)))?;

    if let Some(error) = response.chart.error {
        return Err(MarketDataError::VendorError(
            error
                .description
                .unwrap_or_else(|| "chart request failed".to_string()),
        ));
    }

    let result = response
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| {
            MarketDataError::MalformedPayload("chart response has no result".to_string())
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .first()
        .map(|q| q.close.clone())
        .unwrap_or_default();

    let mut daily = Vec::with_capacity(timestamps.len());
    for (ts, close) in timestamps.iter().zip(closes.iter()) {
        if let Some(close) = close {
            daily.push(DailyClose {
                date: unix_to_date(*ts)?,
                close: *close,
            });
        }
    }

    Ok(daily)
}

// ---- quote-summary payload ----

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "assetProfile", default)]
    asset_profile: Option<AssetProfile>,
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail", default)]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "recommendationTrend", default)]
    recommendation_trend: Option<RecommendationTrend>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: RawNumber,
    #[serde(rename = "marketCap", default)]
    market_cap: RawNumber,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetail {
    #[serde(rename = "fiftyTwoWeekHigh", default)]
    fifty_two_week_high: RawNumber,
    #[serde(rename = "fiftyTwoWeekLow", default)]
    fifty_two_week_low: RawNumber,
    #[serde(rename = "trailingPE", default)]
    trailing_pe: RawNumber,
    #[serde(rename = "dividendYield", default)]
    dividend_yield: RawNumber,
    #[serde(default)]
    beta: RawNumber,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationTrend {
    trend: Vec<TrendEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct TrendEntry {
    #[serde(rename = "strongBuy", default)]
    strong_buy: u32,
    #[serde(default)]
    buy: u32,
    #[serde(default)]
    hold: u32,
    #[serde(default)]
    sell: u32,
    #[serde(rename = "strongSell", default)]
    strong_sell: u32,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`
#[derive(Debug, Default, Deserialize)]
struct RawNumber {
    raw: Option<f64>,
}

impl RawNumber {
    /// NaN/infinite/missing values collapse to the zeroed default
    fn value(&self) -> f64 {
        self.raw.filter(|v| v.is_finite()).unwrap_or(0.0)
    }
}

/// Parse a quote-summary payload; every descriptive field degrades to a
/// default instead of failing the response
pub fn parse_quote_summary(symbol: &str, payload: &str) -> Result<QuoteSummary> {
    let response: QuoteSummaryResponse = serde_json::from_str(payload)
        .map_err(|e| MarketDataError::MalformedPayload(format!("quoteSummary: {}", e)))?;

    let result = response
        .quote_summary
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| {
            MarketDataError::MalformedPayload("quoteSummary response has no result".to_string())
        })?;

    let profile = result.asset_profile.unwrap_or_default();
    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();

    let recommendations = match result.recommendation_trend {
        Some(trend) => match trend.trend.first() {
            Some(entry) => RecommendationCounts {
                buy: entry.strong_buy + entry.buy,
                hold: entry.hold,
                sell: entry.sell + entry.strong_sell,
            },
            None => RecommendationCounts::default(),
        },
        None => {
            warn!(symbol, "no analyst recommendations available");
            RecommendationCounts::default()
        }
    };

    Ok(QuoteSummary {
        company_name: price.long_name.unwrap_or_else(|| symbol.to_string()),
        sector: profile.sector.unwrap_or_else(|| "N/A".to_string()),
        industry: profile.industry.unwrap_or_else(|| "N/A".to_string()),
        current_price: price.regular_market_price.value(),
        fifty_two_week_high: detail.fifty_two_week_high.value(),
        fifty_two_week_low: detail.fifty_two_week_low.value(),
        market_cap: price.market_cap.value(),
        pe_ratio: detail.trailing_pe.value(),
        dividend_yield: detail.dividend_yield.value(),
        beta: detail.beta.value(),
        recommendations,
    })
}

fn date_to_unix(date: NaiveDate) -> Result<i64> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| MarketDataError::DataError(format!("bad date {}", date)))?;
    Ok(Utc.from_utc_datetime(&midnight).timestamp())
}

fn unix_to_date(ts: i64) -> Result<NaiveDate> {
    NaiveDateTime::from_timestamp_opt(ts, 0)
        .map(|dt| dt.date())
        .ok_or_else(|| MarketDataError::MalformedPayload(format!("bad unix timestamp {}", ts)))
}
