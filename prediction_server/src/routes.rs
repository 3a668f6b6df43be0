//! HTTP endpoints
//!
//! JSON in, JSON out. Handlers validate input, call the vendor clients and
//! the forecasting/analytics layers, and let [`ApiError`] translate failures
//! into statuses.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use market_data::series::TIMESTAMP_FORMAT;
use market_data::{Interval, QuoteSummary, RecommendationCounts};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stock_analytics::association::{mine_rules, AssociationConfig, TickerHistory};
use stock_analytics::metrics::{performance_analysis, risk_assessment};
use stock_analytics::{PerformanceAnalysis, RiskAssessment};
use tracing::{info, warn};

/// Symbol used by `/predict` when none is given
const DEFAULT_PREDICT_SYMBOL: &str = "MSFT";
/// Date range used by `/comprehensive_analysis` when none is given
const DEFAULT_ANALYSIS_START: &str = "2023-01-01";
const DEFAULT_ANALYSIS_END: &str = "2024-01-01";

/// Build the service router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", get(predict))
        .route("/fetch_data", post(fetch_data))
        .route("/forecast", post(forecast))
        .route("/stock_association", post(stock_association))
        .route("/comprehensive_analysis", post(comprehensive_analysis))
        .with_state(state)
}

// ---- wire types ----

fn default_interval() -> String {
    Interval::default().as_str().to_string()
}

#[derive(Debug, Deserialize)]
pub struct StockDataRequest {
    pub symbol: String,
    #[serde(default = "default_interval")]
    pub interval: String,
}

#[derive(Debug, Serialize)]
pub struct StockDataResponse {
    pub message: String,
    pub csv_data: String,
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub symbol: String,
    pub forecast_horizon: i64,
    #[serde(default = "default_interval")]
    pub interval: String,
}

#[derive(Debug, Serialize)]
pub struct ForecastData {
    pub dates: Vec<String>,
    pub predictions: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub symbol: String,
    pub forecast_horizon: usize,
    pub interval: String,
    pub forecast_data: ForecastData,
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    pub symbol: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub symbol: String,
    pub predicted_price: f64,
}

fn default_min_support() -> f64 {
    AssociationConfig::default().min_support
}

fn default_min_lift() -> f64 {
    AssociationConfig::default().min_lift
}

#[derive(Debug, Deserialize)]
pub struct StockAssociationRequest {
    pub tickers: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_min_support")]
    pub min_support: f64,
    #[serde(default = "default_min_lift")]
    pub min_lift: f64,
}

#[derive(Debug, Serialize)]
pub struct AssociationRuleJson {
    pub antecedents: Vec<String>,
    pub consequents: Vec<String>,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

#[derive(Debug, Serialize)]
pub struct StockAssociationResponse {
    pub message: String,
    pub rules: Vec<AssociationRuleJson>,
}

fn default_analysis_start() -> String {
    DEFAULT_ANALYSIS_START.to_string()
}

fn default_analysis_end() -> String {
    DEFAULT_ANALYSIS_END.to_string()
}

#[derive(Debug, Deserialize)]
pub struct StockAnalysisRequest {
    pub symbol: String,
    #[serde(default = "default_analysis_start")]
    pub start_date: String,
    #[serde(default = "default_analysis_end")]
    pub end_date: String,
}

#[derive(Debug, Serialize)]
pub struct BasicInfo {
    pub company_name: String,
    pub sector: String,
    pub industry: String,
}

#[derive(Debug, Serialize)]
pub struct PriceMetrics {
    pub current_price: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
}

#[derive(Debug, Serialize)]
pub struct FinancialHealth {
    pub market_cap: f64,
    pub pe_ratio: f64,
    pub dividend_yield: f64,
    pub beta: f64,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub basic_info: BasicInfo,
    pub price_metrics: PriceMetrics,
    pub financial_health: FinancialHealth,
    pub performance_analysis: PerformanceAnalysis,
    pub risk_assessment: RiskAssessment,
    pub analyst_recommendations: RecommendationCounts,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

// ---- handlers ----

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Fetch a raw historical series and return it as CSV
async fn fetch_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StockDataRequest>,
) -> Result<Json<StockDataResponse>, ApiError> {
    let interval: Interval = request.interval.parse()?;
    let series = state.twelve_data.time_series(&request.symbol, interval).await?;
    info!(symbol = %request.symbol, rows = series.len(), "fetched series");

    Ok(Json(StockDataResponse {
        message: "Stock data fetched successfully!".to_string(),
        csv_data: series.to_csv()?,
    }))
}

/// Multi-step forecast for a symbol
async fn forecast(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ForecastRequest>,
) -> Result<Json<ForecastResponse>, ApiError> {
    if request.forecast_horizon <= 0 {
        return Err(ApiError::BadRequest(
            "Forecast horizon must be positive.".to_string(),
        ));
    }
    let horizon = request.forecast_horizon as usize;
    let interval: Interval = request.interval.parse()?;

    let series = state.twelve_data.time_series(&request.symbol, interval).await?;
    let closes = series.close_prices()?;
    let normalized = state.scaler.transform_all(&closes);

    let window = state.forecaster.seed_window(&state.model, &normalized)?;
    let prices = state
        .forecaster
        .forecast_prices(&state.model, &state.scaler, window, horizon)?;

    let last = series.last_timestamp()?;
    let dates = interval
        .future_timestamps(last, horizon)
        .iter()
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .collect();

    info!(symbol = %request.symbol, horizon, "forecast served");

    Ok(Json(ForecastResponse {
        symbol: request.symbol,
        forecast_horizon: horizon,
        interval: interval.as_str().to_string(),
        forecast_data: ForecastData {
            dates,
            predictions: prices.values().to_vec(),
        },
    }))
}

/// Single-step convenience forecast on daily data
async fn predict(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictParams>,
) -> Result<Json<PredictResponse>, ApiError> {
    let symbol = params
        .symbol
        .unwrap_or_else(|| DEFAULT_PREDICT_SYMBOL.to_string());

    let series = state
        .twelve_data
        .time_series(&symbol, Interval::OneDay)
        .await?;
    let normalized = state.scaler.transform_all(&series.close_prices()?);

    let window = state.forecaster.seed_window(&state.model, &normalized)?;
    let prices = state
        .forecaster
        .forecast_prices(&state.model, &state.scaler, window, 1)?;

    Ok(Json(PredictResponse {
        symbol,
        predicted_price: prices.values()[0],
    }))
}

/// Mine association rules across a basket of tickers
async fn stock_association(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StockAssociationRequest>,
) -> Result<Json<StockAssociationResponse>, ApiError> {
    if request.tickers.len() < 2 {
        return Err(ApiError::BadRequest(
            "At least two tickers are required.".to_string(),
        ));
    }
    let (start, end) = parse_date_range(&request.start_date, &request.end_date)?;

    let mut histories = Vec::with_capacity(request.tickers.len());
    for ticker in &request.tickers {
        let closes = state.yahoo.daily_closes(ticker, start, end).await?;
        histories.push(TickerHistory {
            symbol: ticker.clone(),
            closes,
        });
    }

    let rules = mine_rules(
        &histories,
        AssociationConfig {
            min_support: request.min_support,
            min_lift: request.min_lift,
        },
    )?;
    info!(tickers = request.tickers.len(), rules = rules.len(), "association rules mined");

    let rules = rules
        .into_iter()
        .map(|rule| AssociationRuleJson {
            antecedents: rule.antecedents,
            consequents: rule.consequents,
            support: round4(rule.support),
            confidence: round4(rule.confidence),
            lift: round4(rule.lift),
        })
        .collect();

    Ok(Json(StockAssociationResponse {
        message: "Stock association rules generated successfully!".to_string(),
        rules,
    }))
}

/// Descriptive financial analysis for one ticker
async fn comprehensive_analysis(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StockAnalysisRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let (start, end) = parse_date_range(&request.start_date, &request.end_date)?;

    let summary = state.yahoo.quote_summary(&request.symbol).await?;

    // History failures degrade to an empty performance section; the quote
    // fields are still reported
    let closes = match state.yahoo.daily_closes(&request.symbol, start, end).await {
        Ok(closes) => closes,
        Err(err) => {
            warn!(symbol = %request.symbol, %err, "no usable history for analysis");
            Vec::new()
        }
    };

    let performance = performance_analysis(&closes);
    let risk = risk_assessment(&performance);

    Ok(Json(analysis_response(summary, performance, risk)))
}

fn analysis_response(
    summary: QuoteSummary,
    performance: PerformanceAnalysis,
    risk: RiskAssessment,
) -> AnalysisResponse {
    AnalysisResponse {
        basic_info: BasicInfo {
            company_name: summary.company_name,
            sector: summary.sector,
            industry: summary.industry,
        },
        price_metrics: PriceMetrics {
            current_price: summary.current_price,
            fifty_two_week_high: summary.fifty_two_week_high,
            fifty_two_week_low: summary.fifty_two_week_low,
        },
        financial_health: FinancialHealth {
            market_cap: summary.market_cap,
            pe_ratio: summary.pe_ratio,
            dividend_yield: summary.dividend_yield,
            beta: summary.beta,
        },
        performance_analysis: performance,
        risk_assessment: risk,
        analyst_recommendations: summary.recommendations,
    }
}

// ---- helpers ----

/// Parse a YYYY-MM-DD date range; the start must precede the end
pub fn parse_date_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let parse = |value: &str| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
    };

    let start = parse(start)?;
    let end = parse(end)?;
    if start >= end {
        return Err(ApiError::BadRequest(format!(
            "start_date {} must be before end_date {}",
            start, end
        )));
    }

    Ok((start, end))
}

/// Round metric values to four decimals for the response
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
