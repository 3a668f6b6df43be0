//! Descriptive financial metrics for one ticker
//!
//! Monthly returns, annualized volatility and Sharpe ratio over a daily
//! close history, plus the coarse risk buckets the analysis endpoint
//! reports.

use chrono::{Datelike, NaiveDate};
use market_data::DailyClose;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Annual risk-free rate assumed by the Sharpe calculation
const RISK_FREE_RATE: f64 = 0.02;

/// Return of one calendar month, in percent
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReturn {
    /// Month label, e.g. "January 2024"
    pub month: String,
    /// Month-over-month change of the last close, in percent
    #[serde(rename = "return")]
    pub return_pct: f64,
}

/// Performance section of the analysis response
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceAnalysis {
    pub monthly_returns: Vec<MonthlyReturn>,
    /// Annualized volatility of monthly returns, in percent
    pub volatility: f64,
    /// Annualized Sharpe ratio of monthly returns
    pub sharpe_ratio: f64,
}

/// Coarse risk buckets derived from volatility and Sharpe ratio
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub volatility_category: String,
    pub investment_risk_level: String,
}

/// Compute the performance section from a daily close history.
///
/// An empty or single-month history yields zeroed metrics rather than an
/// error; the analysis endpoint still reports the descriptive quote fields.
pub fn performance_analysis(closes: &[DailyClose]) -> PerformanceAnalysis {
    let month_ends = month_end_closes(closes);

    let mut monthly_returns = Vec::new();
    let mut fractions = Vec::new();
    for pair in month_ends.windows(2) {
        let (_, previous) = pair[0];
        let (month, current) = pair[1];
        if previous == 0.0 {
            continue;
        }

        let fraction = current / previous - 1.0;
        fractions.push(fraction);
        monthly_returns.push(MonthlyReturn {
            month: month.format("%B %Y").to_string(),
            return_pct: fraction * 100.0,
        });
    }

    PerformanceAnalysis {
        monthly_returns,
        volatility: annualized_volatility(&fractions),
        sharpe_ratio: sharpe_ratio(&fractions),
    }
}

/// Annualized volatility of monthly return fractions, in percent
pub fn annualized_volatility(monthly_fractions: &[f64]) -> f64 {
    if monthly_fractions.len() < 2 {
        return 0.0;
    }

    let std_dev = monthly_fractions.iter().std_dev();
    if !std_dev.is_finite() {
        return 0.0;
    }

    std_dev * 12_f64.sqrt() * 100.0
}

/// Annualized Sharpe ratio of monthly return fractions over the assumed
/// risk-free rate
pub fn sharpe_ratio(monthly_fractions: &[f64]) -> f64 {
    if monthly_fractions.len() < 2 {
        return 0.0;
    }

    let excess: Vec<f64> = monthly_fractions
        .iter()
        .map(|r| r - RISK_FREE_RATE / 12.0)
        .collect();

    let std_dev = excess.iter().std_dev();
    // Constant returns: the ratio is undefined, report zero
    if !std_dev.is_finite() || std_dev < 1e-12 {
        return 0.0;
    }

    excess.iter().mean() / std_dev * 12_f64.sqrt()
}

/// Bucket volatility and Sharpe into the reported risk categories
pub fn risk_assessment(performance: &PerformanceAnalysis) -> RiskAssessment {
    if performance.monthly_returns.is_empty() {
        return RiskAssessment {
            volatility_category: "N/A".to_string(),
            investment_risk_level: "N/A".to_string(),
        };
    }

    let volatility_category = if performance.volatility < 10.0 {
        "Low"
    } else if performance.volatility < 20.0 {
        "Moderate"
    } else {
        "High"
    };

    let investment_risk_level = if performance.sharpe_ratio > 1.0 {
        "Conservative"
    } else if performance.sharpe_ratio > 0.0 {
        "Moderate"
    } else {
        "Aggressive"
    };

    RiskAssessment {
        volatility_category: volatility_category.to_string(),
        investment_risk_level: investment_risk_level.to_string(),
    }
}

/// Last close of each calendar month, labeled by the first of the month
fn month_end_closes(closes: &[DailyClose]) -> Vec<(NaiveDate, f64)> {
    let mut sorted: Vec<&DailyClose> = closes.iter().collect();
    sorted.sort_by_key(|c| c.date);

    let mut month_ends: Vec<(NaiveDate, f64)> = Vec::new();
    for close in sorted {
        let month = match NaiveDate::from_ymd_opt(close.date.year(), close.date.month(), 1) {
            Some(month) => month,
            None => continue,
        };

        match month_ends.last_mut() {
            Some((last_month, last_close)) if *last_month == month => *last_close = close.close,
            _ => month_ends.push((month, close.close)),
        }
    }

    month_ends
}
