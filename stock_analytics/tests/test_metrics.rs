use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;
use market_data::DailyClose;
use pretty_assertions::assert_eq;
use stock_analytics::metrics::{
    annualized_volatility, performance_analysis, risk_assessment, sharpe_ratio,
    PerformanceAnalysis,
};

fn close(year: i32, month: u32, day: u32, close: f64) -> DailyClose {
    DailyClose {
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        close,
    }
}

#[test]
fn monthly_returns_use_the_last_close_of_each_month() {
    let closes = vec![
        close(2024, 1, 10, 95.0),
        close(2024, 1, 31, 100.0),
        close(2024, 2, 5, 120.0),
        close(2024, 2, 28, 110.0),
        close(2024, 3, 29, 99.0),
    ];

    let performance = performance_analysis(&closes);

    assert_eq!(performance.monthly_returns.len(), 2);
    assert_eq!(performance.monthly_returns[0].month, "February 2024");
    // 100 -> 110
    assert_approx_eq!(performance.monthly_returns[0].return_pct, 10.0);
    assert_eq!(performance.monthly_returns[1].month, "March 2024");
    // 110 -> 99
    assert_approx_eq!(performance.monthly_returns[1].return_pct, -10.0);
}

#[test]
fn unordered_input_is_sorted_before_resampling() {
    let closes = vec![
        close(2024, 2, 28, 110.0),
        close(2024, 1, 31, 100.0),
        close(2024, 2, 5, 120.0),
    ];

    let performance = performance_analysis(&closes);
    assert_eq!(performance.monthly_returns.len(), 1);
    assert_approx_eq!(performance.monthly_returns[0].return_pct, 10.0);
}

#[test]
fn volatility_and_sharpe_match_hand_computed_values() {
    // Month-end closes 100, 110, 99, 103.95: returns +10%, -10%, +5%
    let fractions = [0.10, -0.10, 0.05];

    // Sample std dev of the fractions is 0.1040833; annualized and in percent
    assert_approx_eq!(annualized_volatility(&fractions), 36.0555, 1e-3);

    // Monthly excess over 2%/yr, annualized
    assert_approx_eq!(sharpe_ratio(&fractions), 0.4993, 1e-3);
}

#[test]
fn flat_returns_have_zero_sharpe() {
    // Identical monthly returns: zero variance, ratio collapses to zero
    assert_eq!(sharpe_ratio(&[0.1, 0.1, 0.1]), 0.0);
    assert_approx_eq!(annualized_volatility(&[0.1, 0.1, 0.1]), 0.0, 1e-9);
}

#[test]
fn short_histories_yield_zeroed_metrics() {
    assert_eq!(annualized_volatility(&[]), 0.0);
    assert_eq!(annualized_volatility(&[0.05]), 0.0);
    assert_eq!(sharpe_ratio(&[0.05]), 0.0);

    let performance = performance_analysis(&[close(2024, 1, 31, 100.0)]);
    assert!(performance.monthly_returns.is_empty());
    assert_eq!(performance.volatility, 0.0);
    assert_eq!(performance.sharpe_ratio, 0.0);
}

#[test]
fn risk_buckets_follow_the_documented_thresholds() {
    let performance = |volatility, sharpe_ratio| PerformanceAnalysis {
        monthly_returns: vec![stock_analytics::MonthlyReturn {
            month: "January 2024".to_string(),
            return_pct: 1.0,
        }],
        volatility,
        sharpe_ratio,
    };

    let assessment = risk_assessment(&performance(5.0, 1.5));
    assert_eq!(assessment.volatility_category, "Low");
    assert_eq!(assessment.investment_risk_level, "Conservative");

    let assessment = risk_assessment(&performance(15.0, 0.5));
    assert_eq!(assessment.volatility_category, "Moderate");
    assert_eq!(assessment.investment_risk_level, "Moderate");

    let assessment = risk_assessment(&performance(35.0, -0.2));
    assert_eq!(assessment.volatility_category, "High");
    assert_eq!(assessment.investment_risk_level, "Aggressive");
}

#[test]
fn empty_history_is_not_assessable() {
    let performance = performance_analysis(&[]);
    let assessment = risk_assessment(&performance);

    assert_eq!(assessment.volatility_category, "N/A");
    assert_eq!(assessment.investment_risk_level, "N/A");
}
