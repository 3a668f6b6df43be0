use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;
use market_data::error::MarketDataError;
use market_data::yahoo::{parse_daily_closes, parse_quote_summary, RecommendationCounts};

#[test]
fn parses_chart_payload_and_skips_null_closes() {
    // 2024-01-02 and 2024-01-04; the middle entry is a halted day
    let payload = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "MSFT"},
                "timestamp": [1704182400, 1704268800, 1704355200],
                "indicators": {"quote": [{"close": [370.87, null, 373.26]}]}
            }],
            "error": null
        }
    }"#;

    let closes = parse_daily_closes(payload).unwrap();

    assert_eq!(closes.len(), 2);
    assert_eq!(closes[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_approx_eq!(closes[0].close, 370.87);
    assert_approx_eq!(closes[1].close, 373.26);
}

#[test]
fn chart_error_payload_is_a_vendor_error() {
    let payload = r#"{
        "chart": {
            "result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
        }
    }"#;

    match parse_daily_closes(payload) {
        Err(MarketDataError::VendorError(message)) => {
            assert!(message.contains("delisted"));
        }
        other => panic!("Expected VendorError, got {:?}", other),
    }
}

#[test]
fn quote_summary_maps_all_modules() {
    let payload = r#"{
        "quoteSummary": {
            "result": [{
                "assetProfile": {"sector": "Technology", "industry": "Consumer Electronics"},
                "price": {
                    "longName": "Apple Inc.",
                    "regularMarketPrice": {"raw": 195.87, "fmt": "195.87"},
                    "marketCap": {"raw": 3021000000000.0, "fmt": "3.02T"}
                },
                "summaryDetail": {
                    "fiftyTwoWeekHigh": {"raw": 199.62},
                    "fiftyTwoWeekLow": {"raw": 164.08},
                    "trailingPE": {"raw": 30.45},
                    "dividendYield": {"raw": 0.0049},
                    "beta": {"raw": 1.29}
                },
                "recommendationTrend": {
                    "trend": [
                        {"period": "0m", "strongBuy": 11, "buy": 21, "hold": 6, "sell": 1, "strongSell": 1}
                    ]
                }
            }]
        }
    }"#;

    let summary = parse_quote_summary("AAPL", payload).unwrap();

    assert_eq!(summary.company_name, "Apple Inc.");
    assert_eq!(summary.sector, "Technology");
    assert_approx_eq!(summary.current_price, 195.87);
    assert_approx_eq!(summary.pe_ratio, 30.45);
    assert_approx_eq!(summary.beta, 1.29);
    assert_eq!(
        summary.recommendations,
        RecommendationCounts {
            buy: 32,
            hold: 6,
            sell: 2
        }
    );
}

#[test]
fn missing_modules_degrade_to_defaults() {
    let payload = r#"{
        "quoteSummary": {
            "result": [{"price": {"regularMarketPrice": {"raw": 10.0}}}]
        }
    }"#;

    let summary = parse_quote_summary("XYZ", payload).unwrap();

    // Symbol stands in for the missing long name, profile fields default
    assert_eq!(summary.company_name, "XYZ");
    assert_eq!(summary.sector, "N/A");
    assert_eq!(summary.industry, "N/A");
    assert_eq!(summary.market_cap, 0.0);
    assert_eq!(summary.recommendations, RecommendationCounts::default());
}

#[test]
fn empty_result_is_a_malformed_payload() {
    let payload = r#"{"quoteSummary": {"result": []}}"#;
    assert!(matches!(
        parse_quote_summary("XYZ", payload),
        Err(MarketDataError::MalformedPayload(_))
    ));
}
