use chrono::{Duration, NaiveDate};
use market_data::error::MarketDataError;
use market_data::interval::Interval;
use pretty_assertions::assert_eq;

#[test]
fn wire_strings_round_trip() {
    let cases = [
        ("1min", Interval::OneMinute),
        ("5min", Interval::FiveMinutes),
        ("15min", Interval::FifteenMinutes),
        ("30min", Interval::ThirtyMinutes),
        ("1h", Interval::OneHour),
        ("2h", Interval::TwoHours),
        ("4h", Interval::FourHours),
        ("1day", Interval::OneDay),
    ];

    for (text, interval) in cases {
        assert_eq!(text.parse::<Interval>().unwrap(), interval);
        assert_eq!(interval.as_str(), text);
    }
}

#[test]
fn unknown_interval_is_rejected() {
    let result = "13min".parse::<Interval>();
    assert!(matches!(result, Err(MarketDataError::InvalidInterval(_))));
}

#[test]
fn default_interval_is_one_hour() {
    assert_eq!(Interval::default(), Interval::OneHour);
}

#[test]
fn future_timestamps_step_from_the_last_observation() {
    let last = NaiveDate::from_ymd_opt(2024, 6, 10)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap();

    let timestamps = Interval::OneHour.future_timestamps(last, 3);

    assert_eq!(timestamps.len(), 3);
    // The last actual observation is not part of the forecast index
    assert_eq!(timestamps[0], last + Duration::hours(1));
    assert_eq!(timestamps[2], last + Duration::hours(3));

    let daily = Interval::OneDay.future_timestamps(last, 2);
    assert_eq!(daily[1], last + Duration::days(2));
}
