//! Common timestamp-indexed OHLCV shape
//!
//! Every vendor response, whatever its column naming, is normalized into one
//! [`PriceSeries`] before the rest of the service sees it.

use crate::error::{MarketDataError, Result};
use chrono::NaiveDateTime;
use polars::prelude::*;

/// Wire format of series timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One observed OHLCV bar
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Observation timestamp (exchange-local, as vendors report it)
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Timestamp-indexed OHLCV series, sorted ascending by timestamp
#[derive(Debug, Clone)]
pub struct PriceSeries {
    /// Data frame with datetime/open/high/low/close/volume columns
    df: DataFrame,
}

impl PriceSeries {
    /// Build a series from vendor bars; bars are sorted ascending first
    pub fn from_bars(mut bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(MarketDataError::DataError(
                "no bars in vendor response".to_string(),
            ));
        }

        bars.sort_by_key(|bar| bar.timestamp);

        let timestamps: Vec<String> = bars
            .iter()
            .map(|b| b.timestamp.format(TIMESTAMP_FORMAT).to_string())
            .collect();
        let opens: Vec<f64> = bars.iter().map(|b| b.open).collect();
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let df = DataFrame::new(vec![
            Series::new("datetime", timestamps),
            Series::new("open", opens),
            Series::new("high", highs),
            Series::new("low", lows),
            Series::new("close", closes),
            Series::new("volume", volumes),
        ])?;

        Ok(Self { df })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the close prices as a vector
    pub fn close_prices(&self) -> Result<Vec<f64>> {
        self.column_as_f64("close")
    }

    /// Get the timestamps as a vector
    pub fn timestamps(&self) -> Result<Vec<NaiveDateTime>> {
        let col = self.df.column("datetime")?;
        let values = col
            .utf8()
            .map_err(|e| MarketDataError::PolarsError(e.to_string()))?;

        let mut timestamps = Vec::with_capacity(self.len());
        for value in values.into_iter().flatten() {
            let parsed = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
                MarketDataError::DataError(format!("bad timestamp '{}': {}", value, e))
            })?;
            timestamps.push(parsed);
        }

        Ok(timestamps)
    }

    /// Timestamp of the newest observation
    pub fn last_timestamp(&self) -> Result<NaiveDateTime> {
        self.timestamps()?
            .pop()
            .ok_or_else(|| MarketDataError::DataError("empty series".to_string()))
    }

    /// Serialize the series to CSV (header row included)
    pub fn to_csv(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut df = self.df.clone();
        CsvWriter::new(&mut buffer)
            .has_header(true)
            .finish(&mut df)?;

        String::from_utf8(buffer)
            .map_err(|e| MarketDataError::DataError(format!("CSV output is not UTF-8: {}", e)))
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Helper method to get a column as f64 values
    fn column_as_f64(&self, column_name: &str) -> Result<Vec<f64>> {
        let col = self.df.column(column_name).map_err(|e| {
            MarketDataError::DataError(format!("Column '{}' not found: {}", column_name, e))
        })?;

        match col.dtype() {
            DataType::Float64 => Ok(col
                .f64()
                .map_err(|e| MarketDataError::PolarsError(e.to_string()))?
                .into_iter()
                .flatten()
                .collect()),
            DataType::Int64 => Ok(col
                .i64()
                .map_err(|e| MarketDataError::PolarsError(e.to_string()))?
                .into_iter()
                .flatten()
                .map(|v| v as f64)
                .collect()),
            _ => Err(MarketDataError::DataError(format!(
                "Column '{}' cannot be converted to f64",
                column_name
            ))),
        }
    }
}
