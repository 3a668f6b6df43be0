//! # Stock Analytics
//!
//! Auxiliary analytics over daily close histories: association-rule mining
//! across a basket of tickers and the descriptive performance metrics of a
//! single ticker.

pub mod association;
pub mod error;
pub mod metrics;

// Re-export commonly used types
pub use crate::association::{AssociationConfig, AssociationRule, TickerHistory};
pub use crate::error::{AnalyticsError, Result};
pub use crate::metrics::{MonthlyReturn, PerformanceAnalysis, RiskAssessment};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
