//! Typed HTTP client for the trend aggregation service.
//!
//! The service owns keyword, platform and trend statistics plus the RSS
//! tables; this crate only reads them.

pub mod client;
pub mod error;
pub(crate) mod types;

pub use client::StatsClient;
pub use error::AggregationError;
