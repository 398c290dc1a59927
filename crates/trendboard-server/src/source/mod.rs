//! Data access layer.
//!
//! [`TrendSource`] is the single seam between the dashboard and its two
//! backends: direct store reads for platforms, news and rank history, and
//! aggregation-service calls for computed statistics and RSS. It holds no
//! cache; caching belongs to [`crate::hooks`].

#[cfg(test)]
pub(crate) mod fake;
mod live;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use trendboard_core::{
    KeywordStat, NewsItem, Platform, PlatformStat, RankHistory, RssFeed, RssItem, TrendData,
};
use trendboard_db::DbError;
use trendboard_stats::AggregationError;

pub use live::LiveSource;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("store error: {0}")]
    Store(#[source] DbError),
    #[error("aggregation error: {0}")]
    Aggregation(#[from] AggregationError),
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("invalid limit {0}: must be a positive integer")]
    InvalidLimit(i64),
    #[error("{0} not found")]
    NotFound(String),
    #[error("fetch cancelled")]
    Cancelled,
}

impl From<DbError> for DataError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::InvalidRange { start, end } => Self::InvalidRange { start, end },
            DbError::InvalidLimit(limit) => Self::InvalidLimit(limit),
            DbError::NotFound(what) => Self::NotFound(what),
            other => Self::Store(other),
        }
    }
}

/// Rejects an inverted `[start, end]` window before any I/O.
///
/// # Errors
///
/// Returns [`DataError::InvalidRange`] when `start > end`.
pub fn check_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), DataError> {
    if start > end {
        return Err(DataError::InvalidRange { start, end });
    }
    Ok(())
}

/// Read-only operations behind every dashboard page.
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Active platforms ordered by name.
    async fn platforms(&self) -> Result<Vec<Platform>, DataError>;

    /// Up to `limit` items across platforms, most recently crawled first.
    async fn latest_news(&self, limit: i64) -> Result<Vec<NewsItem>, DataError>;

    /// Up to `limit` items of one platform, rank 1 first. Unknown ids yield
    /// an empty list.
    async fn news_by_platform(
        &self,
        platform_id: &str,
        limit: i64,
    ) -> Result<Vec<NewsItem>, DataError>;

    /// Items last crawled inside the inclusive `[start, end]` window.
    async fn news_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NewsItem>, DataError>;

    async fn rank_history(&self, news_item_id: i64) -> Result<Vec<RankHistory>, DataError>;

    async fn platform_stats(&self, date: Option<NaiveDate>)
        -> Result<Vec<PlatformStat>, DataError>;

    async fn keyword_stats(&self, date: Option<NaiveDate>) -> Result<Vec<KeywordStat>, DataError>;

    /// One point per day for the last `days` days. The service may return
    /// fewer points than requested.
    async fn trend_data(&self, days: u32) -> Result<Vec<TrendData>, DataError>;

    async fn rss_feeds(&self) -> Result<Vec<RssFeed>, DataError>;

    /// `None` reads across all feeds.
    async fn rss_items(&self, feed_id: Option<&str>, limit: u32)
        -> Result<Vec<RssItem>, DataError>;

    /// Cheap liveness probe of the store.
    async fn health(&self) -> Result<(), DataError>;
}
