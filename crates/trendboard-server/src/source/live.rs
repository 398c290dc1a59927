use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use trendboard_core::{
    KeywordStat, NewsItem, Platform, PlatformStat, RankHistory, RssFeed, RssItem, TrendData,
};
use trendboard_stats::StatsClient;

use super::{check_range, DataError, TrendSource};

/// Production [`TrendSource`]: Postgres for raw rows, the aggregation
/// service for statistics and RSS.
///
/// Built once by the composition root and shared as `Arc<dyn TrendSource>`.
pub struct LiveSource {
    pool: PgPool,
    stats: StatsClient,
}

impl LiveSource {
    #[must_use]
    pub fn new(pool: PgPool, stats: StatsClient) -> Self {
        Self { pool, stats }
    }
}

#[async_trait]
impl TrendSource for LiveSource {
    async fn platforms(&self) -> Result<Vec<Platform>, DataError> {
        let rows = trendboard_db::list_active_platforms(&self.pool).await?;
        Ok(rows.into_iter().map(Platform::from).collect())
    }

    async fn latest_news(&self, limit: i64) -> Result<Vec<NewsItem>, DataError> {
        let rows = trendboard_db::list_latest_news(&self.pool, limit).await?;
        Ok(rows.into_iter().map(NewsItem::from).collect())
    }

    async fn news_by_platform(
        &self,
        platform_id: &str,
        limit: i64,
    ) -> Result<Vec<NewsItem>, DataError> {
        let rows = trendboard_db::list_news_by_platform(&self.pool, platform_id, limit).await?;
        Ok(rows.into_iter().map(NewsItem::from).collect())
    }

    async fn news_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<NewsItem>, DataError> {
        check_range(start, end)?;
        let rows = trendboard_db::list_news_by_date_range(&self.pool, start, end).await?;
        Ok(rows.into_iter().map(NewsItem::from).collect())
    }

    async fn rank_history(&self, news_item_id: i64) -> Result<Vec<RankHistory>, DataError> {
        let rows = trendboard_db::list_rank_history(&self.pool, news_item_id).await?;
        Ok(rows.into_iter().map(RankHistory::from).collect())
    }

    async fn platform_stats(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<PlatformStat>, DataError> {
        Ok(self.stats.platform_stats(date).await?)
    }

    async fn keyword_stats(&self, date: Option<NaiveDate>) -> Result<Vec<KeywordStat>, DataError> {
        Ok(self.stats.keyword_stats(date).await?)
    }

    async fn trend_data(&self, days: u32) -> Result<Vec<TrendData>, DataError> {
        Ok(self.stats.trend_data(days).await?)
    }

    async fn rss_feeds(&self) -> Result<Vec<RssFeed>, DataError> {
        Ok(self.stats.rss_feeds().await?)
    }

    async fn rss_items(
        &self,
        feed_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<RssItem>, DataError> {
        Ok(self.stats.rss_items(feed_id, limit).await?)
    }

    async fn health(&self) -> Result<(), DataError> {
        trendboard_db::health_check(&self.pool).await?;
        Ok(())
    }
}
