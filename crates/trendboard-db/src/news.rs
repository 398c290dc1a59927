//! Read queries over `news_items`, joined with `platforms` for display names.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use trendboard_core::NewsItem;

use crate::DbError;

/// A `news_items` row with the joined platform name.
///
/// `platform_name` is `None` only if the platform row is missing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NewsItemRow {
    pub id: i64,
    pub title: String,
    pub platform_id: String,
    pub platform_name: Option<String>,
    pub rank: i32,
    pub url: String,
    pub mobile_url: String,
    pub hot_value: Option<String>,
    pub first_crawl_time: DateTime<Utc>,
    pub last_crawl_time: DateTime<Utc>,
    pub crawl_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NewsItemRow> for NewsItem {
    fn from(row: NewsItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            platform_id: row.platform_id,
            platform_name: row.platform_name,
            rank: row.rank,
            url: row.url,
            mobile_url: row.mobile_url,
            hot_value: row.hot_value,
            first_crawl_time: row.first_crawl_time,
            last_crawl_time: row.last_crawl_time,
            crawl_count: row.crawl_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const NEWS_COLUMNS: &str = "n.id, n.title, n.platform_id, p.name AS platform_name, n.rank, \
     n.url, n.mobile_url, n.hot_value, n.first_crawl_time, n.last_crawl_time, \
     n.crawl_count, n.created_at, n.updated_at";

fn check_limit(limit: i64) -> Result<(), DbError> {
    if limit < 1 {
        return Err(DbError::InvalidLimit(limit));
    }
    Ok(())
}

/// Returns up to `limit` items across all platforms, most recently crawled first.
///
/// # Errors
///
/// Returns [`DbError::InvalidLimit`] if `limit < 1`, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn list_latest_news(pool: &PgPool, limit: i64) -> Result<Vec<NewsItemRow>, DbError> {
    check_limit(limit)?;

    let sql = format!(
        "SELECT {NEWS_COLUMNS} \
         FROM news_items n \
         LEFT JOIN platforms p ON p.id = n.platform_id \
         ORDER BY n.last_crawl_time DESC, n.id DESC \
         LIMIT $1"
    );
    let rows = sqlx::query_as::<_, NewsItemRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Returns up to `limit` items for one platform, rank 1 first.
///
/// An unknown platform yields an empty list, not an error.
///
/// # Errors
///
/// Returns [`DbError::InvalidLimit`] if `limit < 1`, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn list_news_by_platform(
    pool: &PgPool,
    platform_id: &str,
    limit: i64,
) -> Result<Vec<NewsItemRow>, DbError> {
    check_limit(limit)?;

    let sql = format!(
        "SELECT {NEWS_COLUMNS} \
         FROM news_items n \
         LEFT JOIN platforms p ON p.id = n.platform_id \
         WHERE n.platform_id = $1 \
         ORDER BY n.rank ASC, n.last_crawl_time DESC, n.id ASC \
         LIMIT $2"
    );
    let rows = sqlx::query_as::<_, NewsItemRow>(&sql)
        .bind(platform_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Returns items whose `last_crawl_time` falls in `[start, end]`, newest first.
///
/// # Errors
///
/// Returns [`DbError::InvalidRange`] if `start > end` (checked before any
/// query runs), or [`DbError::Sqlx`] if the query fails.
pub async fn list_news_by_date_range(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<NewsItemRow>, DbError> {
    if start > end {
        return Err(DbError::InvalidRange { start, end });
    }

    let sql = format!(
        "SELECT {NEWS_COLUMNS} \
         FROM news_items n \
         LEFT JOIN platforms p ON p.id = n.platform_id \
         WHERE n.last_crawl_time >= $1 \
           AND n.last_crawl_time <= $2 \
         ORDER BY n.last_crawl_time DESC, n.id DESC"
    );
    let rows = sqlx::query_as::<_, NewsItemRow>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
