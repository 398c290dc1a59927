use chrono::{DateTime, Utc};
use sqlx::PgPool;
use trendboard_core::RankHistory;

use crate::DbError;

/// A row from the append-only `rank_history` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankHistoryRow {
    pub id: i64,
    pub news_item_id: i64,
    pub rank: i32,
    pub crawl_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<RankHistoryRow> for RankHistory {
    fn from(row: RankHistoryRow) -> Self {
        Self {
            id: row.id,
            news_item_id: row.news_item_id,
            rank: row.rank,
            crawl_time: row.crawl_time,
            created_at: row.created_at,
        }
    }
}

/// Returns the rank history of one news item, oldest crawl first.
///
/// An existing item with no history yields an empty list; an unknown item id
/// is reported as [`DbError::NotFound`] so callers can tell the two apart.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no news item has `news_item_id`, or
/// [`DbError::Sqlx`] if a query fails.
pub async fn list_rank_history(
    pool: &PgPool,
    news_item_id: i64,
) -> Result<Vec<RankHistoryRow>, DbError> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM news_items WHERE id = $1)")
            .bind(news_item_id)
            .fetch_one(pool)
            .await?;

    if !exists {
        return Err(DbError::NotFound(format!("news item {news_item_id}")));
    }

    let rows = sqlx::query_as::<_, RankHistoryRow>(
        "SELECT id, news_item_id, rank, crawl_time, created_at \
         FROM rank_history \
         WHERE news_item_id = $1 \
         ORDER BY crawl_time ASC, id ASC",
    )
    .bind(news_item_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
