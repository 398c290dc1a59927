use chrono::{DateTime, Utc};
use sqlx::PgPool;
use trendboard_core::Platform;

use crate::DbError;

/// A row from the `platforms` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlatformRow {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<PlatformRow> for Platform {
    fn from(row: PlatformRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            updated_at: row.updated_at,
        }
    }
}

/// Returns all active platforms ordered by name ascending.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_platforms(pool: &PgPool) -> Result<Vec<PlatformRow>, DbError> {
    let rows = sqlx::query_as::<_, PlatformRow>(
        "SELECT id, name, is_active, updated_at \
         FROM platforms \
         WHERE is_active = TRUE \
         ORDER BY name ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
