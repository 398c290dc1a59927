//! Read-only domain entities shown by the dashboard.
//!
//! Store-backed entities (`Platform`, `NewsItem`, `RankHistory`) are produced
//! by `trendboard-db`; the derived statistics and RSS entities arrive as JSON
//! from the aggregation service via `trendboard-stats`.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A source site or app whose hot list is collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

/// One ranked entry on a platform's hot list.
///
/// `platform_name` is only populated by queries that join `platforms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    pub platform_id: String,
    #[serde(default)]
    pub platform_name: Option<String>,
    pub rank: i32,
    pub url: String,
    pub mobile_url: String,
    #[serde(default)]
    pub hot_value: Option<String>,
    pub first_crawl_time: DateTime<Utc>,
    pub last_crawl_time: DateTime<Utc>,
    pub crawl_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsItem {
    /// Label shown next to the item: the joined platform name, else the id.
    #[must_use]
    pub fn platform_label(&self) -> &str {
        self.platform_name.as_deref().unwrap_or(&self.platform_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankHistory {
    pub id: i64,
    pub news_item_id: i64,
    pub rank: i32,
    pub crawl_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Keyword frequency computed by the aggregation service.
///
/// `platforms` keeps the service's order, which the keywords table relies on
/// when it shows the first few.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordStat {
    pub keyword: String,
    pub count: u64,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub news_items: Vec<NewsItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStat {
    pub platform_id: String,
    pub platform_name: String,
    pub total_items: u64,
    pub avg_rank: f64,
    #[serde(default)]
    pub top_keywords: Vec<String>,
}

/// One day of item counts, overall and per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendData {
    pub date: NaiveDate,
    pub count: u64,
    #[serde(default)]
    pub platforms: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssFeed {
    pub id: String,
    pub name: String,
    pub url: String,
    pub enabled: bool,
    #[serde(default)]
    pub max_age_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssItem {
    pub id: i64,
    pub feed_id: String,
    #[serde(default)]
    pub feed_name: Option<String>,
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RssItem {
    #[must_use]
    pub fn feed_label(&self) -> &str {
        self.feed_name.as_deref().unwrap_or(&self.feed_id)
    }
}
