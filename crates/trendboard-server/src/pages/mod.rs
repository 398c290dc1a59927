//! Presentation pages.
//!
//! Each page has a pure `render` turning hook states into a serializable
//! view-model, plus a `load` that gathers those states from [`crate::hooks::Hooks`].
//! Every data block is a [`ViewState`], so loading, failure, emptiness and
//! data are always distinguishable.

pub mod dashboard;
pub mod history;
pub mod keywords;
pub mod platforms;
pub mod rss;
pub mod settings;

use chrono::{DateTime, Utc};
use serde::Serialize;
use trendboard_core::{format_relative_time, platform_color, NewsItem};

use crate::hooks::QueryState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    Loading,
    Failed { reason: String },
    Empty,
    Ready(T),
}

impl<T> ViewState<T> {
    /// Maps a hook state; an idle query renders as loading.
    pub fn from_query<V>(state: QueryState<V>, render: impl FnOnce(V) -> T) -> Self {
        match state {
            QueryState::Idle | QueryState::Loading => Self::Loading,
            QueryState::Failed(err) => Self::Failed {
                reason: err.to_string(),
            },
            QueryState::Ready(value) => Self::Ready(render(value)),
        }
    }

    /// Like [`ViewState::from_query`], but an empty list renders as `Empty`.
    pub fn from_list<V>(state: QueryState<Vec<V>>, render: impl FnOnce(Vec<V>) -> T) -> Self {
        match state {
            QueryState::Ready(rows) if rows.is_empty() => Self::Empty,
            other => Self::from_query(other, render),
        }
    }
}

/// A block that needs user input before it can show anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section<T> {
    Prompt { message: &'static str },
    View { state: ViewState<T> },
}

/// One news item as listed on the dashboard, platform and history pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsRow {
    pub id: i64,
    pub platform: String,
    pub color: &'static str,
    pub rank: String,
    pub title: String,
    /// `None` renders the title without a link.
    pub url: Option<String>,
    pub hot_value: Option<String>,
    pub crawled: String,
    pub crawl_count: i32,
}

impl NewsRow {
    #[must_use]
    pub fn new(item: NewsItem, now: DateTime<Utc>) -> Self {
        Self {
            id: item.id,
            platform: item.platform_label().to_string(),
            color: platform_color(&item.platform_id),
            rank: format!("#{}", item.rank),
            crawled: format_relative_time(item.last_crawl_time, now),
            url: Some(item.url).filter(|url| !url.is_empty()),
            hot_value: item.hot_value,
            title: item.title,
            crawl_count: item.crawl_count,
        }
    }
}

fn news_rows(items: Vec<NewsItem>, now: DateTime<Utc>) -> Vec<NewsRow> {
    items.into_iter().map(|item| NewsRow::new(item, now)).collect()
}
