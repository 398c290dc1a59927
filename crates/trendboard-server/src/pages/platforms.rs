use chrono::{DateTime, Utc};
use serde::Serialize;
use trendboard_core::{platform_color, NewsItem, Platform};

use super::{news_rows, NewsRow, Section, ViewState};
use crate::hooks::{Hooks, QueryState};

pub const PLATFORM_NEWS_LIMIT: i64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformsView {
    pub platforms: ViewState<Vec<PlatformEntry>>,
    pub detail_title: String,
    pub detail: Section<Vec<NewsRow>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformEntry {
    pub id: String,
    pub name: String,
    pub color: &'static str,
    pub selected: bool,
}

/// `selected` is the `platform` query parameter; empty means none.
pub async fn load(hooks: &Hooks, selected: &str, now: DateTime<Utc>) -> PlatformsView {
    let (platforms, news) = tokio::join!(
        hooks.platforms(),
        hooks.news_by_platform(selected, PLATFORM_NEWS_LIMIT),
    );
    render(platforms, selected, news, now)
}

#[must_use]
pub fn render(
    platforms: QueryState<Vec<Platform>>,
    selected: &str,
    news: QueryState<Vec<NewsItem>>,
    now: DateTime<Utc>,
) -> PlatformsView {
    let detail_title = if selected.is_empty() {
        "Select a platform".to_string()
    } else {
        match &platforms {
            QueryState::Ready(rows) => rows
                .iter()
                .find(|p| p.id == selected)
                .map_or_else(|| selected.to_string(), |p| p.name.clone()),
            _ => selected.to_string(),
        }
    };

    let detail = if selected.is_empty() {
        Section::Prompt {
            message: "Choose a platform to see its hot list",
        }
    } else {
        Section::View {
            state: ViewState::from_list(news, |items| news_rows(items, now)),
        }
    };

    PlatformsView {
        platforms: ViewState::from_list(platforms, |rows| {
            rows.into_iter()
                .map(|p| PlatformEntry {
                    color: platform_color(&p.id),
                    selected: p.id == selected,
                    id: p.id,
                    name: p.name,
                })
                .collect()
        }),
        detail_title,
        detail,
    }
}
