use chrono::{DateTime, Utc};
use serde::Serialize;
use trendboard_core::{format_relative_time, truncate_text, RssFeed, RssItem};

use super::ViewState;
use crate::hooks::{Hooks, QueryState};

pub const RSS_ITEMS_LIMIT: u32 = 50;
pub const SUMMARY_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RssView {
    pub feeds: ViewState<Vec<FeedEntry>>,
    pub items_title: String,
    pub items: ViewState<Vec<RssRow>>,
}

/// Sidebar entry. The first entry is always "All feeds" with no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedEntry {
    pub id: Option<String>,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RssRow {
    pub id: i64,
    pub feed: String,
    pub title: String,
    pub link: String,
    pub summary: Option<String>,
    pub published: String,
}

impl RssRow {
    #[must_use]
    pub fn new(item: RssItem, now: DateTime<Utc>) -> Self {
        Self {
            id: item.id,
            feed: item.feed_label().to_string(),
            published: format_relative_time(item.published_at, now),
            summary: item
                .summary
                .filter(|s| !s.trim().is_empty())
                .map(|s| truncate_text(&s, SUMMARY_CHARS)),
            title: item.title,
            link: item.link,
        }
    }
}

/// `feed` of `None` shows items across every feed.
pub async fn load(hooks: &Hooks, feed: Option<&str>, now: DateTime<Utc>) -> RssView {
    let (feeds, items) = tokio::join!(hooks.rss_feeds(), hooks.rss_items(feed, RSS_ITEMS_LIMIT));
    render(feeds, feed, items, now)
}

#[must_use]
pub fn render(
    feeds: QueryState<Vec<RssFeed>>,
    selected: Option<&str>,
    items: QueryState<Vec<RssItem>>,
    now: DateTime<Utc>,
) -> RssView {
    let items_title = match (selected, &feeds) {
        (None, _) => "All feeds".to_string(),
        (Some(id), QueryState::Ready(rows)) => rows
            .iter()
            .find(|f| f.id == id)
            .map_or_else(|| id.to_string(), |f| f.name.clone()),
        (Some(id), _) => id.to_string(),
    };

    // The "All feeds" entry is always present, so the list is never empty.
    let feeds = ViewState::from_query(feeds, |rows| {
        let mut entries = Vec::with_capacity(rows.len() + 1);
        entries.push(FeedEntry {
            id: None,
            name: "All feeds".to_string(),
            selected: selected.is_none(),
        });
        entries.extend(rows.into_iter().map(|f| FeedEntry {
            selected: selected == Some(f.id.as_str()),
            id: Some(f.id),
            name: f.name,
        }));
        entries
    });

    RssView {
        feeds,
        items_title,
        items: ViewState::from_list(items, |rows| {
            rows.into_iter().map(|item| RssRow::new(item, now)).collect()
        }),
    }
}
