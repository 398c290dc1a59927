use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;
use crate::nav::{Page, Route};
use crate::pages::{
    dashboard::{self, DashboardView},
    history::{self, HistoryView},
    keywords::{self, KeywordsView},
    platforms::{self, PlatformsView},
    rss::{self, RssView},
    settings::{self, SettingsView},
};

type PageJson<T> = Json<ApiResponse<Page<T>>>;
type PageResponse<T> = Result<PageJson<T>, ApiError>;

#[derive(Debug, Deserialize)]
pub(super) struct PlatformQuery {
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct FeedQuery {
    pub feed: Option<String>,
}

impl FeedQuery {
    /// An empty `feed` means all feeds.
    pub(super) fn selected(&self) -> Option<&str> {
        self.feed.as_deref().filter(|id| !id.is_empty())
    }
}

/// Raw history parameters. Form submissions send blanks for untouched
/// inputs, so every field is parsed by hand.
#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    pub news_item_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

type HistoryParams = (Option<i64>, Option<(DateTime<Utc>, DateTime<Utc>)>);

impl HistoryQuery {
    fn parse(&self) -> Result<HistoryParams, String> {
        let news_item_id = match non_blank(self.news_item_id.as_deref()) {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| format!("news_item_id must be an integer, got {raw:?}"))?,
            ),
            None => None,
        };
        let start = parse_time("start", self.start.as_deref())?;
        let end = parse_time("end", self.end.as_deref())?;
        let range = start.zip(end);
        Ok((news_item_id, range))
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_time(field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    match non_blank(raw) {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|at| Some(at.with_timezone(&Utc)))
            .map_err(|e| format!("{field} must be an RFC 3339 timestamp: {e}")),
        None => Ok(None),
    }
}

fn respond<T: Serialize>(req_id: RequestId, route: Route, content: T) -> PageJson<T> {
    Json(ApiResponse {
        data: Page::new(route, content),
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) fn reject(req_id: RequestId, rejection: &QueryRejection) -> ApiError {
    ApiError::new(req_id.0, "bad_request", rejection.body_text())
}

pub(super) async fn dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> PageJson<DashboardView> {
    let view = dashboard::load(&state.hooks, Utc::now()).await;
    respond(req_id, Route::Dashboard, view)
}

pub(super) async fn platforms(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<PlatformQuery>, QueryRejection>,
) -> PageResponse<PlatformsView> {
    let Query(query) = query.map_err(|e| reject(req_id.clone(), &e))?;
    let view = platforms::load(&state.hooks, query.platform.trim(), Utc::now()).await;
    Ok(respond(req_id, Route::Platforms, view))
}

pub(super) async fn keywords(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> PageJson<KeywordsView> {
    let view = keywords::load(&state.hooks).await;
    respond(req_id, Route::Keywords, view)
}

pub(super) async fn history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> PageResponse<HistoryView> {
    let Query(query) = query.map_err(|e| reject(req_id.clone(), &e))?;
    let (news_item_id, range) = query
        .parse()
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;
    let view = history::load(&state.hooks, news_item_id, range, Utc::now()).await;
    Ok(respond(req_id, Route::History, view))
}

pub(super) async fn rss(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> PageResponse<RssView> {
    let Query(query) = query.map_err(|e| reject(req_id.clone(), &e))?;
    let view = rss::load(&state.hooks, query.selected(), Utc::now()).await;
    Ok(respond(req_id, Route::Rss, view))
}

pub(super) async fn settings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> PageJson<SettingsView> {
    let view = settings::render(&state.config, state.hooks.settings());
    respond(req_id, Route::Settings, view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_query(id: &str, start: &str, end: &str) -> HistoryQuery {
        HistoryQuery {
            news_item_id: Some(id.to_string()),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
        }
    }

    #[test]
    fn blank_history_fields_mean_absent() {
        let (id, range) = history_query("", " ", "").parse().expect("parse");
        assert_eq!(id, None);
        assert_eq!(range, None);
    }

    #[test]
    fn range_needs_both_bounds() {
        let (id, range) = history_query("7", "2025-01-27T08:00:00Z", "")
            .parse()
            .expect("parse");
        assert_eq!(id, Some(7));
        assert_eq!(range, None);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let (_, range) = history_query("", "2025-01-27T16:00:00+08:00", "2025-01-27T12:00:00Z")
            .parse()
            .expect("parse");
        let (start, _) = range.expect("range");
        assert_eq!(start.to_rfc3339(), "2025-01-27T08:00:00+00:00");
    }

    #[test]
    fn malformed_history_fields_are_rejected() {
        let err = history_query("abc", "", "").parse().expect_err("bad id");
        assert!(err.contains("news_item_id"), "{err}");

        let err = history_query("", "yesterday", "").parse().expect_err("bad start");
        assert!(err.starts_with("start"), "{err}");
    }

    #[test]
    fn empty_feed_selects_all_feeds() {
        assert_eq!(FeedQuery { feed: Some(String::new()) }.selected(), None);
        assert_eq!(FeedQuery { feed: None }.selected(), None);
        assert_eq!(FeedQuery { feed: Some("hn".to_string()) }.selected(), Some("hn"));
    }
}
