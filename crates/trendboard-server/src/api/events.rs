//! Live pages as server-sent events.
//!
//! Each stream mounts its hook subscription for as long as the client stays
//! connected: the first event is the current page, then one event per
//! interval refetch. Disconnecting drops the stream and the subscription.

use std::convert::Infallible;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Extension,
};
use chrono::Utc;
use futures::stream::{self, Stream};
use serde::Serialize;

use super::pages::{reject, FeedQuery};
use super::{ApiError, AppState};
use crate::hooks::{Hooks, Subscription};
use crate::middleware::RequestId;
use crate::nav::{Page, Route};
use crate::pages::{dashboard, rss};

pub(super) async fn dashboard(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.hooks.subscribe_latest_news(dashboard::LATEST_LIMIT);
    let stream = live_stream(state.hooks, subscription, "dashboard", |hooks| async move {
        Page::new(Route::Dashboard, dashboard::load(&hooks, Utc::now()).await)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub(super) async fn rss(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Query(query) = query.map_err(|e| reject(req_id, &e))?;
    let feed = query.selected().map(str::to_string);
    let subscription = state
        .hooks
        .subscribe_rss_items(feed.as_deref(), rss::RSS_ITEMS_LIMIT);
    let stream = live_stream(state.hooks, subscription, "rss", move |hooks| {
        let feed = feed.clone();
        async move {
            Page::new(Route::Rss, rss::load(&hooks, feed.as_deref(), Utc::now()).await)
        }
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn live_stream<F, Fut, T>(
    hooks: Hooks,
    subscription: Subscription,
    name: &'static str,
    render: F,
) -> impl Stream<Item = Result<Event, Infallible>>
where
    F: Fn(Hooks) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = T> + Send + 'static,
    T: Serialize,
{
    let seed = (hooks, subscription, render, true);
    stream::unfold(seed, move |(hooks, mut subscription, render, first)| async move {
        if !first {
            if !subscription.changed().await {
                return None;
            }
            tracing::debug!(event = name, revision = subscription.revision(), "live page refreshed");
        }
        let page = render(hooks.clone()).await;
        let event = match Event::default().event(name).json_data(&page) {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(error = %e, event = name, "failed to encode live page");
                Event::default().event("error").data("failed to encode page")
            }
        };
        Some((Ok(event), (hooks, subscription, render, false)))
    })
}
