//! View-model hooks: one cached, deduplicated query per data-access operation.
//!
//! Pages ask [`Hooks`] for a [`QueryState`] and never talk to the
//! [`TrendSource`] directly. Live views additionally hold a [`Subscription`],
//! which keeps the key observed and refetches it on an interval until dropped.

mod cache;

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};
use trendboard_core::{
    AppConfig, KeywordStat, NewsItem, Platform, PlatformStat, RankHistory, RssFeed, RssItem,
    TrendData,
};

use crate::source::{DataError, TrendSource};

pub use cache::{Lookup, ObserverGuard, QueryCache, QueryState};

pub const LATEST_NEWS_INTERVAL: Duration = Duration::from_secs(60);
pub const RSS_ITEMS_INTERVAL: Duration = Duration::from_secs(300);
/// How long an unobserved result is kept before its entry can be evicted.
pub const GC_TIME: Duration = Duration::from_secs(300);

/// Timing knobs for the hook layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookSettings {
    /// How long a settled result is served without refetching.
    pub stale_time: Duration,
    /// How long a page waits for a pending fetch before rendering `Loading`.
    pub render_budget: Duration,
    pub gc_time: Duration,
    pub latest_news_interval: Duration,
    pub rss_items_interval: Duration,
}

impl HookSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            stale_time: Duration::from_secs(config.stale_time_secs),
            render_budget: Duration::from_millis(config.render_budget_ms),
            gc_time: GC_TIME,
            latest_news_interval: LATEST_NEWS_INTERVAL,
            rss_items_interval: RSS_ITEMS_INTERVAL,
        }
    }
}

#[derive(Clone)]
pub struct Hooks {
    source: Arc<dyn TrendSource>,
    settings: HookSettings,
    platforms: QueryCache<(), Vec<Platform>>,
    latest_news: QueryCache<i64, Vec<NewsItem>>,
    news_by_platform: QueryCache<(String, i64), Vec<NewsItem>>,
    news_by_date_range: QueryCache<(DateTime<Utc>, DateTime<Utc>), Vec<NewsItem>>,
    rank_history: QueryCache<i64, Vec<RankHistory>>,
    platform_stats: QueryCache<Option<NaiveDate>, Vec<PlatformStat>>,
    keyword_stats: QueryCache<Option<NaiveDate>, Vec<KeywordStat>>,
    trend_data: QueryCache<u32, Vec<TrendData>>,
    rss_feeds: QueryCache<(), Vec<RssFeed>>,
    rss_items: QueryCache<(Option<String>, u32), Vec<RssItem>>,
}

impl Hooks {
    #[must_use]
    pub fn new(source: Arc<dyn TrendSource>, settings: HookSettings) -> Self {
        let (stale, gc) = (settings.stale_time, settings.gc_time);
        Self {
            source,
            settings,
            platforms: QueryCache::new("platforms", stale, gc),
            latest_news: QueryCache::new("latest_news", stale, gc),
            news_by_platform: QueryCache::new("news_by_platform", stale, gc),
            news_by_date_range: QueryCache::new("news_by_date_range", stale, gc),
            rank_history: QueryCache::new("rank_history", stale, gc),
            platform_stats: QueryCache::new("platform_stats", stale, gc),
            keyword_stats: QueryCache::new("keyword_stats", stale, gc),
            trend_data: QueryCache::new("trend_data", stale, gc),
            rss_feeds: QueryCache::new("rss_feeds", stale, gc),
            rss_items: QueryCache::new("rss_items", stale, gc),
        }
    }

    #[must_use]
    pub fn settings(&self) -> HookSettings {
        self.settings
    }

    async fn resolve<V>(&self, lookup: Lookup<V>) -> QueryState<V>
    where
        V: Clone + Send + Sync + 'static,
    {
        match lookup {
            Lookup::Fresh(value) | Lookup::Stale(value) => QueryState::Ready(value),
            Lookup::Failed(err) => QueryState::Failed(err),
            Lookup::Pending(fetch) => {
                match tokio::time::timeout(self.settings.render_budget, fetch).await {
                    Ok(Ok(value)) => QueryState::Ready(value),
                    Ok(Err(err)) => QueryState::Failed(err),
                    Err(_elapsed) => QueryState::Loading,
                }
            }
        }
    }

    pub async fn platforms(&self) -> QueryState<Vec<Platform>> {
        let source = Arc::clone(&self.source);
        let lookup = self
            .platforms
            .fetch((), move || async move { source.platforms().await });
        self.resolve(lookup).await
    }

    pub async fn latest_news(&self, limit: i64) -> QueryState<Vec<NewsItem>> {
        let source = Arc::clone(&self.source);
        let lookup = self
            .latest_news
            .fetch(limit, move || async move { source.latest_news(limit).await });
        self.resolve(lookup).await
    }

    /// Stays [`QueryState::Idle`] without fetching until `platform_id` is
    /// non-empty.
    pub async fn news_by_platform(&self, platform_id: &str, limit: i64) -> QueryState<Vec<NewsItem>> {
        if platform_id.is_empty() {
            return QueryState::Idle;
        }
        let source = Arc::clone(&self.source);
        let id = platform_id.to_string();
        let lookup = self
            .news_by_platform
            .fetch((id.clone(), limit), move || async move {
                source.news_by_platform(&id, limit).await
            });
        self.resolve(lookup).await
    }

    pub async fn news_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> QueryState<Vec<NewsItem>> {
        let source = Arc::clone(&self.source);
        let lookup = self
            .news_by_date_range
            .fetch((start, end), move || async move {
                source.news_by_date_range(start, end).await
            });
        self.resolve(lookup).await
    }

    pub async fn rank_history(&self, news_item_id: i64) -> QueryState<Vec<RankHistory>> {
        let source = Arc::clone(&self.source);
        let lookup = self.rank_history.fetch(news_item_id, move || async move {
            source.rank_history(news_item_id).await
        });
        self.resolve(lookup).await
    }

    pub async fn platform_stats(&self, date: Option<NaiveDate>) -> QueryState<Vec<PlatformStat>> {
        let source = Arc::clone(&self.source);
        let lookup = self
            .platform_stats
            .fetch(date, move || async move { source.platform_stats(date).await });
        self.resolve(lookup).await
    }

    pub async fn keyword_stats(&self, date: Option<NaiveDate>) -> QueryState<Vec<KeywordStat>> {
        let source = Arc::clone(&self.source);
        let lookup = self
            .keyword_stats
            .fetch(date, move || async move { source.keyword_stats(date).await });
        self.resolve(lookup).await
    }

    pub async fn trend_data(&self, days: u32) -> QueryState<Vec<TrendData>> {
        let source = Arc::clone(&self.source);
        let lookup = self
            .trend_data
            .fetch(days, move || async move { source.trend_data(days).await });
        self.resolve(lookup).await
    }

    pub async fn rss_feeds(&self) -> QueryState<Vec<RssFeed>> {
        let source = Arc::clone(&self.source);
        let lookup = self
            .rss_feeds
            .fetch((), move || async move { source.rss_feeds().await });
        self.resolve(lookup).await
    }

    /// `feed_id == None` reads across every feed.
    pub async fn rss_items(&self, feed_id: Option<&str>, limit: u32) -> QueryState<Vec<RssItem>> {
        let source = Arc::clone(&self.source);
        let feed = feed_id.map(str::to_string);
        let lookup = self
            .rss_items
            .fetch((feed.clone(), limit), move || async move {
                source.rss_items(feed.as_deref(), limit).await
            });
        self.resolve(lookup).await
    }

    /// Mounts the latest-news query: refetched every
    /// [`HookSettings::latest_news_interval`] until the subscription drops.
    pub fn subscribe_latest_news(&self, limit: i64) -> Subscription {
        let source = Arc::clone(&self.source);
        subscribe(
            &self.latest_news,
            limit,
            self.settings.latest_news_interval,
            move || {
                let source = Arc::clone(&source);
                async move { source.latest_news(limit).await }
            },
        )
    }

    /// Mounts the RSS items query: refetched every
    /// [`HookSettings::rss_items_interval`] until the subscription drops.
    pub fn subscribe_rss_items(&self, feed_id: Option<&str>, limit: u32) -> Subscription {
        let source = Arc::clone(&self.source);
        let feed = feed_id.map(str::to_string);
        subscribe(
            &self.rss_items,
            (feed.clone(), limit),
            self.settings.rss_items_interval,
            move || {
                let source = Arc::clone(&source);
                let feed = feed.clone();
                async move { source.rss_items(feed.as_deref(), limit).await }
            },
        )
    }
}

/// A mounted hook.
///
/// Owns the polling task and an observer on its key. Dropping it stops the
/// timer and, if it was the key's last observer, aborts any in-flight fetch.
pub struct Subscription {
    revisions: watch::Receiver<u64>,
    ticker: AbortHandle,
    _observer: ObserverGuard,
}

impl Subscription {
    /// Waits for the next interval refetch to settle. Returns `false` once
    /// the polling task is gone.
    pub async fn changed(&mut self) -> bool {
        self.revisions.changed().await.is_ok()
    }

    /// Number of interval refetches settled so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revisions.borrow()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

fn subscribe<K, V, F, Fut>(cache: &QueryCache<K, V>, key: K, every: Duration, fetcher: F) -> Subscription
where
    K: Clone + Eq + Hash + std::fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, DataError>> + Send + 'static,
{
    let observer = cache.observe(key.clone());
    let (tx, rx) = watch::channel(0_u64);
    let cache = cache.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            // Failures are logged by the cache task and kept in the entry.
            let _ = cache.refetch(key.clone(), &fetcher).await;
            tx.send_modify(|revision| *revision += 1);
        }
    });

    Subscription {
        revisions: rx,
        ticker: task.abort_handle(),
        _observer: observer,
    }
}

#[cfg(test)]
#[path = "hooks_test.rs"]
mod tests;
