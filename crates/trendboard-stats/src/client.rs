//! HTTP client for the aggregation service's read endpoints.
//!
//! Every endpoint returns a JSON list. The client checks the HTTP status,
//! unwraps the optional `{"data": ...}` envelope and deserializes into the
//! `trendboard-core` entity types. It keeps no state between calls.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use trendboard_core::{KeywordStat, PlatformStat, RssFeed, RssItem, TrendData};

use crate::error::AggregationError;
use crate::types::ListPayload;

/// Client for the aggregation service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    base_url: Url,
}

impl StatsClient {
    /// Creates a client rooted at `base_url` (e.g. `http://127.0.0.1:8000/api`).
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AggregationError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, AggregationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so relative joins append to the base
        // path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| AggregationError::InvalidBaseUrl {
            base: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// The normalised base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-platform totals, optionally for a single day.
    ///
    /// # Errors
    ///
    /// - [`AggregationError::Http`] on network failure or timeout.
    /// - [`AggregationError::UnexpectedStatus`] on a non-2xx response.
    /// - [`AggregationError::Deserialize`] if the body does not match.
    pub async fn platform_stats(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<PlatformStat>, AggregationError> {
        let date = date.map(|d| d.format("%Y-%m-%d").to_string());
        let mut params = Vec::new();
        if let Some(d) = &date {
            params.push(("date", d.as_str()));
        }
        self.get_list(&self.build_url("stats/platforms", &params)?)
            .await
    }

    /// Keyword frequencies, most frequent first, optionally for a single day.
    ///
    /// # Errors
    ///
    /// Same as [`StatsClient::platform_stats`].
    pub async fn keyword_stats(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<Vec<KeywordStat>, AggregationError> {
        let date = date.map(|d| d.format("%Y-%m-%d").to_string());
        let mut params = Vec::new();
        if let Some(d) = &date {
            params.push(("date", d.as_str()));
        }
        self.get_list(&self.build_url("stats/keywords", &params)?)
            .await
    }

    /// Daily item counts for the last `days` days, oldest first.
    ///
    /// # Errors
    ///
    /// Same as [`StatsClient::platform_stats`].
    pub async fn trend_data(&self, days: u32) -> Result<Vec<TrendData>, AggregationError> {
        let days = days.to_string();
        self.get_list(&self.build_url("stats/trends", &[("days", &days)])?)
            .await
    }

    /// All configured RSS feeds.
    ///
    /// # Errors
    ///
    /// Same as [`StatsClient::platform_stats`].
    pub async fn rss_feeds(&self) -> Result<Vec<RssFeed>, AggregationError> {
        self.get_list(&self.build_url("rss/feeds", &[])?).await
    }

    /// Up to `limit` RSS items, newest first. `None` means every feed.
    ///
    /// # Errors
    ///
    /// Same as [`StatsClient::platform_stats`].
    pub async fn rss_items(
        &self,
        feed_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<RssItem>, AggregationError> {
        let limit = limit.to_string();
        let mut params = Vec::with_capacity(2);
        if let Some(feed) = feed_id {
            params.push(("feed_id", feed));
        }
        params.push(("limit", limit.as_str()));
        self.get_list(&self.build_url("rss/items", &params)?).await
    }

    /// Joins `path` onto the base URL and appends percent-encoded query pairs.
    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, AggregationError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| AggregationError::InvalidBaseUrl {
                base: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_list<T: DeserializeOwned>(&self, url: &Url) -> Result<Vec<T>, AggregationError> {
        let body = self.request_text(url).await?;
        let payload: ListPayload<T> =
            serde_json::from_str(&body).map_err(|e| AggregationError::Deserialize {
                context: url.path().to_string(),
                source: e,
            })?;
        let items = payload.into_vec();
        tracing::debug!(url = %url, count = items.len(), "aggregation response");
        Ok(items)
    }

    /// Sends a GET request and returns the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::Http`] on network failure, or
    /// [`AggregationError::UnexpectedStatus`] for any non-2xx status.
    async fn request_text(&self, url: &Url) -> Result<String, AggregationError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "aggregation request failed");
            return Err(AggregationError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
