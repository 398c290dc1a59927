use serde::Serialize;
use trendboard_core::AppConfig;

use crate::hooks::HookSettings;

/// Effective configuration, read-only. Never carries the database URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub environment: String,
    pub aggregation_base_url: String,
    pub database: &'static str,
    pub stale_time_secs: u64,
    pub render_budget_ms: u64,
    pub latest_news_refresh_secs: u64,
    pub rss_items_refresh_secs: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

#[must_use]
pub fn render(config: &AppConfig, hooks: HookSettings) -> SettingsView {
    SettingsView {
        environment: config.env.to_string(),
        aggregation_base_url: config.api_base_url.clone(),
        database: if config.database_url.is_empty() {
            "not configured"
        } else {
            "configured"
        },
        stale_time_secs: hooks.stale_time.as_secs(),
        render_budget_ms: u64::try_from(hooks.render_budget.as_millis()).unwrap_or(u64::MAX),
        latest_news_refresh_secs: hooks.latest_news_interval.as_secs(),
        rss_items_refresh_secs: hooks.rss_items_interval.as_secs(),
        http_timeout_secs: config.http_timeout_secs,
        user_agent: config.user_agent.clone(),
    }
}
