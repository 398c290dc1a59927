pub mod app_config;
pub mod colors;
pub mod config;
pub mod format;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use colors::{color_by_index, platform_color, PALETTE, PLATFORM_COLORS};
pub use config::{load_app_config, load_app_config_from_env};
pub use format::{format_date, format_relative_time, truncate_text};
pub use types::{
    KeywordStat, NewsItem, Platform, PlatformStat, RankHistory, RssFeed, RssItem, TrendData,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
