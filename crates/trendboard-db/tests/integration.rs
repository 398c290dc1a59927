//! Offline unit tests for trendboard-db pool configuration and row conversions.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::{Duration, Utc};
use trendboard_core::{AppConfig, Environment, NewsItem, Platform, RankHistory};
use trendboard_db::{NewsItemRow, PlatformRow, PoolConfig, RankHistoryRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        api_base_url: "http://127.0.0.1:8000/api".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        http_timeout_secs: 30,
        user_agent: "ua".to_string(),
        stale_time_secs: 30,
        render_budget_ms: 2000,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn news_item_row_converts_to_domain_item() {
    let crawled = Utc::now();
    let row = NewsItemRow {
        id: 7,
        title: "全国多地迎来降雪".to_string(),
        platform_id: "weibo".to_string(),
        platform_name: Some("微博".to_string()),
        rank: 5,
        url: "https://weibo.com/5".to_string(),
        mobile_url: String::new(),
        hot_value: Some("2765万".to_string()),
        first_crawl_time: crawled - Duration::hours(2),
        last_crawl_time: crawled,
        crawl_count: 3,
        created_at: crawled - Duration::hours(2),
        updated_at: crawled,
    };

    let item = NewsItem::from(row);
    assert_eq!(item.id, 7);
    assert_eq!(item.platform_label(), "微博");
    assert_eq!(item.rank, 5);
    assert_eq!(item.crawl_count, 3);
    assert!(item.last_crawl_time >= item.first_crawl_time);
}

#[test]
fn news_item_without_join_labels_by_platform_id() {
    let now = Utc::now();
    let row = NewsItemRow {
        id: 1,
        title: "t".to_string(),
        platform_id: "zhihu".to_string(),
        platform_name: None,
        rank: 1,
        url: String::new(),
        mobile_url: String::new(),
        hot_value: None,
        first_crawl_time: now,
        last_crawl_time: now,
        crawl_count: 1,
        created_at: now,
        updated_at: now,
    };
    assert_eq!(NewsItem::from(row).platform_label(), "zhihu");
}

#[test]
fn platform_and_history_rows_convert() {
    let now = Utc::now();
    let platform = Platform::from(PlatformRow {
        id: "baidu".to_string(),
        name: "百度".to_string(),
        is_active: true,
        updated_at: now,
    });
    assert_eq!(platform.name, "百度");

    let history = RankHistory::from(RankHistoryRow {
        id: 1,
        news_item_id: 9,
        rank: 2,
        crawl_time: now,
        created_at: now,
    });
    assert_eq!(history.news_item_id, 9);
    assert_eq!(history.rank, 2);
}
