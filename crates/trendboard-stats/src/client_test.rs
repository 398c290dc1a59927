use super::*;

fn test_client(base_url: &str) -> StatsClient {
    StatsClient::with_base_url(base_url, 30, "trendboard-test")
        .expect("client construction should not fail")
}

#[test]
fn build_url_keeps_base_path() {
    let client = test_client("http://127.0.0.1:8000/api");
    let url = client
        .build_url("stats/trends", &[("days", "7")])
        .expect("url");
    assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/stats/trends?days=7");
}

#[test]
fn build_url_strips_trailing_slash() {
    let client = test_client("http://127.0.0.1:8000/api///");
    let url = client.build_url("rss/feeds", &[]).expect("url");
    assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/rss/feeds");
}

#[test]
fn build_url_encodes_special_characters() {
    let client = test_client("http://stats.local");
    let url = client
        .build_url("rss/items", &[("feed_id", "a&b c"), ("limit", "50")])
        .expect("url");
    assert!(
        url.as_str().contains("feed_id=a%26b+c") || url.as_str().contains("feed_id=a%26b%20c"),
        "query param should be percent-encoded: {url}"
    );
    assert!(url.as_str().ends_with("&limit=50"));
}

#[test]
fn relative_base_is_rejected() {
    let err = StatsClient::with_base_url("/api", 30, "ua").expect_err("relative base");
    assert!(matches!(err, AggregationError::InvalidBaseUrl { .. }));
}
