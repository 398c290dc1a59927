use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use futures::StreamExt;
use tower::ServiceExt;

use super::*;
use crate::hooks::HookSettings;
use crate::source::fake::{self, FakeSource};

fn sample_source() -> FakeSource {
    FakeSource {
        platforms: vec![fake::platform("weibo", "微博"), fake::platform("zhihu", "知乎")],
        news: vec![
            fake::news(1, "weibo", 2, fake::at(9)),
            fake::news(2, "weibo", 1, fake::at(10)),
            fake::news(3, "zhihu", 1, fake::at(11)),
        ],
        platform_stats: vec![
            fake::platform_stat("weibo", "微博", 50),
            fake::platform_stat("zhihu", "知乎", 50),
        ],
        keyword_stats: vec![fake::keyword("AI", 12, &["weibo", "zhihu"])],
        trends: vec![fake::trend(26, 90), fake::trend(27, 100)],
        feeds: vec![fake::feed("hn", "Hacker News")],
        rss: vec![fake::rss_item(1, "hn", fake::at(8))],
        ..FakeSource::default()
    }
}

fn app_with(source: FakeSource) -> (Router, Arc<FakeSource>) {
    let source = Arc::new(source);
    let config = fake::config();
    let settings = HookSettings {
        latest_news_interval: Duration::from_millis(20),
        ..HookSettings::from_app_config(&config)
    };
    let dyn_source: Arc<dyn TrendSource> = source.clone();
    let state = AppState {
        hooks: Hooks::new(Arc::clone(&dyn_source), settings),
        source: dyn_source,
        config: Arc::new(config),
    };
    (build_app(state), source)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).expect("json parse");
    (status, json)
}

#[test]
fn api_error_validation_error_maps_to_bad_request() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_renders_inside_the_layout() {
    let (app, _) = app_with(sample_source());
    let (status, json) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    let page = &json["data"];
    assert_eq!(page["layout"]["title"], "TrendRadar Dashboard");
    assert_eq!(page["layout"]["nav"][0]["active"], true);
    assert_eq!(page["heading"], "Overview");
    assert_eq!(page["content"]["cards"][0]["value"]["data"], 3);
    assert_eq!(page["content"]["cards"][2]["value"]["data"], 100);
    assert_eq!(page["content"]["latest"]["status"], "ready");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn unknown_paths_redirect_to_the_dashboard() {
    let (app, _) = app_with(sample_source());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/does/not/exist")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
        Some(b"/".as_slice())
    );
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app_with(sample_source());
    let (status, json) = get_json(app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
}

#[tokio::test]
async fn responses_echo_the_request_id() {
    let (app, _) = app_with(sample_source());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/settings")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).map(|v| v.as_bytes()),
        Some(b"req-42".as_slice())
    );
}

#[tokio::test]
async fn platform_query_selects_the_detail_list() {
    let (app, source) = app_with(sample_source());
    let (status, json) = get_json(app, "/platforms?platform=weibo").await;

    assert_eq!(status, StatusCode::OK);
    let content = &json["data"]["content"];
    assert_eq!(content["detail_title"], "微博");
    assert_eq!(content["detail"]["kind"], "view");
    assert_eq!(content["detail"]["state"]["data"][0]["rank"], "#1");
    assert_eq!(source.calls("news_by_platform(weibo,20)"), 1);
}

#[tokio::test]
async fn aggregation_outage_fails_only_its_blocks() {
    let (app, _) = app_with(FakeSource {
        stats_down: true,
        ..sample_source()
    });
    let (status, json) = get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    let content = &json["data"]["content"];
    assert_eq!(content["platform_share"]["status"], "failed");
    assert_eq!(content["trend"]["status"], "failed");
    assert_eq!(content["latest"]["status"], "ready");
}

#[tokio::test]
async fn malformed_history_query_is_a_bad_request() {
    let (app, source) = app_with(sample_source());
    let (status, json) = get_json(app, "/history?news_item_id=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(source.calls("rank_history"), 0);
}

#[tokio::test]
async fn malformed_rss_stream_query_is_a_json_bad_request() {
    let (app, source) = app_with(sample_source());
    let (status, json) = get_json(app, "/events/rss?feed=hn&feed=lobsters").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
    assert!(json["meta"]["request_id"].is_string());
    assert_eq!(source.calls("rss_items"), 0);
}

#[tokio::test]
async fn inverted_history_range_renders_a_failed_block() {
    let (app, source) = app_with(sample_source());
    let (status, json) = get_json(
        app,
        "/history?start=2025-01-27T12:00:00Z&end=2025-01-27T08:00:00Z",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let content = &json["data"]["content"];
    assert_eq!(content["rank_chart"]["kind"], "prompt");
    assert_eq!(content["range"]["state"]["status"], "failed");
    assert_eq!(source.calls("news_by_date_range"), 0);
}

#[tokio::test]
async fn rss_page_with_empty_feed_reads_all_feeds() {
    let (app, source) = app_with(sample_source());
    let (status, json) = get_json(app, "/rss?feed=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["content"]["items_title"], "All feeds");
    assert_eq!(source.call_log().iter().filter(|c| *c == "rss_items(None,50)").count(), 1);
}

#[tokio::test]
async fn settings_page_hides_the_database_url() {
    let (app, _) = app_with(sample_source());
    let (status, json) = get_json(app, "/settings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["content"]["database"], "configured");
    assert!(!json.to_string().contains("s3cret"));
}

#[tokio::test]
async fn dashboard_stream_sends_the_page_then_refetches() {
    let (app, source) = app_with(sample_source());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/events/dashboard")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(b"text/event-stream".as_slice())
    );

    let mut body = response.into_body().into_data_stream();
    let first = body.next().await.expect("first event").expect("bytes");
    let first = String::from_utf8_lossy(&first);
    assert!(first.starts_with("event: dashboard\n"), "{first}");
    assert!(first.contains("TrendRadar Dashboard"), "{first}");

    source.wait_for_calls("latest_news", 2).await;
    drop(body);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let after_drop = source.calls("latest_news");
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.calls("latest_news"), after_drop);
}
