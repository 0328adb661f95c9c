//! End-to-end dispatch tests: the full tool surface wired to a mocked
//! upstream content service.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blogrelay_client::{BloggerClient, BloggerClientConfig};
use blogrelay_server::{Dispatcher, TelemetrySink, ToolRegistry, tools};

const TOOL_NAMES: [&str; 11] = [
    "list_blogs",
    "get_blog",
    "create_blog",
    "list_posts",
    "search_posts",
    "get_post",
    "create_post",
    "update_post",
    "delete_post",
    "list_labels",
    "get_label",
];

async fn stack_for(server: &MockServer) -> (Dispatcher, Arc<TelemetrySink>) {
    let client = Arc::new(
        BloggerClient::new(BloggerClientConfig {
            api_key: "test-key".into(),
            base_url: server.uri(),
            default_max_results: 10,
            timeout: Duration::from_secs(5),
        })
        .expect("client construction"),
    );
    let mut registry = ToolRegistry::new();
    tools::register_all(&mut registry, client).expect("tool registration");
    let telemetry = Arc::new(TelemetrySink::new("http", registry.tool_names()));
    (Dispatcher::new(registry, telemetry.clone()), telemetry)
}

#[tokio::test]
async fn usage_keys_match_the_declared_surface_at_startup() {
    let server = MockServer::start().await;
    let (dispatcher, telemetry) = stack_for(&server).await;

    assert_eq!(dispatcher.tool_names(), TOOL_NAMES);

    let stats = telemetry.stats();
    assert_eq!(stats.tool_usage.len(), TOOL_NAMES.len());
    for name in TOOL_NAMES {
        assert_eq!(stats.tool_usage[name], 0, "{name} must start at zero");
    }
}

#[tokio::test]
async fn search_posts_returns_matching_subset_through_the_dispatcher() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blogs/b1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "p1", "blogId": "b1", "title": "Hello World", "content": "..."},
                {"id": "p2", "blogId": "b1", "title": "Other", "content": "says hello"},
                {"id": "p3", "blogId": "b1", "title": "Nope", "content": "nothing"},
            ],
        })))
        .mount(&server)
        .await;

    let (dispatcher, telemetry) = stack_for(&server).await;
    let response = dispatcher
        .dispatch("search_posts", json!({"blogId": "b1", "query": "hello"}))
        .await;

    let ids: Vec<_> = response["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["p1", "p2"]);

    let stats = telemetry.stats();
    assert_eq!(stats.tool_usage["search_posts"], 1);
    assert_eq!(stats.successful_requests, 1);
}

#[tokio::test]
async fn list_labels_aggregates_distinct_labels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blogs/b1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "p1", "blogId": "b1", "title": "1", "content": "", "labels": ["a", "b"]},
                {"id": "p2", "blogId": "b1", "title": "2", "content": "", "labels": ["b", "c"]},
            ],
        })))
        .mount(&server)
        .await;

    let (dispatcher, _telemetry) = stack_for(&server).await;
    let response = dispatcher.dispatch("list_labels", json!({"blogId": "b1"})).await;
    assert_eq!(
        response,
        json!({"labels": [{"name": "a"}, {"name": "b"}, {"name": "c"}]})
    );
}

#[tokio::test]
async fn get_label_miss_surfaces_as_execution_error_and_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blogs/b1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let (dispatcher, telemetry) = stack_for(&server).await;
    let response = dispatcher
        .dispatch("get_label", json!({"blogId": "b1", "labelName": "missing"}))
        .await;
    assert_eq!(
        response,
        json!({"error": "execution error: label 'missing' not found"})
    );

    let stats = telemetry.stats();
    assert_eq!(stats.failed_requests, 1);
    assert_eq!(stats.tool_usage["get_label"], 1);
}

#[tokio::test]
async fn create_blog_dispatch_returns_envelope_without_upstream_traffic() {
    let server = MockServer::start().await;
    let (dispatcher, telemetry) = stack_for(&server).await;

    let response = dispatcher
        .dispatch("create_blog", json!({"name": "New Blog"}))
        .await;
    assert_eq!(response["error"], true);
    assert!(response["suggestedAction"].as_str().is_some());

    assert!(server.received_requests().await.unwrap().is_empty());

    // The simulated call is a successful dispatch with real latency
    let stats = telemetry.stats();
    assert_eq!(stats.successful_requests, 1);
    assert_eq!(stats.tool_usage["create_blog"], 1);
    assert!(stats.average_response_time >= 400);
}

#[tokio::test]
async fn validation_failures_change_no_counters() {
    let server = MockServer::start().await;
    let (dispatcher, telemetry) = stack_for(&server).await;

    let response = dispatcher.dispatch("get_blog", json!({})).await;
    assert!(
        response["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid parameters:")
    );

    let response = dispatcher
        .dispatch("get_post", json!({"blogId": "b1", "postId": 7}))
        .await;
    assert!(
        response["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid parameters:")
    );

    let stats = telemetry.stats();
    assert_eq!(stats.total_requests, 0);
    assert!(stats.tool_usage.values().all(|&count| count == 0));
}

#[tokio::test]
async fn upstream_failure_is_forwarded_inside_the_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blogs/b1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "The API key is invalid."},
        })))
        .mount(&server)
        .await;

    let (dispatcher, telemetry) = stack_for(&server).await;
    let response = dispatcher.dispatch("get_blog", json!({"blogId": "b1"})).await;
    assert_eq!(
        response,
        json!({"error": "execution error: upstream request failed (403): The API key is invalid."})
    );
    assert_eq!(telemetry.stats().failed_requests, 1);
}

#[tokio::test]
async fn delete_post_reports_success_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/blogs/b1/posts/p1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let (dispatcher, _telemetry) = stack_for(&server).await;
    let response = dispatcher
        .dispatch("delete_post", json!({"blogId": "b1", "postId": "p1"}))
        .await;
    assert_eq!(
        response,
        json!({"success": true, "message": "post p1 deleted"})
    );
}
