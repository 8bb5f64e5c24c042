//! HTTP contract of the widgets API, exercised over the wire.

mod common;

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};

use common::TestServer;
use widgets_rs::config::ServerConfig;

async fn post(http: &reqwest::Client, url: &str, body: Value) -> (StatusCode, Value) {
    let response = http.post(url).json(&body).send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn put(http: &reqwest::Client, url: &str, body: Value) -> (StatusCode, Value) {
    let response = http.put(url).json(&body).send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn get(http: &reqwest::Client, url: &str) -> (StatusCode, Value) {
    let response = http.get(url).send().await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

fn field_errors(body: &Value) -> Vec<(String, String)> {
    body["details"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            (
                e["field"].as_str().unwrap().to_string(),
                e["message"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let (status, created) = post(
        &http,
        &server.api("/widget-a"),
        json!({"name": "Sprocket", "description": "A toothed wheel"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Sprocket");
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_string());

    let (status, fetched) = get(&http, &server.api("/widget-a/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    server.stop().await;
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    post(&http, &server.api("/widget-a"), json!({"name": "Gear"})).await;

    let response = http.delete(server.api("/widget-a/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, body) = get(&http, &server.api("/widget-a/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["message"], "WidgetA not found");
    assert!(body["requestId"].is_string());

    let response = http.delete(server.api("/widget-a/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = http.delete(server.api("/widget-b/7")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pagination_counts_are_consistent() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let mut created_ids = Vec::new();
    for i in 0..23 {
        let (_, body) = post(&http, &server.api("/widget-a"), json!({"name": format!("w{i}")})).await;
        created_ids.push(body["id"].as_i64().unwrap());
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let (status, body) =
            get(&http, &server.api(&format!("/widget-a?page={page}&limit=10"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 23);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["page"], page);
        assert_eq!(body["pageSize"], 10);
        seen.extend(body["items"].as_array().unwrap().iter().map(|w| w["id"].as_i64().unwrap()));
    }
    assert_eq!(seen, created_ids);

    // Past the end: empty items, same totals
    let (_, body) = get(&http, &server.api("/widget-a?page=9&limit=10")).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["total"], 23);

    // Defaults
    let (_, body) = get(&http, &server.api("/widget-a")).await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
}

#[tokio::test]
async fn test_bad_pagination_rejected() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    for query in ["page=0", "limit=0", "limit=101", "page=abc"] {
        let (status, body) = get(&http, &server.api(&format!("/widget-b?{query}"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert!(
            body["code"] == "VALIDATION_ERROR" || body["code"] == "BAD_REQUEST",
            "{query}: {body}"
        );
    }
}

#[tokio::test]
async fn test_validation_messages_and_boundaries() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();
    let url = server.api("/widget-a");

    let (status, body) = post(&http, &url, json!({"name": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(field_errors(&body), vec![("name".into(), "Name is required".into())]);

    let (_, body) = post(&http, &url, json!({})).await;
    assert_eq!(field_errors(&body), vec![("name".into(), "Name is required".into())]);

    let (_, body) = post(&http, &url, json!({"name": "n".repeat(51)})).await;
    assert_eq!(
        field_errors(&body),
        vec![("name".into(), "Name must be 50 characters or less".into())]
    );

    let (_, body) = post(&http, &url, json!({"name": "ok", "description": "d".repeat(201)})).await;
    assert_eq!(
        field_errors(&body),
        vec![("description".into(), "Description must be 200 characters or less".into())]
    );

    let (status, _) = post(
        &http,
        &url,
        json!({"name": "n".repeat(50), "description": "d".repeat(200)}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Counted in characters, not bytes
    let (status, _) = post(&http, &url, json!({"name": "é".repeat(50)})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = put(&http, &server.api("/widget-a/1"), json!({"name": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_errors(&body), vec![("name".into(), "Name is required".into())]);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let response = http
        .post(server.api("/widget-a"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_partial_update() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    post(
        &http,
        &server.api("/widget-a"),
        json!({"name": "Gear", "description": "round"}),
    )
    .await;

    let (status, body) = put(&http, &server.api("/widget-a/1"), json!({"name": "Big gear"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Big gear");
    assert_eq!(body["description"], "round");

    let (_, body) = put(&http, &server.api("/widget-a/1"), json!({"description": null})).await;
    assert_eq!(body["name"], "Big gear");
    assert_eq!(body["description"], Value::Null);

    let (status, body) = put(&http, &server.api("/widget-a/1"), json!({"name": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["errors"][0]["field"], "name");
    assert_eq!(body["details"]["errors"][0]["message"], "Name is required");

    let (status, body) = put(&http, &server.api("/widget-a/99"), json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "WidgetA not found");
}

#[tokio::test]
async fn test_widget_b_references_and_detach_on_delete() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    post(&http, &server.api("/widget-a"), json!({"name": "Parent"})).await;
    let (status, child) = post(
        &http,
        &server.api("/widget-b"),
        json!({"name": "Child", "widgetAId": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(child["widgetAId"], 1);

    let (_, orphan) = post(&http, &server.api("/widget-b"), json!({"name": "Orphan"})).await;
    assert_eq!(orphan["widgetAId"], Value::Null);

    let (status, body) = post(
        &http,
        &server.api("/widget-b"),
        json!({"name": "Dangling", "widget_a_id": 42}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field_errors(&body)[0].0, "widgetAId");

    let (_, filtered) = get(&http, &server.api("/widget-b?widgetAId=1")).await;
    assert_eq!(filtered["total"], 1);
    let (_, children) = get(&http, &server.api("/widget-a/1/widget-b")).await;
    assert_eq!(children["items"][0]["name"], "Child");

    let response = http.delete(server.api("/widget-a/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, child) = get(&http, &server.api("/widget-b/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(child["widgetAId"], Value::Null);

    let (status, _) = get(&http, &server.api("/widget-a/1/widget-b")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, filtered) = get(&http, &server.api("/widget-b?widgetAId=1")).await;
    assert_eq!(filtered["total"], 0);
}

#[tokio::test]
async fn test_widget_b_reattach_and_detach_by_update() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    post(&http, &server.api("/widget-a"), json!({"name": "First"})).await;
    post(&http, &server.api("/widget-a"), json!({"name": "Second"})).await;
    post(&http, &server.api("/widget-b"), json!({"name": "Cog", "widgetAId": 1})).await;

    let (_, body) = put(&http, &server.api("/widget-b/1"), json!({"widgetAId": 2})).await;
    assert_eq!(body["widgetAId"], 2);

    let (_, body) = put(&http, &server.api("/widget-b/1"), json!({"name": "Cog 2"})).await;
    assert_eq!(body["widgetAId"], 2);

    let (_, body) = put(&http, &server.api("/widget-b/1"), json!({"widgetAId": null})).await;
    assert_eq!(body["widgetAId"], Value::Null);
    assert_eq!(body["name"], "Cog 2");
}

#[tokio::test]
async fn test_request_id_propagated() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let response = http
        .get(server.api("/widget-a/5"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["requestId"], "trace-me-123");

    let response = http.get(server.url("/health/live")).send().await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_health_root_and_openapi() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let (status, body) = get(&http, &server.url("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "0.0.0-test");
    assert_eq!(body["checks"]["storage"]["status"], "healthy");

    let response = http.get(server.url("/health/ready")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, body) = get(&http, &server.url("/")).await;
    assert_eq!(body["message"], "Welcome to the widgets API (memory backend)");

    let (status, doc) = get(&http, &server.url("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/widgets/widget-b/{id}"].is_object());
    assert!(doc["paths"]["/api/logging/level"]["put"].is_object());

    // The test server installs no reloadable logger
    let (status, body) = get(&http, &server.url("/api/logging/level")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unknown_route_gets_error_body() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    let (status, body) = get(&http, &server.url("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["requestId"].is_string());
}

#[tokio::test]
async fn test_cors_preflight_for_configured_origin() {
    let server = TestServer::with_router(ServerConfig {
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout: 5,
        ..Default::default()
    })
    .await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    let response = http
        .request(reqwest::Method::OPTIONS, server.api("/widget-a"))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let response = http
        .get(server.api("/widget-a"))
        .header("origin", "http://evil.example")
        .send()
        .await
        .unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
