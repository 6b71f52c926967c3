//! Integration tests for the stub comments service
//!
//! Drives the router in-process: seed fixtures, hit the mimicked endpoints,
//! and check the canned payloads the acceptance tests depend on.

use std::net::{Ipv4Addr, SocketAddr};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use proctor::stub::{StubConfig, StubService, router};

fn seeded_router() -> Router {
    let config: StubConfig = serde_json::from_value(json!({
        "threads": {
            "t1": {
                "id": "t1",
                "title": "Problem with the lab write-up",
                "commentable_id": "physics101",
                "children": [{"id": "c1"}, {"id": "c2"}, {"id": "c3"}],
            },
            "t2": {
                "id": "t2",
                "title": "Reading list?",
                "commentable_id": "lit202",
            },
        },
        "comments": {
            "c9": {"id": "c9", "body": "a comment"},
        },
    }))
    .unwrap();
    router(config)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK, "GET {uri}");
    serde_json::from_slice(&body).unwrap()
}

async fn get_status(app: &Router, uri: &str) -> StatusCode {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await.0
}

fn put_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_user_payload() {
    let app = seeded_router();

    let body = get_json(&app, "/api/v1/users/42").await;
    assert_eq!(
        body,
        json!({
            "id": "42",
            "upvoted_ids": [],
            "downvoted_ids": [],
            "subscribed_thread_ids": [],
        })
    );
}

#[tokio::test]
async fn test_user_payload_with_course_counts() {
    let app = seeded_router();

    let body = get_json(&app, "/api/v1/users/42?course_id=physics101").await;
    assert_eq!(body["threads_count"], json!(1));
    assert_eq!(body["comments_count"], json!(2));
}

#[tokio::test]
async fn test_threads_listing_is_an_empty_page() {
    let app = seeded_router();

    let body = get_json(&app, "/api/v1/threads").await;
    assert_eq!(body, json!({"collection": [], "page": 1, "num_pages": 1}));
}

#[tokio::test]
async fn test_thread_returned_as_configured() {
    let app = seeded_router();

    let body = get_json(&app, "/api/v1/threads/t1").await;
    assert_eq!(body["title"], json!("Problem with the lab write-up"));
    // Without recursive=True the children are untouched
    assert_eq!(body["children"].as_array().unwrap().len(), 3);
    assert!(body.get("resp_total").is_none());
}

#[tokio::test]
async fn test_thread_recursive_windows_children() {
    let app = seeded_router();

    let body = get_json(
        &app,
        "/api/v1/threads/t1?recursive=True&resp_skip=1&resp_limit=1",
    )
    .await;
    assert_eq!(body["children"], json!([{"id": "c2"}]));
    // resp_total reflects the count before windowing
    assert_eq!(body["resp_total"], json!(3));
}

#[tokio::test]
async fn test_thread_recursive_defaults_children() {
    let app = seeded_router();

    let body = get_json(&app, "/api/v1/threads/t2?recursive=True").await;
    assert_eq!(body["children"], json!([]));
    assert_eq!(body["resp_total"], json!(0));
}

#[tokio::test]
async fn test_unknown_thread_is_404() {
    let app = seeded_router();
    assert_eq!(
        get_status(&app, "/api/v1/threads/missing").await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_comment_lookup() {
    let app = seeded_router();

    let body = get_json(&app, "/api/v1/comments/c9").await;
    assert_eq!(body["body"], json!("a comment"));

    assert_eq!(
        get_status(&app, "/api/v1/comments/missing").await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_commentable_threads_filter_by_id() {
    let app = seeded_router();

    let body = get_json(&app, "/api/v1/physics101/threads").await;
    let collection = body["collection"].as_array().unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(collection[0]["id"], json!("t1"));
    assert_eq!(body["page"], json!(1));
    assert_eq!(body["num_pages"], json!(1));

    let empty = get_json(&app, "/api/v1/ghost_course/threads").await;
    assert_eq!(empty["collection"], json!([]));
}

#[tokio::test]
async fn test_active_threads_404_until_configured() {
    let app = seeded_router();
    assert_eq!(
        get_status(&app, "/api/v1/users/42/active_threads").await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_set_config_then_paginated_active_threads() {
    let app = seeded_router();

    let threads: Vec<Value> = (0..25).map(|i| json!({"id": format!("at{i}")})).collect();
    let (status, _) = send(
        &app,
        put_json("/set_config", &json!({"active_threads": threads})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let body = get_json(&app, "/api/v1/users/42/active_threads?page=2&per_page=10").await;
    let collection = body["collection"].as_array().unwrap();
    assert_eq!(collection.len(), 10);
    assert_eq!(collection[0]["id"], json!("at10"));
    assert_eq!(body["page"], json!(2));
    assert_eq!(body["num_pages"], json!(3));
}

#[tokio::test]
async fn test_set_config_replaces_a_section() {
    let app = seeded_router();

    let (status, _) = send(
        &app,
        put_json(
            "/set_config",
            &json!({"threads": {"t9": {"id": "t9", "title": "fresh"}}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Old threads are gone, the new one answers
    assert_eq!(
        get_status(&app, "/api/v1/threads/t1").await,
        StatusCode::NOT_FOUND
    );
    let body = get_json(&app, "/api/v1/threads/t9").await;
    assert_eq!(body["title"], json!("fresh"));

    // Untouched sections survive the update
    let config = get_json(&app, "/get_config").await;
    assert_eq!(config["comments"]["c9"]["body"], json!("a comment"));
}

#[tokio::test]
async fn test_delete_acknowledges_with_empty_object() {
    let app = seeded_router();

    for uri in ["/api/v1/threads/t1", "/api/v1/comments/c9", "/not/a/route"] {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK, "DELETE {uri}");
        let value: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({}));
    }
}

#[tokio::test]
async fn test_put_outside_set_config_is_accepted_and_ignored() {
    let app = seeded_router();

    for uri in ["/api/v1/threads/t1", "/somewhere/else"] {
        let request = Request::builder()
            .method("PUT")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT, "PUT {uri}");
        assert!(body.is_empty());
    }

    // The fixtures were not disturbed
    let body = get_json(&app, "/api/v1/threads/t1").await;
    assert_eq!(body["id"], json!("t1"));
}

#[tokio::test]
async fn test_bound_service_answers_over_tcp() {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
    let service = StubService::bind(addr, StubConfig::default()).await.unwrap();

    let mut stream = tokio::net::TcpStream::connect(service.local_addr())
        .await
        .unwrap();
    stream
        .write_all(b"GET /api/v1/threads HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let response = String::from_utf8(response).unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains(r#""collection":[]"#), "{response}");
}

#[tokio::test]
async fn test_unknown_path_is_404_with_plain_body() {
    let app = seeded_router();

    let request = Request::builder()
        .uri("/api/v2/resource")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(String::from_utf8(body).unwrap(), "404 Not Found");
}
