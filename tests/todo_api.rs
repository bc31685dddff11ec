//! End-to-end tests for the todo HTTP API

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_service::api::create_app;
use todo_service::core::build_app_state;
use todo_service::storage::MemoryStore;
use todo_service::Config;

fn app() -> Router {
    app_with(Config::default())
}

fn app_with(config: Config) -> Router {
    let state = build_app_state(MemoryStore::new(), config).unwrap();
    create_app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, json)
}

async fn create(app: &Router, title: &str, completed: bool) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/todos",
        Some(json!({ "title": title, "description": "d", "completed": completed })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn create_assigns_sequential_ids() {
    let app = app();
    let first = create(&app, "Pytest Fixture", true).await;
    let second = create(&app, "Second", false).await;

    assert_eq!(first, json!({ "id": 1, "title": "Pytest Fixture", "description": "d", "completed": true }));
    assert_eq!(second["id"], 2);
}

#[tokio::test]
async fn create_overwrites_client_id() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/todos",
        Some(json!({ "id": 77, "title": "A", "description": "d", "completed": false })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], 1);
}

#[tokio::test]
async fn create_rejects_bad_bodies() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/todos", Some(json!({ "title": "A" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        Method::POST,
        "/todos",
        Some(json!({ "title": "A", "description": "d", "completed": false, "priority": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/todos",
        Some(json!({ "title": "A", "description": "d", "completed": "yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/todos")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was stored
    let (_, body) = send(&app, Method::GET, "/todos", None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn get_by_id_and_missing() {
    let app = app();
    create(&app, "A", false).await;

    let (status, body) = send(&app, Method::GET, "/todos/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "A");

    let (status, body) = send(&app, Method::GET, "/todos/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Todo with ID 9 not found.");

    let (status, _) = send(&app, Method::GET, "/todos/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_and_filter_by_query() {
    let app = app();
    create(&app, "A", true).await;
    create(&app, "B", false).await;
    create(&app, "C", true).await;

    let (_, body) = send(&app, Method::GET, "/todos", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, Method::GET, "/todos?completed=true", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);

    let (status, _) = send(&app, Method::GET, "/todos?colour=red", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_changes_only_given_fields() {
    let app = app();
    create(&app, "A", false).await;

    let (status, body) = send(&app, Method::PATCH, "/todos/1", Some(json!({ "completed": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "matched": 1, "modified": 1 }));

    let (_, body) = send(&app, Method::GET, "/todos/1", None).await;
    assert_eq!(body["data"], json!({ "id": 1, "title": "A", "description": "d", "completed": true }));

    let (status, body) = send(&app, Method::PUT, "/todos/5", Some(json!({ "completed": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "matched": 0, "modified": 0 }));

    let (status, _) = send(&app, Method::PATCH, "/todos/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PATCH, "/todos/1", Some(json!({ "id": 2, "title": "B" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn second_delete_is_not_found() {
    let app = app();
    for n in 0..5 {
        create(&app, &format!("todo {}", n), false).await;
    }

    let (status, body) = send(&app, Method::DELETE, "/todos/5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 1);

    let (status, body) = send(&app, Method::DELETE, "/todos/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn delete_all_twice_is_not_an_error() {
    let app = app();
    create(&app, "A", true).await;
    create(&app, "B", false).await;
    create(&app, "C", false).await;

    let (status, body) = send(&app, Method::DELETE, "/todos?completed=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 1);

    let (_, body) = send(&app, Method::DELETE, "/todos", None).await;
    assert_eq!(body["data"]["deleted"], 2);

    let (status, body) = send(&app, Method::DELETE, "/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], 0);

    // Numbering restarts on an empty collection
    assert_eq!(create(&app, "D", false).await["id"], 1);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let app = app();
    let handles: Vec<_> = (0..32)
        .map(|n| {
            let app = app.clone();
            tokio::spawn(async move { create(&app, &format!("todo {}", n), false).await["id"].as_i64().unwrap() })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=32).collect::<Vec<i64>>());
}

#[tokio::test]
async fn system_endpoints() {
    let app = app();
    create(&app, "A", false).await;
    send(&app, Method::GET, "/todos/42", None).await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["store_reachable"], true);

    let (status, body) = send(&app, Method::GET, "/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "todo-service");
    assert_eq!(body["data"]["namespace"], "todo_list_db.todo_list_collection");
    assert_eq!(body["data"]["store"], "localhost:27017");
    assert_eq!(body["data"]["id_allocation"], "atomic");

    let (status, body) = send(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("todo_operations_total{operation=\"create\",outcome=\"ok\"} 1"));
    assert!(text.contains("todo_operations_total{operation=\"get\",outcome=\"client_error\"} 1"));
}

#[tokio::test]
async fn metrics_route_can_be_disabled() {
    let mut config = Config::default();
    config.metrics.enabled = false;
    let app = app_with(config);

    let (status, _) = send(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
