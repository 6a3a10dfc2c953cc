//! End-to-end tests of the HTTP surface, driving the real router over an
//! isolated temp-file store.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use pick_a_date::{
    app,
    service::IdeaService,
    storage::FileStore,
    types::Idea,
};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestServer {
    router: Router,
    _dir: tempfile::TempDir,
}

fn server_with(ideas: Value) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let template: PathBuf = dir.path().join("template.json");
    std::fs::write(&template, json!({ "ideas": ideas }).to_string()).unwrap();

    let store = FileStore::new(dir.path().join("data.json"), template);
    let service = Arc::new(IdeaService::with_rng(store, StdRng::seed_from_u64(7)));
    TestServer {
        router: app(service, None),
        _dir: dir,
    }
}

fn fresh_ideas(count: usize) -> Value {
    Value::Array(
        (1..=count)
            .map(|n| {
                json!({
                    "id": n.to_string(),
                    "idea": format!("Idea {n}"),
                    "lastShown": null,
                    "lastCompleted": null
                })
            })
            .collect(),
    )
}

async fn send(server: &TestServer, request: Request<Body>) -> (StatusCode, Value) {
    let response = server.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

fn post(path: &str) -> Request<Body> {
    Request::post(path).body(Body::empty()).unwrap()
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::post(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(path: &str, body: Value) -> Request<Body> {
    Request::put(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(path: &str) -> Request<Body> {
    Request::delete(path).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server_with(fresh_ideas(0));
    let (status, body) = send(&server, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn list_returns_all_ideas() {
    let server = server_with(fresh_ideas(4));
    let (status, body) = send(&server, get("/api/ideas")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);
    assert_eq!(body[0]["idea"], "Idea 1");
}

#[tokio::test]
async fn pick_returns_three_distinct_eligible_ideas() {
    let server = server_with(fresh_ideas(5));
    let (status, body) = send(&server, get("/api/ideas/pick")).await;
    assert_eq!(status, StatusCode::OK);

    let picked: Vec<Idea> = serde_json::from_value(body["ideas"].clone()).unwrap();
    assert_eq!(picked.len(), 3);
    let mut ids: Vec<_> = picked.iter().map(|i| i.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    for idea in &picked {
        assert!(idea.last_shown.is_some());
        assert!(idea.last_completed.is_none());
    }
}

#[tokio::test]
async fn pick_with_small_pool_fails_with_message_and_no_mutation() {
    let server = server_with(fresh_ideas(2));
    let (status, body) = send(&server, get("/api/ideas/pick")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Not enough ideas available. Please reset or add more ideas."
    );

    let (_, after) = send(&server, get("/api/ideas")).await;
    for idea in after.as_array().unwrap() {
        assert!(idea["lastShown"].is_null());
    }
}

#[tokio::test]
async fn pick_honors_the_priority_pool() {
    // Seed from the worked example: id 3 is completed and excluded, leaving
    // exactly ids 1, 2, 4 eligible, so the draw must return all three.
    let server = server_with(json!([
        { "id": "1", "idea": "a", "lastShown": null, "lastCompleted": null },
        { "id": "2", "idea": "b", "lastShown": "2024-04-01T00:00:00Z", "lastCompleted": null },
        { "id": "3", "idea": "c", "lastShown": "2024-04-01T00:00:00Z", "lastCompleted": "2024-04-02T00:00:00Z" },
        { "id": "4", "idea": "d", "lastShown": null, "lastCompleted": null }
    ]));

    let (status, body) = send(&server, get("/api/ideas/pick")).await;
    assert_eq!(status, StatusCode::OK);
    let mut ids: Vec<String> = body["ideas"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["1", "2", "4"]);
}

#[tokio::test]
async fn select_marks_completion_and_rejects_unknown_ids() {
    let server = server_with(fresh_ideas(3));

    let (status, body) = send(&server, post("/api/ideas/2/select")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "2");
    assert!(!body["lastCompleted"].is_null());
    assert!(body["lastShown"].is_null(), "select does not require a prior pick");

    let (status, body) = send(&server, post("/api/ideas/99/select")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Idea not found");
}

#[tokio::test]
async fn create_validates_and_returns_201() {
    let server = server_with(fresh_ideas(2));

    let (status, body) = send(
        &server,
        post_json("/api/ideas", json!({ "idea": "  Go stargazing  " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "3");
    assert_eq!(body["idea"], "Go stargazing");
    assert!(body["lastShown"].is_null());

    let (status, body) = send(&server, post_json("/api/ideas", json!({ "idea": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Idea text is required");

    let (_, all) = send(&server, get("/api/ideas")).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn update_replaces_text_or_fails() {
    let server = server_with(fresh_ideas(2));

    let (status, body) = send(
        &server,
        put_json("/api/ideas/1", json!({ "idea": "Cook dinner together" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["idea"], "Cook dinner together");

    let (status, _) = send(&server, put_json("/api/ideas/9", json!({ "idea": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&server, put_json("/api/ideas/1", json!({ "idea": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_returns_204_then_404() {
    let server = server_with(fresh_ideas(2));

    let (status, body) = send(&server, delete("/api/ideas/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&server, delete("/api/ideas/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_clears_tracking_data() {
    let server = server_with(json!([
        { "id": "1", "idea": "a", "lastShown": "2024-04-01T00:00:00Z", "lastCompleted": "2024-04-02T00:00:00Z" },
        { "id": "2", "idea": "b", "lastShown": "2024-04-01T00:00:00Z", "lastCompleted": null }
    ]));

    let (status, body) = send(&server, post("/api/ideas/reset")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reset successful");

    let (_, all) = send(&server, get("/api/ideas")).await;
    for idea in all.as_array().unwrap() {
        assert!(idea["lastShown"].is_null());
        assert!(idea["lastCompleted"].is_null());
    }
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn completed_ideas_never_reappear_until_reset() {
    let server = server_with(fresh_ideas(4));

    let (status, _) = send(&server, post("/api/ideas/1/select")).await;
    assert_eq!(status, StatusCode::OK);

    // Pool is now exactly 3, so every pick must avoid the completed idea.
    let (status, body) = send(&server, get("/api/ideas/pick")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["ideas"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&"1"));

    // A second completion shrinks the pool below 3.
    send(&server, post("/api/ideas/2/select")).await;
    let (status, _) = send(&server, get("/api/ideas/pick")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Reset restores everything to the pool.
    send(&server, post("/api/ideas/reset")).await;
    let (status, _) = send(&server, get("/api/ideas/pick")).await;
    assert_eq!(status, StatusCode::OK);
}
