// tests/api_http.rs
//
// HTTP-level tests for the sync trigger without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /sync auth gate (missing / wrong / valid bearer token)
// - method rejection on /sync

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use grammar_stories_sync::api::{self, AppState};
use grammar_stories_sync::config::SyncConfig;
use grammar_stories_sync::notion::client::NotionSource;
use grammar_stories_sync::notion::types::{Block, Page};
use grammar_stories_sync::store::MemoryStore;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests
const TOKEN: &str = "test-sync-token";

/// Source with one empty stories database; enough for a successful no-op run.
struct EmptySource;

#[async_trait]
impl NotionSource for EmptySource {
    async fn database_pages(&self, database_id: &str) -> Result<Vec<Page>> {
        if database_id == "stories-db" {
            Ok(Vec::new())
        } else {
            Err(anyhow!("database {database_id} not found"))
        }
    }

    async fn page_blocks(&self, page_id: &str) -> Result<Vec<Block>> {
        Err(anyhow!("page {page_id} not found"))
    }
}

/// Build the same Router the binary uses.
fn test_router() -> Router {
    let state = AppState {
        source: Arc::new(EmptySource),
        store: Arc::new(MemoryStore::new()),
        config: Arc::new(SyncConfig {
            stories_database_id: "stories-db".to_string(),
            figures_database_id: None,
        }),
        sync_token: TOKEN.to_string(),
    };
    api::router(state)
}

fn sync_request(auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/sync");
    if let Some(value) = auth {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).expect("build POST /sync")
}

async fn json_body(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json body")
}

#[tokio::test]
async fn health_returns_200() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn sync_without_token_is_unauthorized() {
    let app = test_router();

    let resp = app.oneshot(sync_request(None)).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let v = json_body(resp).await;
    assert_eq!(v["success"], false);
    assert_eq!(v["error"], "Unauthorized");
}

#[tokio::test]
async fn sync_with_wrong_token_is_unauthorized() {
    let app = test_router();

    let resp = app
        .oneshot(sync_request(Some("Bearer not-the-token")))
        .await
        .expect("oneshot");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn get_on_sync_is_method_not_allowed() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/sync")
        .body(Body::empty())
        .expect("build GET /sync");

    let resp = app.oneshot(req).await.expect("oneshot");
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn sync_with_valid_token_reports_success_and_timestamp() {
    let app = test_router();

    let resp = app
        .oneshot(sync_request(Some(&format!("Bearer {TOKEN}"))))
        .await
        .expect("oneshot");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = json_body(resp).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["message"], "Content synchronized successfully");
    assert!(v["timestamp"].is_string(), "missing 'timestamp'");
    assert_eq!(v["report"]["stories_synced"], 0);
}

#[tokio::test]
async fn fatal_sync_error_surfaces_as_500_payload() {
    // Point the config at a database the source does not know.
    let state = AppState {
        source: Arc::new(EmptySource),
        store: Arc::new(MemoryStore::new()),
        config: Arc::new(SyncConfig {
            stories_database_id: "missing-db".to_string(),
            figures_database_id: None,
        }),
        sync_token: TOKEN.to_string(),
    };
    let app = api::router(state);

    let resp = app
        .oneshot(sync_request(Some(&format!("Bearer {TOKEN}"))))
        .await
        .expect("oneshot");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let v = json_body(resp).await;
    assert_eq!(v["success"], false);
    assert!(v["error"].as_str().unwrap().contains("missing-db"));
}
