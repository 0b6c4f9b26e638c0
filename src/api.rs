// src/api.rs
//! HTTP trigger for the sync run. Auth is a bearer-token match against the
//! configured secret, checked before any sync work starts.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::config::SyncConfig;
use crate::notion::client::NotionSource;
use crate::store::ContentStore;
use crate::sync::{SyncReport, SyncService};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn NotionSource>,
    pub store: Arc<dyn ContentStore>,
    pub config: Arc<SyncConfig>,
    pub sync_token: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/sync", post(trigger_sync))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct SyncOk {
    success: bool,
    message: String,
    timestamp: String,
    report: SyncReport,
}

#[derive(Serialize)]
struct SyncErr {
    success: bool,
    error: String,
}

fn err(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<SyncErr>) {
    (
        status,
        Json(SyncErr {
            success: false,
            error: msg.into(),
        }),
    )
}

async fn trigger_sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SyncOk>, (StatusCode, Json<SyncErr>)> {
    let expected = format!("Bearer {}", state.sync_token);
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);
    if !authorized {
        return Err(err(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }

    info!("notion sync triggered via API");
    let service = SyncService::new(
        state.source.as_ref(),
        state.store.as_ref(),
        state.config.as_ref(),
    );
    match service.sync_all().await {
        Ok(report) => Ok(Json(SyncOk {
            success: true,
            message: "Content synchronized successfully".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            report,
        })),
        Err(e) => {
            error!(error = ?e, "sync run failed");
            Err(err(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))
        }
    }
}
