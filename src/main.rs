//! Grammar Through Stories — Sync Service Entrypoint
//! Boots the Axum HTTP server exposing the Notion sync trigger and metrics.
//!
//! See `README.md` for quickstart; the one-shot CLI lives in `src/bin/sync_once.rs`.

use std::sync::Arc;

use anyhow::Context;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use grammar_stories_sync::api::{self, AppState};
use grammar_stories_sync::config::{store_path_from_env, sync_token_from_env, SyncConfig};
use grammar_stories_sync::metrics::Metrics;
use grammar_stories_sync::notion::client::NotionClient;
use grammar_stories_sync::store::MemoryStore;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SYNC_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("SYNC_DEV_LOG").ok().is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("grammar_stories_sync=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let sync_token = sync_token_from_env()?;
    let config = SyncConfig::from_env().context("loading sync configuration")?;
    let source = NotionClient::from_env()?;
    let store_path = store_path_from_env();
    let store = MemoryStore::load_or_default(&store_path)
        .with_context(|| format!("loading content store {}", store_path.display()))?;

    let metrics = Metrics::init();

    let state = AppState {
        source: Arc::new(source),
        store: Arc::new(store),
        config: Arc::new(config),
        sync_token,
    };
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
