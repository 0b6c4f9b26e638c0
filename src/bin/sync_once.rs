//! One-shot CLI sync: pull figures and stories from Notion into the local store.
//! Exits non-zero when the run fails; per-record skips only show up in logs
//! and in the printed report.

use std::process::ExitCode;

use grammar_stories_sync::config::{store_path_from_env, SyncConfig};
use grammar_stories_sync::notion::client::NotionClient;
use grammar_stories_sync::store::MemoryStore;
use grammar_stories_sync::sync::{SyncReport, SyncService};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    match run().await {
        Ok(report) => {
            println!(
                "sync done: {} figures, {} stories, {} quotes ({} records skipped)",
                report.figures_synced,
                report.stories_synced,
                report.quotes_written,
                report.figures_failed + report.stories_failed,
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("sync failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<SyncReport> {
    let config = SyncConfig::from_env()?;
    let source = NotionClient::from_env()?;
    let store_path = store_path_from_env();
    let store = MemoryStore::load_or_default(&store_path)?;

    SyncService::new(&source, &store, &config).sync_all().await
}
