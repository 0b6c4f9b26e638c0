// src/config.rs
//! Environment configuration for the sync run and the trigger server.
//! `.env` loading (dotenvy) happens at the entry points, not here.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const ENV_STORIES_DB: &str = "NOTION_STORIES_DATABASE_ID";
pub const ENV_FIGURES_DB: &str = "NOTION_FIGURES_DATABASE_ID";
pub const ENV_SYNC_TOKEN: &str = "SYNC_TOKEN";
pub const ENV_STORE_PATH: &str = "CONTENT_STORE_PATH";

const DEFAULT_STORE_PATH: &str = "content_store.json";

/// Which Notion databases a sync run reads.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Required; a missing stories database is a fatal configuration error.
    pub stories_database_id: String,
    /// Optional; when unset the figures phase is skipped with a warning.
    pub figures_database_id: Option<String>,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self> {
        let stories_database_id = std::env::var(ENV_STORIES_DB)
            .ok()
            .filter(|v| !v.is_empty())
            .with_context(|| format!("{ENV_STORIES_DB} must be set"))?;
        let figures_database_id = std::env::var(ENV_FIGURES_DB)
            .ok()
            .filter(|v| !v.is_empty());
        Ok(Self {
            stories_database_id,
            figures_database_id,
        })
    }
}

/// Bearer token the trigger endpoint matches against.
pub fn sync_token_from_env() -> Result<String> {
    std::env::var(ENV_SYNC_TOKEN)
        .ok()
        .filter(|v| !v.is_empty())
        .with_context(|| format!("{ENV_SYNC_TOKEN} must be set"))
}

/// Path of the JSON store snapshot.
pub fn store_path_from_env() -> PathBuf {
    std::env::var(ENV_STORE_PATH)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[serial_test::serial]
    #[test]
    fn missing_stories_database_is_a_config_error() {
        env::remove_var(ENV_STORIES_DB);
        env::remove_var(ENV_FIGURES_DB);
        assert!(SyncConfig::from_env().is_err());
    }

    #[serial_test::serial]
    #[test]
    fn figures_database_is_optional() {
        env::set_var(ENV_STORIES_DB, "stories-db");
        env::remove_var(ENV_FIGURES_DB);
        let cfg = SyncConfig::from_env().unwrap();
        assert_eq!(cfg.stories_database_id, "stories-db");
        assert!(cfg.figures_database_id.is_none());

        env::set_var(ENV_FIGURES_DB, "figures-db");
        let cfg = SyncConfig::from_env().unwrap();
        assert_eq!(cfg.figures_database_id.as_deref(), Some("figures-db"));

        env::remove_var(ENV_STORIES_DB);
        env::remove_var(ENV_FIGURES_DB);
    }

    #[serial_test::serial]
    #[test]
    fn store_path_falls_back_to_default() {
        env::remove_var(ENV_STORE_PATH);
        assert_eq!(store_path_from_env(), PathBuf::from("content_store.json"));
        env::set_var(ENV_STORE_PATH, "/tmp/custom.json");
        assert_eq!(store_path_from_env(), PathBuf::from("/tmp/custom.json"));
        env::remove_var(ENV_STORE_PATH);
    }
}
