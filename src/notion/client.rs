// src/notion/client.rs
//! HTTP access to the Notion API, behind the `NotionSource` seam so the sync
//! pipeline can run against fixtures in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::notion::types::{Block, Page};

const NOTION_API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

pub const ENV_NOTION_API_KEY: &str = "NOTION_API_KEY";

/// External document source: list pages of a collection, list child blocks
/// of a page.
#[async_trait]
pub trait NotionSource: Send + Sync {
    async fn database_pages(&self, database_id: &str) -> Result<Vec<Page>>;
    async fn page_blocks(&self, page_id: &str) -> Result<Vec<Block>>;
}

pub struct NotionClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Deserialize)]
struct PageList {
    #[serde(default)]
    results: Vec<Page>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Deserialize)]
struct BlockList {
    #[serde(default)]
    results: Vec<Block>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

impl NotionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(ENV_NOTION_API_KEY)
            .with_context(|| format!("{ENV_NOTION_API_KEY} must be set"))?;
        Ok(Self::new(api_key))
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

#[async_trait]
impl NotionSource for NotionClient {
    async fn database_pages(&self, database_id: &str) -> Result<Vec<Page>> {
        let url = format!("{NOTION_API_BASE}/databases/{database_id}/query");
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = match &cursor {
                Some(c) => json!({ "page_size": PAGE_SIZE, "start_cursor": c }),
                None => json!({ "page_size": PAGE_SIZE }),
            };
            let resp: PageList = self
                .client
                .post(&url)
                .header("Authorization", self.auth_header())
                .header("Notion-Version", NOTION_VERSION)
                .json(&body)
                .send()
                .await
                .with_context(|| format!("querying notion database {database_id}"))?
                .error_for_status()
                .with_context(|| format!("notion database query {database_id} rejected"))?
                .json()
                .await
                .context("decoding notion database query response")?;

            pages.extend(resp.results);
            if !resp.has_more {
                break;
            }
            match resp.next_cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        Ok(pages)
    }

    async fn page_blocks(&self, page_id: &str) -> Result<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut url =
                format!("{NOTION_API_BASE}/blocks/{page_id}/children?page_size={PAGE_SIZE}");
            if let Some(c) = &cursor {
                url.push_str(&format!("&start_cursor={c}"));
            }
            let resp: BlockList = self
                .client
                .get(&url)
                .header("Authorization", self.auth_header())
                .header("Notion-Version", NOTION_VERSION)
                .send()
                .await
                .with_context(|| format!("fetching blocks of notion page {page_id}"))?
                .error_for_status()
                .with_context(|| format!("notion block listing {page_id} rejected"))?
                .json()
                .await
                .context("decoding notion block listing response")?;

            blocks.extend(resp.results);
            if !resp.has_more {
                break;
            }
            match resp.next_cursor {
                Some(c) => cursor = Some(c),
                None => break,
            }
        }

        Ok(blocks)
    }
}
