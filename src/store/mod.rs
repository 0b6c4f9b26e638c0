// src/store/mod.rs
//! Content entities and the store seam the sync run writes through.
//!
//! The orchestrator only sees `ContentStore`; the concrete store (in-memory
//! with JSON snapshots, or a future SQL backend) is injected per run.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::MemoryStore;

/// Editorial category of a figure. Unknown labels fold to `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Scientist,
    Innovator,
    Historical,
    Wisdom,
    General,
}

impl Default for Category {
    fn default() -> Self {
        Category::General
    }
}

impl Category {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "scientist" => Category::Scientist,
            "innovator" => Category::Innovator,
            "historical" => Category::Historical,
            "wisdom" => Category::Wisdom,
            _ => Category::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Scientist => "scientist",
            Category::Innovator => "innovator",
            Category::Historical => "historical",
            Category::Wisdom => "wisdom",
            Category::General => "general",
        }
    }
}

/// A historical/public person referenced by stories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub category: Category,
    pub bio: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub nationality: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input row for figure upsert/create; the store assigns id and timestamps.
#[derive(Debug, Clone, Default)]
pub struct FigureRecord {
    pub name: String,
    pub slug: String,
    pub category: Category,
    pub bio: String,
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
    pub nationality: String,
    pub image_url: Option<String>,
}

/// A narrative article, upserted by slug on every sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: i64,
    pub notion_id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub figure_id: i64,
    pub difficulty: i32,
    pub grammar_tags: Vec<String>,
    pub reading_time: u32,
    pub meta_title: String,
    pub meta_description: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct StoryRecord {
    pub notion_id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub figure_id: i64,
    pub difficulty: i32,
    pub grammar_tags: Vec<String>,
    pub reading_time: u32,
    pub meta_title: String,
    pub meta_description: String,
    pub published: bool,
}

/// A short attributed excerpt, fully derived from its story's body.
/// Carries a denormalized figure reference for author display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub story_id: i64,
    pub figure_id: i64,
}

#[derive(Debug, Clone)]
pub struct QuoteRecord {
    pub text: String,
    pub story_id: i64,
    pub figure_id: i64,
}

/// Relational store operations used by the sync run. Implementations enforce
/// slug/name uniqueness and the story->figure / quote->story foreign keys.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert or update-in-place by slug. A name collision under the same
    /// slug overwrites, never duplicates.
    async fn upsert_figure(&self, rec: FigureRecord) -> Result<Figure>;

    /// Insert only; fails on slug or name conflict (unique constraint).
    async fn create_figure(&self, rec: FigureRecord) -> Result<Figure>;

    async fn find_figure_by_name(&self, name: &str) -> Result<Option<Figure>>;

    async fn find_figure_by_slug(&self, slug: &str) -> Result<Option<Figure>>;

    /// Insert or update-in-place by slug. On update every field is
    /// overwritten except the original notion id and created-at; the publish
    /// timestamp is stamped on the unpublished->published transition,
    /// preserved while the story stays published, and cleared on unpublish.
    async fn upsert_story(&self, rec: StoryRecord) -> Result<Story>;

    /// Remove all quotes owned by a story; returns how many were removed.
    async fn delete_quotes_by_story(&self, story_id: i64) -> Result<usize>;

    async fn create_quote(&self, rec: QuoteRecord) -> Result<Quote>;

    /// Persist any buffered state. Default: no-op (for purely external
    /// stores that commit per operation).
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}
