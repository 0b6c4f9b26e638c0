// src/store/memory.rs
//! In-memory `ContentStore` with optional JSON snapshot persistence.
//!
//! Backs the CLI and server binaries without an external database, and doubles
//! as the fixture store in tests. Uniqueness and foreign-key checks mirror
//! what a relational schema would enforce.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{
    ContentStore, Figure, FigureRecord, Quote, QuoteRecord, Story, StoryRecord,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Tables {
    figures: Vec<Figure>,
    stories: Vec<Story>,
    quotes: Vec<Quote>,
    next_figure_id: i64,
    next_story_id: i64,
    next_quote_id: i64,
}

impl Tables {
    fn next_figure_id(&mut self) -> i64 {
        self.next_figure_id += 1;
        self.next_figure_id
    }
    fn next_story_id(&mut self) -> i64 {
        self.next_story_id += 1;
        self.next_story_id
    }
    fn next_quote_id(&mut self) -> i64 {
        self.next_quote_id += 1;
        self.next_quote_id
    }
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            snapshot_path: None,
        }
    }

    /// Load a snapshot from `path`, starting empty when the file does not
    /// exist yet. `flush()` writes back to the same path.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let tables = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("parsing store snapshot {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::default(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading store snapshot {}", path.display()))
            }
        };
        Ok(Self {
            tables: RwLock::new(tables),
            snapshot_path: Some(path.to_path_buf()),
        })
    }

    pub fn figures(&self) -> Vec<Figure> {
        self.tables.read().expect("rwlock poisoned").figures.clone()
    }

    pub fn stories(&self) -> Vec<Story> {
        self.tables.read().expect("rwlock poisoned").stories.clone()
    }

    pub fn quotes(&self) -> Vec<Quote> {
        self.tables.read().expect("rwlock poisoned").quotes.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn upsert_figure(&self, rec: FigureRecord) -> Result<Figure> {
        let mut t = self.tables.write().expect("rwlock poisoned");
        let now = Utc::now();

        if t.figures.iter().any(|f| f.slug != rec.slug && f.name == rec.name) {
            bail!("figure name '{}' already exists under another slug", rec.name);
        }

        if let Some(existing) = t.figures.iter_mut().find(|f| f.slug == rec.slug) {
            existing.name = rec.name;
            existing.category = rec.category;
            existing.bio = rec.bio;
            existing.birth_year = rec.birth_year;
            existing.death_year = rec.death_year;
            existing.nationality = rec.nationality;
            existing.image_url = rec.image_url;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let id = t.next_figure_id();
        let figure = Figure {
            id,
            name: rec.name,
            slug: rec.slug,
            category: rec.category,
            bio: rec.bio,
            birth_year: rec.birth_year,
            death_year: rec.death_year,
            nationality: rec.nationality,
            image_url: rec.image_url,
            created_at: now,
            updated_at: now,
        };
        t.figures.push(figure.clone());
        Ok(figure)
    }

    async fn create_figure(&self, rec: FigureRecord) -> Result<Figure> {
        let mut t = self.tables.write().expect("rwlock poisoned");
        if t.figures.iter().any(|f| f.slug == rec.slug) {
            bail!("figure slug '{}' already exists", rec.slug);
        }
        if t.figures.iter().any(|f| f.name == rec.name) {
            bail!("figure name '{}' already exists", rec.name);
        }

        let now = Utc::now();
        let id = t.next_figure_id();
        let figure = Figure {
            id,
            name: rec.name,
            slug: rec.slug,
            category: rec.category,
            bio: rec.bio,
            birth_year: rec.birth_year,
            death_year: rec.death_year,
            nationality: rec.nationality,
            image_url: rec.image_url,
            created_at: now,
            updated_at: now,
        };
        t.figures.push(figure.clone());
        Ok(figure)
    }

    async fn find_figure_by_name(&self, name: &str) -> Result<Option<Figure>> {
        let t = self.tables.read().expect("rwlock poisoned");
        Ok(t.figures.iter().find(|f| f.name == name).cloned())
    }

    async fn find_figure_by_slug(&self, slug: &str) -> Result<Option<Figure>> {
        let t = self.tables.read().expect("rwlock poisoned");
        Ok(t.figures.iter().find(|f| f.slug == slug).cloned())
    }

    async fn upsert_story(&self, rec: StoryRecord) -> Result<Story> {
        let mut t = self.tables.write().expect("rwlock poisoned");
        let now = Utc::now();

        if !t.figures.iter().any(|f| f.id == rec.figure_id) {
            bail!("story '{}' references unknown figure {}", rec.slug, rec.figure_id);
        }

        if let Some(existing) = t.stories.iter_mut().find(|s| s.slug == rec.slug) {
            existing.published_at = if rec.published {
                existing.published_at.or(Some(now))
            } else {
                None
            };
            existing.title = rec.title;
            existing.content = rec.content;
            existing.excerpt = rec.excerpt;
            existing.figure_id = rec.figure_id;
            existing.difficulty = rec.difficulty;
            existing.grammar_tags = rec.grammar_tags;
            existing.reading_time = rec.reading_time;
            existing.meta_title = rec.meta_title;
            existing.meta_description = rec.meta_description;
            existing.published = rec.published;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let id = t.next_story_id();
        let story = Story {
            id,
            notion_id: rec.notion_id,
            title: rec.title,
            slug: rec.slug,
            content: rec.content,
            excerpt: rec.excerpt,
            figure_id: rec.figure_id,
            difficulty: rec.difficulty,
            grammar_tags: rec.grammar_tags,
            reading_time: rec.reading_time,
            meta_title: rec.meta_title,
            meta_description: rec.meta_description,
            published: rec.published,
            published_at: rec.published.then_some(now),
            created_at: now,
            updated_at: now,
        };
        t.stories.push(story.clone());
        Ok(story)
    }

    async fn delete_quotes_by_story(&self, story_id: i64) -> Result<usize> {
        let mut t = self.tables.write().expect("rwlock poisoned");
        let before = t.quotes.len();
        t.quotes.retain(|q| q.story_id != story_id);
        Ok(before - t.quotes.len())
    }

    async fn create_quote(&self, rec: QuoteRecord) -> Result<Quote> {
        let mut t = self.tables.write().expect("rwlock poisoned");
        if !t.stories.iter().any(|s| s.id == rec.story_id) {
            bail!("quote references unknown story {}", rec.story_id);
        }
        if !t.figures.iter().any(|f| f.id == rec.figure_id) {
            bail!("quote references unknown figure {}", rec.figure_id);
        }

        let id = t.next_quote_id();
        let quote = Quote {
            id,
            text: rec.text,
            story_id: rec.story_id,
            figure_id: rec.figure_id,
        };
        t.quotes.push(quote.clone());
        Ok(quote)
    }

    async fn flush(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let json = {
            let t = self.tables.read().expect("rwlock poisoned");
            serde_json::to_string_pretty(&*t).context("serializing store snapshot")?
        };
        std::fs::write(path, json)
            .with_context(|| format!("writing store snapshot {}", path.display()))
    }
}
