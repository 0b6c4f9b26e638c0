// src/sync.rs
//! Sync orchestrator: reconcile the content store with Notion.
//!
//! Two ordered phases — figures first, then stories (stories hold a figure
//! foreign key). Records are processed one at a time in source order; a
//! failing record is logged and skipped, a failing page-list fetch aborts
//! the run.

use anyhow::{Context, Result};
use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::extract::{extract_quotes, reading_time_minutes, slugify};
use crate::markup::blocks_to_markup;
use crate::notion::client::NotionSource;
use crate::notion::types::Page;
use crate::store::{Category, ContentStore, Figure, FigureRecord, QuoteRecord, StoryRecord};

/// Reserved slug for the shared placeholder figure.
const UNKNOWN_FIGURE_SLUG: &str = "unknown";
const UNKNOWN_FIGURE_NAME: &str = "Unknown";
const DEFAULT_DIFFICULTY: i32 = 1;
const UNTITLED: &str = "Untitled";

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("sync_figures_total", "Figures upserted across sync runs.");
        describe_counter!("sync_stories_total", "Stories upserted across sync runs.");
        describe_counter!(
            "sync_records_failed_total",
            "Records skipped due to per-record errors."
        );
        describe_counter!("sync_quotes_total", "Quotes written across sync runs.");
        describe_gauge!("sync_last_run_ts", "Unix ts when a sync run last finished.");
    });
}

/// Outcome counts of one full sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub figures_synced: usize,
    pub figures_failed: usize,
    pub stories_synced: usize,
    pub stories_failed: usize,
    pub quotes_written: usize,
}

/// Drives one reconciliation against an injected source and store; holds no
/// global state and is dropped when the run ends.
pub struct SyncService<'a> {
    source: &'a dyn NotionSource,
    store: &'a dyn ContentStore,
    config: &'a SyncConfig,
}

impl<'a> SyncService<'a> {
    pub fn new(
        source: &'a dyn NotionSource,
        store: &'a dyn ContentStore,
        config: &'a SyncConfig,
    ) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// Run both phases. Per-record failures are counted in the report; a
    /// fetch or store-wide failure propagates as `Err`.
    pub async fn sync_all(&self) -> Result<SyncReport> {
        ensure_metrics_described();
        info!("starting notion sync");

        let mut report = SyncReport::default();
        self.sync_figures(&mut report).await?;
        self.sync_stories(&mut report).await?;
        self.store.flush().await.context("persisting content store")?;

        gauge!("sync_last_run_ts").set(Utc::now().timestamp().max(0) as f64);
        info!(
            figures = report.figures_synced,
            stories = report.stories_synced,
            quotes = report.quotes_written,
            failed = report.figures_failed + report.stories_failed,
            "notion sync completed"
        );
        Ok(report)
    }

    async fn sync_figures(&self, report: &mut SyncReport) -> Result<()> {
        let Some(database_id) = &self.config.figures_database_id else {
            warn!("figures database id not set, skipping figures sync");
            return Ok(());
        };

        let pages = self
            .source
            .database_pages(database_id)
            .await
            .context("listing figure pages")?;
        info!(count = pages.len(), "syncing figures from notion");

        for page in &pages {
            match self.sync_figure(page).await {
                Ok(name) => {
                    counter!("sync_figures_total").increment(1);
                    report.figures_synced += 1;
                    info!(figure = %name, "synced figure");
                }
                Err(e) => {
                    counter!("sync_records_failed_total").increment(1);
                    report.figures_failed += 1;
                    warn!(error = ?e, page = %page.id, "figure sync failed, skipping record");
                }
            }
        }
        Ok(())
    }

    async fn sync_figure(&self, page: &Page) -> Result<String> {
        let name = page
            .text_value("Name")
            .unwrap_or_else(|| UNTITLED.to_string());

        let rec = FigureRecord {
            slug: slugify(&name),
            category: page
                .select_value("Category")
                .map(|s| Category::parse(&s))
                .unwrap_or_default(),
            bio: page.text_value("Bio").unwrap_or_default(),
            birth_year: page.number_value("Birth Year").map(|n| n as i32),
            death_year: page.number_value("Death Year").map(|n| n as i32),
            nationality: page.text_value("Nationality").unwrap_or_default(),
            image_url: page.url_value("Image URL"),
            name: name.clone(),
        };

        self.store.upsert_figure(rec).await?;
        Ok(name)
    }

    async fn sync_stories(&self, report: &mut SyncReport) -> Result<()> {
        let database_id = &self.config.stories_database_id;
        let pages = self
            .source
            .database_pages(database_id)
            .await
            .context("listing story pages")?;
        info!(count = pages.len(), "syncing stories from notion");

        for page in &pages {
            match self.sync_story(page).await {
                Ok((title, quotes)) => {
                    counter!("sync_stories_total").increment(1);
                    counter!("sync_quotes_total").increment(quotes as u64);
                    report.stories_synced += 1;
                    report.quotes_written += quotes;
                    info!(story = %title, quotes, "synced story");
                }
                Err(e) => {
                    counter!("sync_records_failed_total").increment(1);
                    report.stories_failed += 1;
                    warn!(error = ?e, page = %page.id, "story sync failed, skipping record");
                }
            }
        }
        Ok(())
    }

    async fn sync_story(&self, page: &Page) -> Result<(String, usize)> {
        let title = page
            .text_value("Title")
            .or_else(|| page.text_value("Name"))
            .unwrap_or_else(|| UNTITLED.to_string());
        let excerpt = page.text_value("Excerpt").unwrap_or_default();

        let figure_name = page.select_value("Figure");
        let figure = self.resolve_figure(figure_name.as_deref()).await?;

        let blocks = self
            .source
            .page_blocks(&page.id)
            .await
            .with_context(|| format!("fetching blocks of story '{title}'"))?;
        let content = blocks_to_markup(&blocks);
        let reading_time = reading_time_minutes(&content);
        let quotes = extract_quotes(&content);

        let rec = StoryRecord {
            notion_id: page.id.clone(),
            slug: slugify(&title),
            content,
            figure_id: figure.id,
            difficulty: page
                .number_value("Difficulty")
                .map(|n| n as i32)
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_DIFFICULTY),
            grammar_tags: page.multi_select_values("Grammar Tags"),
            reading_time,
            meta_title: page
                .text_value("Meta Title")
                .unwrap_or_else(|| title.clone()),
            meta_description: page
                .text_value("Meta Description")
                .unwrap_or_else(|| excerpt.clone()),
            published: page.checkbox_value("Published").unwrap_or(false),
            excerpt,
            title: title.clone(),
        };
        let story = self.store.upsert_story(rec).await?;

        // Full replace: quote identity is not stable across syncs.
        self.store.delete_quotes_by_story(story.id).await?;
        let mut written = 0usize;
        for text in quotes {
            if text.trim().is_empty() {
                continue;
            }
            self.store
                .create_quote(QuoteRecord {
                    text,
                    story_id: story.id,
                    figure_id: figure.id,
                })
                .await?;
            written += 1;
        }

        Ok((title, written))
    }

    /// Resolve the owning figure: exact name match, else create a minimal
    /// figure on the fly; no name at all falls back to the shared
    /// "unknown" placeholder. The placeholder is create-if-missing only —
    /// a curated figure already living under the reserved slug keeps its
    /// bio and category.
    async fn resolve_figure(&self, figure_name: Option<&str>) -> Result<Figure> {
        match figure_name {
            Some(name) => {
                if let Some(figure) = self.store.find_figure_by_name(name).await? {
                    return Ok(figure);
                }
                let figure = self
                    .store
                    .create_figure(FigureRecord {
                        name: name.to_string(),
                        slug: slugify(name),
                        category: Category::General,
                        ..Default::default()
                    })
                    .await?;
                info!(figure = %name, "created missing figure");
                Ok(figure)
            }
            None => {
                if let Some(figure) =
                    self.store.find_figure_by_slug(UNKNOWN_FIGURE_SLUG).await?
                {
                    return Ok(figure);
                }
                self.store
                    .create_figure(FigureRecord {
                        name: UNKNOWN_FIGURE_NAME.to_string(),
                        slug: UNKNOWN_FIGURE_SLUG.to_string(),
                        category: Category::General,
                        ..Default::default()
                    })
                    .await
            }
        }
    }
}
