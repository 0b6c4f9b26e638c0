// src/markup.rs
//! Notion block tree -> lightweight markup for the story renderer.
//!
//! Inline styles nest in a fixed order (bold, italic, inline code) with link
//! wrapping applied last, so `**bold**` never ends up inside a link target.

use crate::notion::types::{Block, RichTextRun};

/// Render an ordered sequence of styled runs as inline markup.
///
/// Runs are neither merged nor reordered; an empty sequence yields "".
pub fn format_rich_text(runs: &[RichTextRun]) -> String {
    runs.iter()
        .map(|run| {
            let mut content = run.plain_text.clone();
            if run.annotations.bold {
                content = format!("**{content}**");
            }
            if run.annotations.italic {
                content = format!("*{content}*");
            }
            if run.annotations.code {
                content = format!("`{content}`");
            }
            if let Some(href) = &run.href {
                content = format!("[{content}]({href})");
            }
            content
        })
        .collect()
}

/// Convert a page's blocks to markup, in order, concatenated.
///
/// Blocks with empty text contribute nothing (no separator either), and
/// unrecognized block kinds are skipped, so conversion never aborts
/// mid-sequence.
pub fn blocks_to_markup(blocks: &[Block]) -> String {
    let mut out = String::new();

    for block in blocks {
        match block {
            Block::Paragraph { paragraph } => {
                let text = format_rich_text(&paragraph.rich_text);
                if !text.is_empty() {
                    out.push_str(&format!("{text}\n\n"));
                }
            }
            Block::Heading1 { heading_1 } => {
                let text = format_rich_text(&heading_1.rich_text);
                if !text.is_empty() {
                    out.push_str(&format!("# {text}\n\n"));
                }
            }
            Block::Heading2 { heading_2 } => {
                let text = format_rich_text(&heading_2.rich_text);
                if !text.is_empty() {
                    out.push_str(&format!("## {text}\n\n"));
                }
            }
            Block::Heading3 { heading_3 } => {
                let text = format_rich_text(&heading_3.rich_text);
                if !text.is_empty() {
                    out.push_str(&format!("### {text}\n\n"));
                }
            }
            // Single newline keeps consecutive items grouped into one list.
            Block::BulletedListItem { bulleted_list_item } => {
                let text = format_rich_text(&bulleted_list_item.rich_text);
                if !text.is_empty() {
                    out.push_str(&format!("- {text}\n"));
                }
            }
            // Ordinal is not tracked per item; the renderer renumbers.
            Block::NumberedListItem { numbered_list_item } => {
                let text = format_rich_text(&numbered_list_item.rich_text);
                if !text.is_empty() {
                    out.push_str(&format!("1. {text}\n"));
                }
            }
            Block::Quote { quote } => {
                let text = format_rich_text(&quote.rich_text);
                if !text.is_empty() {
                    out.push_str(&format!(
                        "<div className=\"quote-box\">\n\"{text}\"\n</div>\n\n"
                    ));
                }
            }
            Block::Code { code } => {
                let text = format_rich_text(&code.rich_text);
                let language = code.language.as_deref().unwrap_or("text");
                if !text.is_empty() {
                    out.push_str(&format!("```{language}\n{text}\n```\n\n"));
                }
            }
            Block::Unsupported => {}
        }
    }

    out
}
