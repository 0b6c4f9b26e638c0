// src/notion/mod.rs
pub mod client;
pub mod types;

pub use client::{NotionClient, NotionSource};
pub use types::{Block, Page, PropertyValue, RichTextRun};
