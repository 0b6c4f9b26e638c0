// src/lib.rs
// Public library surface for integration tests (and the server/CLI binaries).

pub mod api;
pub mod config;
pub mod extract;
pub mod markup;
pub mod metrics;
pub mod notion;
pub mod store;
pub mod sync;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::notion::client::{NotionClient, NotionSource};
pub use crate::store::{ContentStore, MemoryStore};
pub use crate::sync::{SyncReport, SyncService};
