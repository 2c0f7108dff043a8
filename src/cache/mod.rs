//! Offline persistence for briefings.
//!
//! This module provides the local side of synchronization:
//! - A single article snapshot that serves offline reads
//! - A day-bucketed history ledger with bounded retention
//! - Approximate storage statistics over every namespaced key
//!
//! All state lives under the [`keys::NAMESPACE_PREFIX`] prefix in a
//! [`KeyValueStore`](crate::db::KeyValueStore). Reads treat failures as
//! absence and writes are best-effort, so nothing here ever blocks the
//! caller from showing articles.

mod history;
mod snapshot;
mod stats;
mod storage;

pub use history::{HistoryArticle, HistoryDay, HistoryLedger, HistorySection, Ledger, RETENTION_DAYS};
pub use snapshot::ArticleCache;
pub use stats::{CacheInspector, CacheStats};
pub(crate) use storage::{read_json, write_json};

/// Persisted key layout.
pub mod keys {
  /// Common prefix of every key owned by the briefing client.
  pub const NAMESPACE_PREFIX: &str = "briefing_";

  pub const ARTICLES: &str = "briefing_articles";
  pub const ARTICLES_TIMESTAMP: &str = "briefing_articles_ts";
  pub const LAST_SYNC: &str = "briefing_last_sync";
  pub const HISTORY: &str = "briefing_history";
  pub const SOURCES: &str = "briefing_sources";
  pub const FAVORITES: &str = "briefing_favorites";
  pub const FAVORITE_CATEGORIES: &str = "briefing_fav_categories";
}
