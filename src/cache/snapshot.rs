//! The current article snapshot used for offline reads.

use chrono::{DateTime, Utc};
use color_eyre::Result;
use tracing::{debug, warn};

use crate::db::SharedStore;
use crate::news::Article;

use super::keys;
use super::storage::{read_json, write_json};

/// Holds exactly one snapshot of fetched articles plus its timestamps.
///
/// Every save replaces the previous snapshot wholesale; there is no merge
/// and no expiry.
#[derive(Clone)]
pub struct ArticleCache {
  store: SharedStore,
}

impl ArticleCache {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  /// Replace the snapshot and stamp both fetch and sync times with now.
  ///
  /// A failed write is logged and otherwise ignored; whatever was stored
  /// before stays authoritative.
  pub async fn save_snapshot(&self, articles: &[Article]) {
    self.save_snapshot_at(articles, Utc::now()).await
  }

  pub async fn save_snapshot_at(&self, articles: &[Article], now: DateTime<Utc>) {
    match self.try_save(articles, now).await {
      Ok(()) => debug!(count = articles.len(), "article snapshot saved"),
      Err(e) => warn!(error = %e, "failed to save article snapshot"),
    }
  }

  async fn try_save(&self, articles: &[Article], now: DateTime<Utc>) -> Result<()> {
    // Articles first: a failure part way leaves the sync time behind the
    // snapshot, never ahead of it.
    let millis = now.timestamp_millis().to_string();
    write_json(self.store.as_ref(), keys::ARTICLES, articles).await?;
    self.store.set(keys::ARTICLES_TIMESTAMP, &millis).await?;
    self.store.set(keys::LAST_SYNC, &millis).await?;
    Ok(())
  }

  /// The last saved articles, or `None` when nothing usable is stored.
  pub async fn load_snapshot(&self) -> Option<Vec<Article>> {
    match read_json(self.store.as_ref(), keys::ARTICLES).await {
      Ok(articles) => articles,
      Err(e) => {
        warn!(error = %e, "failed to read article snapshot");
        None
      }
    }
  }

  /// When the snapshot was last written.
  pub async fn last_sync_time(&self) -> Option<DateTime<Utc>> {
    self.read_millis(keys::LAST_SYNC).await
  }

  /// When the articles in the snapshot were fetched.
  pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
    self.read_millis(keys::ARTICLES_TIMESTAMP).await
  }

  async fn read_millis(&self, key: &str) -> Option<DateTime<Utc>> {
    let raw = match self.store.get(key).await {
      Ok(raw) => raw?,
      Err(e) => {
        warn!(key, error = %e, "failed to read timestamp");
        return None;
      }
    };
    let millis = raw.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp_millis(millis)
  }
}
