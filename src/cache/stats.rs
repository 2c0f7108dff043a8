//! Storage statistics for the settings and history screens.

use color_eyre::Result;
use futures::future::try_join_all;
use serde::Serialize;
use tracing::warn;

use crate::db::SharedStore;

use super::history::{day_count, total_articles, HistoryLedger};
use super::keys::NAMESPACE_PREFIX;

/// Aggregate view of what the client keeps on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
  /// Estimated size: two bytes per UTF-16 code unit of every stored value.
  /// This mirrors what the storage quota charges on mobile platforms and is
  /// only shown to the user, never used for eviction.
  pub approx_size_bytes: u64,
  /// `approx_size_bytes` in MiB with one decimal
  pub approx_size_mb: String,
  /// Articles held in history
  pub total_articles: usize,
  /// Days held in history
  pub days: usize,
}

impl Default for CacheStats {
  fn default() -> Self {
    Self {
      approx_size_bytes: 0,
      approx_size_mb: format_mb(0),
      total_articles: 0,
      days: 0,
    }
  }
}

fn format_mb(bytes: u64) -> String {
  format!("{:.1}", bytes as f64 / (1024.0 * 1024.0))
}

/// Estimated storage cost of one value.
fn estimated_size(value: &str) -> u64 {
  value.encode_utf16().count() as u64 * 2
}

/// Computes [`CacheStats`] by scanning the store.
#[derive(Clone)]
pub struct CacheInspector {
  store: SharedStore,
  history: HistoryLedger,
}

impl CacheInspector {
  pub fn new(store: SharedStore) -> Self {
    let history = HistoryLedger::new(store.clone());
    Self { store, history }
  }

  /// Current statistics, or all zeros if anything goes wrong.
  pub async fn compute_stats(&self) -> CacheStats {
    match self.try_compute().await {
      Ok(stats) => stats,
      Err(e) => {
        warn!(error = %e, "failed to compute cache stats");
        CacheStats::default()
      }
    }
  }

  async fn try_compute(&self) -> Result<CacheStats> {
    let keys: Vec<String> = self
      .store
      .list_keys()
      .await?
      .into_iter()
      .filter(|k| k.starts_with(NAMESPACE_PREFIX))
      .collect();

    let values = try_join_all(keys.iter().map(|k| self.store.get(k))).await?;
    let approx_size_bytes: u64 = values.iter().flatten().map(|v| estimated_size(v)).sum();

    // Article counts come from history only; the snapshot is a subset of
    // today's entry and would be counted twice.
    let ledger = self.history.try_load().await?;

    Ok(CacheStats {
      approx_size_bytes,
      approx_size_mb: format_mb(approx_size_bytes),
      total_articles: total_articles(&ledger),
      days: day_count(&ledger),
    })
  }
}
