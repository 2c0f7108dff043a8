//! Day-bucketed reading history.

use chrono::{DateTime, Local};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::dates::{day_key, group_label_at};
use crate::db::SharedStore;
use crate::locale::Locale;
use crate::news::{Article, ArticleSource};

use super::keys;
use super::storage::{read_json, write_json};

/// Number of calendar days kept in the ledger.
pub const RETENTION_DAYS: usize = 30;

/// Article as remembered in history, stamped with when it was cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryArticle {
  pub title: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub source: ArticleSource,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub published_at: Option<String>,
  #[serde(default)]
  pub url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url_to_image: Option<String>,
  #[serde(rename = "cachedAt")]
  pub cached_at_ms: i64,
}

impl HistoryArticle {
  /// Project a fetched article, dropping empty optional fields.
  pub fn project(article: &Article, cached_at_ms: i64) -> Self {
    Self {
      title: article.title.clone(),
      description: Some(article.description.clone()).filter(|d| !d.is_empty()),
      source: article.source.clone(),
      published_at: article.published_at.clone(),
      url: article.url.clone(),
      url_to_image: article.url_to_image.clone(),
      cached_at_ms,
    }
  }

  pub fn identity(&self) -> &str {
    if self.url.is_empty() {
      &self.title
    } else {
      &self.url
    }
  }

  /// Rebuild a displayable article. Categories are not kept in history.
  pub fn to_article(&self) -> Article {
    Article {
      title: self.title.clone(),
      description: self.description.clone().unwrap_or_default(),
      url: self.url.clone(),
      url_to_image: self.url_to_image.clone(),
      published_at: self.published_at.clone(),
      source: self.source.clone(),
      category: Vec::new(),
    }
  }
}

/// Everything fetched on one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryDay {
  /// Day key, identical to the ledger key
  pub date: String,
  #[serde(default)]
  pub articles: Vec<HistoryArticle>,
  #[serde(rename = "fetchedAt")]
  pub fetched_at_ms: i64,
}

/// Ledger ordered by day key, which is also chronological order.
pub type Ledger = BTreeMap<String, HistoryDay>;

/// A day of history prepared for display, newest first.
#[derive(Debug, Clone)]
pub struct HistorySection {
  pub label: String,
  pub day_key: String,
  pub is_today: bool,
  pub articles: Vec<HistoryArticle>,
}

/// Put `day` in place of whatever the ledger held for the same key.
fn replace_day(ledger: &mut Ledger, day: HistoryDay) {
  ledger.insert(day.date.clone(), day);
}

/// Drop the oldest days until at most `max_days` remain.
fn enforce_retention(ledger: &mut Ledger, max_days: usize) {
  while ledger.len() > max_days {
    if let Some((evicted, _)) = ledger.pop_first() {
      debug!(day = %evicted, "evicting history day");
    }
  }
}

/// Sum of article counts across all days.
pub fn total_articles(ledger: &Ledger) -> usize {
  ledger.values().map(|day| day.articles.len()).sum()
}

/// Number of days present.
pub fn day_count(ledger: &Ledger) -> usize {
  ledger.len()
}

/// Persistent history of fetched articles, one entry per calendar day.
#[derive(Clone)]
pub struct HistoryLedger {
  store: SharedStore,
}

impl HistoryLedger {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  /// Record today's fetch, replacing any earlier fetch from the same day.
  ///
  /// Failures are logged and never reach the caller.
  pub async fn record_fetch(&self, articles: &[Article]) {
    self.record_fetch_at(articles, Local::now()).await
  }

  pub async fn record_fetch_at(&self, articles: &[Article], now: DateTime<Local>) {
    if let Err(e) = self.try_record(articles, now).await {
      warn!(error = %e, "failed to record history");
    }
  }

  async fn try_record(&self, articles: &[Article], now: DateTime<Local>) -> Result<()> {
    let key = day_key(&now);
    let now_ms = now.timestamp_millis();

    let day = HistoryDay {
      date: key.clone(),
      articles: articles
        .iter()
        .map(|a| HistoryArticle::project(a, now_ms))
        .collect(),
      fetched_at_ms: now_ms,
    };

    // Unreadable and undecodable ledgers both start over from empty.
    let mut ledger = self.load().await;
    replace_day(&mut ledger, day);
    enforce_retention(&mut ledger, RETENTION_DAYS);

    write_json(self.store.as_ref(), keys::HISTORY, &ledger).await?;
    debug!(day = %key, count = articles.len(), days = ledger.len(), "history recorded");
    Ok(())
  }

  /// The whole ledger, empty when absent or unreadable.
  pub async fn load(&self) -> Ledger {
    match self.try_load().await {
      Ok(ledger) => ledger,
      Err(e) => {
        warn!(error = %e, "failed to read history");
        Ledger::new()
      }
    }
  }

  /// Like [`load`](Self::load) but surfaces store failures.
  pub(crate) async fn try_load(&self) -> Result<Ledger> {
    Ok(
      read_json(self.store.as_ref(), keys::HISTORY)
        .await?
        .unwrap_or_default(),
    )
  }

  /// Group the ledger into labelled sections, newest day first.
  pub fn sections(ledger: &Ledger, locale: Locale, now: DateTime<Local>) -> Vec<HistorySection> {
    let today = day_key(&now);
    ledger
      .iter()
      .rev()
      .map(|(key, day)| HistorySection {
        label: group_label_at(key, locale, now),
        day_key: key.clone(),
        is_today: *key == today,
        articles: day.articles.clone(),
      })
      .collect()
  }
}
