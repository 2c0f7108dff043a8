use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outlet an article was published by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
  pub name: String,
}

/// A headline as served by the news proxy and kept in the local cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url_to_image: Option<String>,
  /// ISO-8601 publication time as reported upstream
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub published_at: Option<String>,
  #[serde(default)]
  pub source: ArticleSource,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub category: Vec<String>,
}

impl Article {
  /// Identity used for equality and favorites: the url, or the title when
  /// the url is missing.
  pub fn identity(&self) -> &str {
    if self.url.is_empty() {
      &self.title
    } else {
      &self.url
    }
  }

  /// Parsed publication time, if present and well-formed.
  pub fn published(&self) -> Option<DateTime<Utc>> {
    parse_timestamp(self.published_at.as_deref()?)
  }
}

/// Parse an upstream timestamp. Accepts RFC 3339 and the bare
/// "YYYY-MM-DD HH:MM:SS" (UTC) form some providers emit.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .ok()
    .map(|dt| dt.and_utc())
}
