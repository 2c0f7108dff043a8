//! News source selection.

use tracing::warn;

use crate::cache::{keys, read_json, write_json};
use crate::db::SharedStore;
use crate::locale::Locale;

/// A news outlet the proxy can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
  pub id: &'static str,
  pub name: &'static str,
  pub country: &'static str,
}

const fn source(id: &'static str, name: &'static str, country: &'static str) -> SourceInfo {
  SourceInfo { id, name, country }
}

pub const AVAILABLE_SOURCES_FR: &[SourceInfo] = &[
  source("le-monde", "Le Monde", "fr"),
  source("les-echos", "Les Échos", "fr"),
  source("liberation", "Libération", "fr"),
  source("le-figaro", "Le Figaro", "fr"),
  source("france-info", "France Info", "fr"),
  source("lequipe", "L'Équipe", "fr"),
  source("france-culture", "France Culture", "fr"),
  source("01net", "01net", "fr"),
  source("bfm-tv", "BFM TV", "fr"),
  source("tf1", "TF1 Info", "fr"),
];

pub const AVAILABLE_SOURCES_EN: &[SourceInfo] = &[
  source("bbc-news", "BBC News", "gb"),
  source("the-guardian", "The Guardian", "gb"),
  source("reuters", "Reuters", "us"),
  source("associated-press", "Associated Press", "us"),
  source("cnn", "CNN", "us"),
  source("the-verge", "The Verge", "us"),
  source("espn", "ESPN", "us"),
  source("techcrunch", "TechCrunch", "us"),
];

/// Sources offered for a display language.
pub fn sources_for(locale: Locale) -> &'static [SourceInfo] {
  match locale {
    Locale::Fr => AVAILABLE_SOURCES_FR,
    Locale::En => AVAILABLE_SOURCES_EN,
  }
}

/// Join selected ids into the request parameter. `None` means no filter.
pub fn build_sources_param(selected: &[String]) -> Option<String> {
  if selected.is_empty() {
    None
  } else {
    Some(selected.join(","))
  }
}

/// Persisted source selection. An empty selection means all sources.
#[derive(Clone)]
pub struct SourcePreferences {
  store: SharedStore,
}

impl SourcePreferences {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  pub async fn load_selected(&self) -> Vec<String> {
    match read_json(self.store.as_ref(), keys::SOURCES).await {
      Ok(selected) => selected.unwrap_or_default(),
      Err(e) => {
        warn!(error = %e, "failed to read source preferences");
        Vec::new()
      }
    }
  }

  pub async fn save_selected(&self, ids: &[String]) {
    if let Err(e) = write_json(self.store.as_ref(), keys::SOURCES, ids).await {
      warn!(error = %e, "failed to save source preferences");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::MemoryStore;
  use std::sync::Arc;

  #[test]
  fn test_build_sources_param() {
    assert_eq!(build_sources_param(&[]), None);
    let selected = vec!["le-monde".to_string(), "les-echos".to_string()];
    assert_eq!(
      build_sources_param(&selected).as_deref(),
      Some("le-monde,les-echos")
    );
  }

  #[test]
  fn test_sources_for_locale() {
    assert!(sources_for(Locale::Fr).iter().any(|s| s.id == "le-monde"));
    assert!(sources_for(Locale::En).iter().all(|s| s.country != "fr"));
  }

  #[tokio::test]
  async fn test_selection_round_trip() {
    let prefs = SourcePreferences::new(Arc::new(MemoryStore::new()));
    assert!(prefs.load_selected().await.is_empty());

    let ids = vec!["bbc-news".to_string()];
    prefs.save_selected(&ids).await;
    assert_eq!(prefs.load_selected().await, ids);

    prefs.save_selected(&[]).await;
    assert!(prefs.load_selected().await.is_empty());
  }
}
