//! Starred articles.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::{keys, read_json, write_json};
use crate::db::SharedStore;
use crate::news::{Article, Category};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
  #[serde(flatten)]
  pub article: Article,
  #[serde(rename = "favoritedAt")]
  pub favorited_at_ms: i64,
}

/// Favorites list, most recently starred first, unique by article identity.
#[derive(Clone)]
pub struct Favorites {
  store: SharedStore,
}

impl Favorites {
  pub fn new(store: SharedStore) -> Self {
    Self { store }
  }

  pub async fn load(&self) -> Vec<Favorite> {
    match read_json(self.store.as_ref(), keys::FAVORITES).await {
      Ok(favorites) => favorites.unwrap_or_default(),
      Err(e) => {
        warn!(error = %e, "failed to read favorites");
        Vec::new()
      }
    }
  }

  pub async fn is_favorite(&self, article: &Article) -> bool {
    self
      .load()
      .await
      .iter()
      .any(|f| f.article.identity() == article.identity())
  }

  /// Star or unstar `article`. Returns whether it is now a favorite.
  pub async fn toggle(&self, article: &Article) -> bool {
    let mut favorites = self.load().await;
    let position = favorites
      .iter()
      .position(|f| f.article.identity() == article.identity());

    let starred = match position {
      Some(index) => {
        favorites.remove(index);
        false
      }
      None => {
        favorites.insert(
          0,
          Favorite {
            article: article.clone(),
            favorited_at_ms: Utc::now().timestamp_millis(),
          },
        );
        true
      }
    };

    if let Err(e) = write_json(self.store.as_ref(), keys::FAVORITES, &favorites).await {
      warn!(error = %e, "failed to save favorites");
    }
    starred
  }

  /// Categories the reader follows, in the order they were added.
  pub async fn load_categories(&self) -> Vec<Category> {
    match read_json(self.store.as_ref(), keys::FAVORITE_CATEGORIES).await {
      Ok(categories) => categories.unwrap_or_default(),
      Err(e) => {
        warn!(error = %e, "failed to read favorite categories");
        Vec::new()
      }
    }
  }

  /// Follow or unfollow `category` and return the updated list.
  pub async fn toggle_category(&self, category: Category) -> Vec<Category> {
    let mut categories = self.load_categories().await;
    match categories.iter().position(|c| *c == category) {
      Some(index) => {
        categories.remove(index);
      }
      None => categories.push(category),
    }

    if let Err(e) = write_json(self.store.as_ref(), keys::FAVORITE_CATEGORIES, &categories).await {
      warn!(error = %e, "failed to save favorite categories");
    }
    categories
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::{KeyValueStore, MemoryStore};
  use crate::news::demo_articles;
  use std::sync::Arc;

  #[tokio::test]
  async fn test_toggle_adds_then_removes() {
    let favorites = Favorites::new(Arc::new(MemoryStore::new()));
    let articles = demo_articles(Utc::now());

    assert!(favorites.toggle(&articles[0]).await);
    assert!(favorites.toggle(&articles[1]).await);
    assert!(favorites.is_favorite(&articles[0]).await);

    let loaded = favorites.load().await;
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].article, articles[1]);

    assert!(!favorites.toggle(&articles[0]).await);
    assert!(!favorites.is_favorite(&articles[0]).await);
    assert_eq!(favorites.load().await.len(), 1);
  }

  #[tokio::test]
  async fn test_identity_falls_back_to_title() {
    let favorites = Favorites::new(Arc::new(MemoryStore::new()));
    let mut article = demo_articles(Utc::now()).remove(0);
    article.url.clear();

    favorites.toggle(&article).await;
    let mut same_title = article.clone();
    same_title.description = "edited".to_string();
    assert!(favorites.is_favorite(&same_title).await);
  }

  #[tokio::test]
  async fn test_toggle_category_keeps_insertion_order() {
    let favorites = Favorites::new(Arc::new(MemoryStore::new()));
    assert!(favorites.load_categories().await.is_empty());

    favorites.toggle_category(Category::Sports).await;
    let followed = favorites.toggle_category(Category::Science).await;
    assert_eq!(followed, vec![Category::Sports, Category::Science]);

    let followed = favorites.toggle_category(Category::Sports).await;
    assert_eq!(followed, vec![Category::Science]);
    assert_eq!(favorites.load_categories().await, vec![Category::Science]);
  }

  #[tokio::test]
  async fn test_categories_stored_as_keys() {
    let store = Arc::new(MemoryStore::new());
    let favorites = Favorites::new(store.clone());
    favorites.toggle_category(Category::Economie).await;
    assert_eq!(
      store.get(keys::FAVORITE_CATEGORIES).await.unwrap().as_deref(),
      Some("[\"economie\"]")
    );

    store.set(keys::FAVORITE_CATEGORIES, "not json").await.unwrap();
    assert!(favorites.load_categories().await.is_empty());
  }
}
