//! Serde-deserializable types matching the news proxy's responses.
//!
//! Upstream fields are frequently null, so everything is optional here and
//! normalized when converted into [`Article`].

use serde::Deserialize;

use super::types::{Article, ArticleSource};

/// Status value the proxy uses to signal a usable response.
pub const STATUS_OK: &str = "ok";

#[derive(Debug, Deserialize)]
pub struct ApiSource {
  pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticle {
  pub title: Option<String>,
  pub description: Option<String>,
  pub url: Option<String>,
  pub url_to_image: Option<String>,
  pub published_at: Option<String>,
  pub source: Option<ApiSource>,
  pub category: Option<Vec<String>>,
}

impl ApiArticle {
  pub fn into_article(self) -> Article {
    Article {
      title: self.title.unwrap_or_default(),
      description: self.description.unwrap_or_default(),
      url: self.url.unwrap_or_default(),
      url_to_image: self.url_to_image.filter(|u| !u.is_empty()),
      published_at: self.published_at,
      source: ArticleSource {
        name: self.source.and_then(|s| s.name).unwrap_or_default(),
      },
      category: self.category.unwrap_or_default(),
    }
  }
}

/// `GET /api/top-headlines` response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHeadlinesResponse {
  pub status: String,
  #[serde(default)]
  pub total_results: u64,
  #[serde(default)]
  pub articles: Vec<ApiArticle>,
  /// Present when the proxy itself failed
  pub message: Option<String>,
}

impl ApiHeadlinesResponse {
  pub fn is_ok(&self) -> bool {
    self.status == STATUS_OK
  }
}
