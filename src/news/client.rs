use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::time::Duration;
use url::Url;

use crate::config::NewsConfig;

use super::api_types::ApiHeadlinesResponse;
use super::types::Article;

/// Header the proxy checks when it is protected by a shared secret.
const API_TOKEN_HEADER: &str = "x-api-token";

/// Upper bound for the health probe only; headline requests use the
/// transport defaults.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// A remote provider of headlines.
#[async_trait]
pub trait NewsSource: Send + Sync {
  /// Fetch the latest headlines, optionally restricted to a comma-separated
  /// list of source ids.
  ///
  /// A response the provider itself flags as failed is an error; an empty
  /// but successful response is returned as an empty list.
  async fn top_headlines(&self, sources: Option<&str>, page_size: u32) -> Result<Vec<Article>>;
}

/// HTTP client for the news proxy
#[derive(Clone)]
pub struct NewsClient {
  http: reqwest::Client,
  base_url: Url,
  api_token: Option<String>,
}

impl NewsClient {
  pub fn new(config: &NewsConfig, api_token: Option<String>) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid news base url {}: {}", config.base_url, e))?;

    let http = reqwest::Client::builder()
      .user_agent(concat!("briefing/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url,
      api_token,
    })
  }

  /// Build `<base>/<segments...>` keeping any path prefix of the base url.
  fn endpoint(&self, segments: &[&str]) -> Result<Url> {
    let mut url = self.base_url.clone();
    url
      .path_segments_mut()
      .map_err(|_| eyre!("News base url cannot be a base: {}", self.base_url))?
      .pop_if_empty()
      .extend(segments);
    Ok(url)
  }

  /// Url of the headlines endpoint with its query parameters.
  pub fn headlines_url(&self, sources: Option<&str>, page_size: u32) -> Result<Url> {
    let mut url = self.endpoint(&["api", "top-headlines"])?;
    {
      let mut query = url.query_pairs_mut();
      if let Some(sources) = sources.filter(|s| !s.is_empty()) {
        query.append_pair("sources", sources);
      }
      query.append_pair("pageSize", &page_size.to_string());
    }
    Ok(url)
  }

  /// Whether the proxy answers its health endpoint.
  pub async fn is_reachable(&self) -> bool {
    let url = match self.endpoint(&["health"]) {
      Ok(url) => url,
      Err(_) => return false,
    };

    match self.http.get(url).timeout(HEALTH_TIMEOUT).send().await {
      Ok(resp) => resp.status().is_success(),
      Err(e) => {
        tracing::debug!(error = %e, "health probe failed");
        false
      }
    }
  }
}

#[async_trait]
impl NewsSource for NewsClient {
  async fn top_headlines(&self, sources: Option<&str>, page_size: u32) -> Result<Vec<Article>> {
    let url = self.headlines_url(sources, page_size)?;

    let mut request = self.http.get(url);
    if let Some(token) = &self.api_token {
      request = request.header(API_TOKEN_HEADER, token);
    }

    let response: ApiHeadlinesResponse = request
      .send()
      .await
      .map_err(|e| eyre!("Failed to fetch headlines: {}", e))?
      .error_for_status()
      .map_err(|e| eyre!("News endpoint returned an error: {}", e))?
      .json()
      .await
      .map_err(|e| eyre!("Failed to parse headlines: {}", e))?;

    if !response.is_ok() {
      return Err(eyre!(
        "News endpoint reported status {}: {}",
        response.status,
        response.message.as_deref().unwrap_or("no message")
      ));
    }

    Ok(
      response
        .articles
        .into_iter()
        .map(|a| a.into_article())
        .collect(),
    )
  }
}
