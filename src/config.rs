use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::locale::Locale;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub news: NewsConfig,
  /// Seconds between automatic refresh cycles in watch mode
  #[serde(default = "default_refresh_interval_secs")]
  pub refresh_interval_secs: u64,
  /// Seconds between connectivity probes in watch mode
  #[serde(default = "default_probe_interval_secs")]
  pub probe_interval_secs: u64,
  #[serde(default)]
  pub locale: Locale,
  /// Database path (defaults to $XDG_DATA_HOME/briefing/store.db)
  pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
  /// Base url of the news proxy
  #[serde(default = "default_base_url")]
  pub base_url: String,
  /// Number of headlines requested per fetch
  #[serde(default = "default_page_size")]
  pub page_size: u32,
}

fn default_refresh_interval_secs() -> u64 {
  10 * 60
}

fn default_probe_interval_secs() -> u64 {
  30
}

fn default_base_url() -> String {
  "http://localhost:3001".to_string()
}

fn default_page_size() -> u32 {
  10
}

impl Default for NewsConfig {
  fn default() -> Self {
    Self {
      base_url: default_base_url(),
      page_size: default_page_size(),
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      news: NewsConfig::default(),
      refresh_interval_secs: default_refresh_interval_secs(),
      probe_interval_secs: default_probe_interval_secs(),
      locale: Locale::default(),
      database: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./briefing.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/briefing/config.yaml
  ///
  /// Without any file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("briefing.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("briefing").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents).map_err(|e| eyre!("{}", e))?;

    if config.refresh_interval_secs == 0 {
      return Err(eyre!("refresh_interval_secs must be greater than zero"));
    }
    if config.probe_interval_secs == 0 {
      return Err(eyre!("probe_interval_secs must be greater than zero"));
    }

    Ok(config)
  }

  pub fn refresh_interval(&self) -> Duration {
    Duration::from_secs(self.refresh_interval_secs)
  }

  pub fn probe_interval(&self) -> Duration {
    Duration::from_secs(self.probe_interval_secs)
  }

  /// Get the news proxy token from the environment, if one is set.
  ///
  /// The proxy runs unprotected in local development, so a missing token is
  /// not an error.
  pub fn get_api_token() -> Option<String> {
    std::env::var("BRIEFING_API_TOKEN")
      .ok()
      .filter(|t| !t.is_empty())
  }
}
