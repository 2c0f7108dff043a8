//! JSON (de)serialization helpers over the raw string store.

use color_eyre::{eyre::eyre, Result};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::KeyValueStore;

/// Read and decode the JSON value under `key`.
///
/// Store failures are returned as errors. A missing key or a value that no
/// longer decodes both yield `Ok(None)`: stale or corrupt data is treated as
/// absent, never repaired.
pub(crate) async fn read_json<T: DeserializeOwned>(
  store: &dyn KeyValueStore,
  key: &str,
) -> Result<Option<T>> {
  let Some(raw) = store.get(key).await? else {
    return Ok(None);
  };

  match serde_json::from_str(&raw) {
    Ok(value) => Ok(Some(value)),
    Err(e) => {
      tracing::warn!(key, error = %e, "discarding unreadable stored value");
      Ok(None)
    }
  }
}

/// Encode `value` as JSON and store it under `key`.
pub(crate) async fn write_json<T: Serialize + ?Sized>(
  store: &dyn KeyValueStore,
  key: &str,
  value: &T,
) -> Result<()> {
  let data =
    serde_json::to_string(value).map_err(|e| eyre!("Failed to serialize {}: {}", key, e))?;
  store.set(key, &data).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::MemoryStore;

  #[tokio::test]
  async fn test_corrupt_value_reads_as_absent() {
    let store = MemoryStore::new();
    store.set("briefing_articles", "{not json").await.unwrap();
    let value: Option<Vec<String>> = read_json(&store, "briefing_articles").await.unwrap();
    assert!(value.is_none());
  }

  #[tokio::test]
  async fn test_write_then_read() {
    let store = MemoryStore::new();
    write_json(&store, "briefing_sources", &["bbc-news", "reuters"])
      .await
      .unwrap();
    let value: Option<Vec<String>> = read_json(&store, "briefing_sources").await.unwrap();
    assert_eq!(value.unwrap(), vec!["bbc-news", "reuters"]);
  }
}
