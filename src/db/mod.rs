//! Durable string key-value storage.
//!
//! Every persisted piece of briefing state is a single string value under a
//! namespaced key. Stores only promise per-key atomicity; there are no
//! multi-key transactions.

mod memory;
pub mod schema;

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub use memory::MemoryStore;

/// Asynchronous string-keyed, string-valued store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
  /// Read the value stored under `key`, if any.
  async fn get(&self, key: &str) -> Result<Option<String>>;

  /// Replace the value stored under `key`.
  async fn set(&self, key: &str, value: &str) -> Result<()>;

  /// Delete `key`. Removing a missing key is not an error.
  async fn remove(&self, key: &str) -> Result<()>;

  /// List every key currently stored, in ascending order.
  async fn list_keys(&self) -> Result<Vec<String>>;
}

/// Shared handle passed to every component that persists state.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// SQLite-backed store holding all keys in a single table.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open or create the store at the default location.
  pub fn open() -> Result<Self> {
    let path = Self::default_path()?;
    Self::open_at(&path)
  }

  /// Open or create the store at an explicit path.
  pub fn open_at(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create database directory: {}", e))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open database at {}: {}", path.display(), e))?;

    Self::from_connection(conn)
  }

  /// Open a throwaway in-memory database.
  pub fn open_in_memory() -> Result<Self> {
    let conn =
      Connection::open_in_memory().map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;
    Self::from_connection(conn)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;
    Ok(store)
  }

  /// Get the default database path
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("briefing").join("store.db"))
  }

  /// Run database migrations
  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(schema::SCHEMA)
      .map_err(|e| eyre!("Failed to run migrations: {}", e))?;

    Ok(())
  }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
  async fn get(&self, key: &str) -> Result<Option<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .query_row(
        "SELECT value FROM kv_store WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read key {}: {}", key, e))
  }

  async fn set(&self, key: &str, value: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO kv_store (key, value, updated_at)
         VALUES (?, ?, datetime('now'))",
        params![key, value],
      )
      .map_err(|e| eyre!("Failed to write key {}: {}", key, e))?;

    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute("DELETE FROM kv_store WHERE key = ?", params![key])
      .map_err(|e| eyre!("Failed to delete key {}: {}", key, e))?;

    Ok(())
  }

  async fn list_keys(&self) -> Result<Vec<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let mut stmt = conn
      .prepare("SELECT key FROM kv_store ORDER BY key")
      .map_err(|e| eyre!("Failed to prepare query: {}", e))?;

    let keys = stmt
      .query_map([], |row| row.get::<_, String>(0))
      .map_err(|e| eyre!("Failed to list keys: {}", e))?
      .collect::<rusqlite::Result<Vec<_>>>()
      .map_err(|e| eyre!("Failed to read key row: {}", e))?;

    Ok(keys)
  }
}

#[cfg(test)]
pub(crate) mod testing {
  use super::*;

  /// Store whose every operation fails, as a full disk or a corrupt
  /// database would.
  pub struct FailingStore;

  #[async_trait]
  impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
      Err(eyre!("read refused for {}", key))
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
      Err(eyre!("quota exceeded writing {}", key))
    }

    async fn remove(&self, key: &str) -> Result<()> {
      Err(eyre!("delete refused for {}", key))
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
      Err(eyre!("listing refused"))
    }
  }

  /// Memory store that refuses the first `failed_reads` reads and any
  /// write to `refused_key`.
  #[derive(Default)]
  pub struct FlakyStore {
    pub inner: MemoryStore,
    pub failed_reads: std::sync::atomic::AtomicUsize,
    pub refused_key: Option<&'static str>,
  }

  #[async_trait]
  impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
      use std::sync::atomic::Ordering;
      let pending = self.failed_reads.load(Ordering::SeqCst);
      if pending > 0 {
        self.failed_reads.store(pending - 1, Ordering::SeqCst);
        return Err(eyre!("read refused for {}", key));
      }
      self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
      if self.refused_key == Some(key) {
        return Err(eyre!("quota exceeded writing {}", key));
      }
      self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
      self.inner.remove(key).await
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
      self.inner.list_keys().await
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_sqlite_get_set_overwrite() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(store.get("briefing_articles").await.unwrap(), None);

    store.set("briefing_articles", "[1]").await.unwrap();
    store.set("briefing_articles", "[2]").await.unwrap();
    assert_eq!(
      store.get("briefing_articles").await.unwrap().as_deref(),
      Some("[2]")
    );
  }

  #[tokio::test]
  async fn test_sqlite_list_and_remove() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.set("b", "2").await.unwrap();
    store.set("a", "1").await.unwrap();
    assert_eq!(store.list_keys().await.unwrap(), vec!["a", "b"]);

    store.remove("a").await.unwrap();
    store.remove("missing").await.unwrap();
    assert_eq!(store.list_keys().await.unwrap(), vec!["b"]);
  }

  #[tokio::test]
  async fn test_sqlite_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("briefing-db-test-{}", std::process::id()));
    let path = dir.join("store.db");
    {
      let store = SqliteStore::open_at(&path).unwrap();
      store.set("briefing_last_sync", "42").await.unwrap();
    }
    let store = SqliteStore::open_at(&path).unwrap();
    assert_eq!(
      store.get("briefing_last_sync").await.unwrap().as_deref(),
      Some("42")
    );
    let _ = std::fs::remove_dir_all(dir);
  }
}
