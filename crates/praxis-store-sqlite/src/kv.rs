//! [`SqliteKv`] — the SQLite implementation of [`KeyValue`].

use std::{
  path::Path,
  sync::{Arc, Mutex, MutexGuard},
};

use praxis_core::KeyValue;
use rusqlite::{Connection, OptionalExtension as _};

use crate::{Result, schema::SCHEMA};

/// A key-value medium backed by a single SQLite file.
///
/// Access is serialized behind one connection: every port operation is one
/// short statement against local storage, which matches the synchronous,
/// fast-local contract of the port. Cloning is cheap — the connection is
/// reference-counted.
#[derive(Clone)]
pub struct SqliteKv {
  conn: Arc<Mutex<Connection>>,
}

impl SqliteKv {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::init(Connection::open(path)?)
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    Self::init(Connection::open_in_memory()?)
  }

  fn init(conn: Connection) -> Result<Self> {
    conn.execute_batch(SCHEMA)?;
    Ok(Self {
      conn: Arc::new(Mutex::new(conn)),
    })
  }

  fn conn(&self) -> MutexGuard<'_, Connection> {
    self.conn.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl KeyValue for SqliteKv {
  type Error = crate::Error;

  fn get(&self, key: &str) -> Result<Option<String>> {
    let value = self
      .conn()
      .query_row(
        "SELECT value FROM kv WHERE key = ?1",
        rusqlite::params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self.conn().execute(
      "INSERT INTO kv (key, value) VALUES (?1, ?2)
       ON CONFLICT(key) DO UPDATE SET value = excluded.value",
      rusqlite::params![key, value],
    )?;
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    self
      .conn()
      .execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
    Ok(())
  }
}
