//! The `KeyValue` port — the persistence medium behind every store.
//!
//! The trait is implemented by storage backends (e.g. `praxis-store-sqlite`).
//! Higher layers depend on this abstraction, not on any concrete backend, so
//! tests can swap in [`MemoryKv`] without touching the code under test.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::Mutex,
};

/// A flat string-keyed, string-valued persistence medium.
///
/// Values are whole UTF-8 JSON documents; an absent key is not an error.
/// Writes replace the entire value under a key in one step — there are no
/// partial or ranged updates.
pub trait KeyValue: Send + Sync + 'static {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the value stored under `key`, or `None` if the key is absent.
  fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

  /// Store `value` under `key`, replacing any previous value.
  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

  /// Remove `key`. Removing an absent key is a no-op.
  fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

// ─── In-memory backend ───────────────────────────────────────────────────────

/// An in-memory [`KeyValue`] backend — useful for testing.
#[derive(Debug, Default)]
pub struct MemoryKv {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValue for MemoryKv {
  type Error = Infallible;

  fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
    let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
    Ok(entries.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
    let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
    entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<(), Self::Error> {
    let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
    entries.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_get_remove_roundtrip() {
    let kv = MemoryKv::new();
    assert_eq!(kv.get("a").unwrap(), None);

    kv.set("a", "[1,2,3]").unwrap();
    assert_eq!(kv.get("a").unwrap().as_deref(), Some("[1,2,3]"));

    kv.set("a", "[]").unwrap();
    assert_eq!(kv.get("a").unwrap().as_deref(), Some("[]"));

    kv.remove("a").unwrap();
    assert_eq!(kv.get("a").unwrap(), None);

    // Removing an absent key is a no-op.
    kv.remove("a").unwrap();
  }
}
