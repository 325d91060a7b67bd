//! [`AggregateStore`] — uniform collection CRUD over the [`KeyValue`] port.
//!
//! Every entity type gets the same list/get/save/delete semantics without
//! re-implementing search/merge logic per type. A store owns the serialized
//! representation of one collection; consumers hold transient in-memory
//! copies that the store's contents always supersede.
//!
//! Every operation round-trips the entire collection (read-modify-write of
//! one JSON array), so writes are atomic at collection granularity and cost
//! O(collection size). There is no cross-process mutual exclusion: two
//! writers racing on the same key lose one write at whole-collection
//! granularity.

use std::{marker::PhantomData, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
  error::{Error, Result},
  kv::KeyValue,
};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Any record with a unique, stable, opaque string identifier.
///
/// Within one collection under [`InsertPolicy::Upsert`], no two records
/// share an id.
pub trait Identifiable {
  fn id(&self) -> &str;
}

// ─── Insert policy ───────────────────────────────────────────────────────────

/// How [`AggregateStore::save`] treats an id collision.
///
/// Behavior is configuration, not subclassing: append-only collections
/// (contact messages) declare [`AlwaysPrepend`](InsertPolicy::AlwaysPrepend)
/// at construction instead of overriding `save`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPolicy {
  /// Replace an existing record with the same id in place; prepend new ids.
  #[default]
  Upsert,
  /// Always prepend, even when the id collides with an existing record.
  /// Duplicate ids are allowed under this policy.
  AlwaysPrepend,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// Collection CRUD for one entity type, bound to one collection key.
///
/// Constructed explicitly at wiring time (see [`Stores`](crate::Stores)) —
/// there are no ambient singletons, so tests construct their own against a
/// [`MemoryKv`](crate::MemoryKv).
///
/// Read failures (missing key, I/O error, corrupt JSON) are absorbed: the
/// collection reads as empty and the failure is logged. Write failures
/// propagate so callers can reconcile their in-memory copy.
pub struct AggregateStore<T, K> {
  kv:     Arc<K>,
  key:    &'static str,
  policy: InsertPolicy,
  _item:  PhantomData<fn() -> T>,
}

impl<T, K> AggregateStore<T, K>
where
  T: Identifiable + Serialize + DeserializeOwned,
  K: KeyValue,
{
  /// Bind a store to `key` with the default [`InsertPolicy::Upsert`].
  pub fn new(kv: Arc<K>, key: &'static str) -> Self {
    Self::with_policy(kv, key, InsertPolicy::default())
  }

  pub fn with_policy(kv: Arc<K>, key: &'static str, policy: InsertPolicy) -> Self {
    Self {
      kv,
      key,
      policy,
      _item: PhantomData,
    }
  }

  pub fn collection_key(&self) -> &'static str {
    self.key
  }

  /// Deserialize the full collection. Absent, unreadable, or corrupt data
  /// all read as the empty collection — "no data yet", never an error.
  pub fn get_all(&self) -> Vec<T> {
    let raw = match self.kv.get(self.key) {
      Ok(Some(raw)) => raw,
      Ok(None) => return Vec::new(),
      Err(e) => {
        tracing::warn!(key = self.key, error = %e, "collection read failed");
        return Vec::new();
      }
    };

    match serde_json::from_str(&raw) {
      Ok(items) => items,
      Err(e) => {
        tracing::warn!(key = self.key, error = %e, "corrupt collection; reading as empty");
        Vec::new()
      }
    }
  }

  /// First record matching `id`, or `None` — absence is not an error.
  pub fn get_by_id(&self, id: &str) -> Option<T> {
    self.get_all().into_iter().find(|item| item.id() == id)
  }

  /// Upsert or prepend `item` per the store's [`InsertPolicy`], then persist
  /// the whole collection as one write.
  ///
  /// Under `Upsert`, a record with a matching id is replaced in place
  /// (keeping its position); a new id is prepended so the most recently
  /// created item lists first.
  pub fn save(&self, item: T) -> Result<()> {
    let mut items = self.get_all();

    match self.policy {
      InsertPolicy::Upsert => {
        if let Some(slot) = items.iter_mut().find(|e| e.id() == item.id()) {
          *slot = item;
        } else {
          items.insert(0, item);
        }
      }
      InsertPolicy::AlwaysPrepend => items.insert(0, item),
    }

    self.persist(&items)
  }

  /// Remove the first record matching `id`. Deleting an absent id is a
  /// no-op, not an error.
  pub fn delete(&self, id: &str) -> Result<()> {
    let mut items = self.get_all();
    let Some(pos) = items.iter().position(|e| e.id() == id) else {
      return Ok(());
    };
    items.remove(pos);
    self.persist(&items)
  }

  /// Apply `mutate` to the record matching `id` and persist the full
  /// collection. Returns whether a record matched.
  ///
  /// This is the narrow mutation behind status updates — the caller never
  /// has to reassemble the whole record.
  pub fn update_with(&self, id: &str, mutate: impl FnOnce(&mut T)) -> Result<bool> {
    let mut items = self.get_all();
    let Some(item) = items.iter_mut().find(|e| e.id() == id) else {
      return Ok(false);
    };
    mutate(item);
    self.persist(&items)?;
    Ok(true)
  }

  fn persist(&self, items: &[T]) -> Result<()> {
    let raw = serde_json::to_string(items)?;
    self
      .kv
      .set(self.key, &raw)
      .map_err(|e| Error::Storage(Box::new(e)))
  }
}
