//! Contact-form messages — an append-only log, newest first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  kv::KeyValue,
  store::{AggregateStore, Identifiable, InsertPolicy},
};

pub const MESSAGES_KEY: &str = "praxis.contact_messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
  #[default]
  New,
  Read,
  Replied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
  pub id:          String,
  pub name:        String,
  pub email:       String,
  pub subject:     String,
  pub body:        String,
  pub received_at: DateTime<Utc>,
  pub status:      MessageStatus,
}

impl Identifiable for ContactMessage {
  fn id(&self) -> &str {
    &self.id
  }
}

/// Messages always prepend, even on an id collision — the collection is a
/// log, not a set. Status updates go through
/// [`update_with`](AggregateStore::update_with), which targets one record
/// without re-inserting it.
pub fn message_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<ContactMessage, K> {
  AggregateStore::with_policy(kv, MESSAGES_KEY, InsertPolicy::AlwaysPrepend)
}
