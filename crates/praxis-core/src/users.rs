//! Registered users and their roles.
//!
//! Credentials are stored as argon2 PHC strings; hashing and verification
//! happen in the API layer. This module only defines the record shape and
//! its collection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  kv::KeyValue,
  session::Principal,
  store::{AggregateStore, Identifiable},
};

pub const USERS_KEY: &str = "praxis.users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  Student,
  Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
  pub id:            String,
  pub name:          String,
  pub email:         String,
  pub phone:         String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub role:          Role,
  pub registered_at: DateTime<Utc>,
}

impl Identifiable for UserRecord {
  fn id(&self) -> &str {
    &self.id
  }
}

impl UserRecord {
  /// The session-facing view of this user — everything but the credentials.
  pub fn principal(&self) -> Principal {
    Principal {
      id:    self.id.clone(),
      role:  self.role,
      name:  self.name.clone(),
      email: self.email.clone(),
      phone: self.phone.clone(),
    }
  }
}

pub fn user_store<K: KeyValue>(kv: Arc<K>) -> AggregateStore<UserRecord, K> {
  AggregateStore::new(kv, USERS_KEY)
}

/// Linear scan for a user by email (case-insensitive). Emails are expected
/// unique; the first match wins.
pub fn find_by_email<K: KeyValue>(
  store: &AggregateStore<UserRecord, K>,
  email: &str,
) -> Option<UserRecord> {
  store
    .get_all()
    .into_iter()
    .find(|u| u.email.eq_ignore_ascii_case(email))
}
