//! Session persistence over the [`KeyValue`] port.
//!
//! Each session occupies two keys in the medium: a profile record (the
//! [`Principal`]) and a token record (absolute expiry), both namespaced by
//! the SHA-256 digest of the bearer token so the medium never holds a usable
//! token. Sessions are reissued, not extended: when a token is within the
//! near-expiry threshold, [`SessionVault::refresh`] opens a fresh session
//! and retires the old keys.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::{
  error::{Error, Result},
  kv::KeyValue,
  users::Role,
};

const PROFILE_KEY_PREFIX: &str = "praxis.session.profile.";
const TOKEN_KEY_PREFIX: &str = "praxis.session.token.";

// ─── Principal ───────────────────────────────────────────────────────────────

/// The authenticated actor: identity, role, and profile attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
  pub id:    String,
  pub role:  Role,
  pub name:  String,
  pub email: String,
  pub phone: String,
}

/// Where the session check currently stands.
///
/// `Unknown` is the state before any check has completed — consumers hold it
/// while the initial session load is in flight so the guard can defer
/// instead of redirecting prematurely. [`SessionVault::resolve`] itself only
/// ever returns the two settled states.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
  Unknown,
  Authenticated(Principal),
  Unauthenticated,
}

/// An opaque bearer token handed to the client on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenRecord {
  /// Absolute expiry, Unix seconds.
  expires_at: i64,
}

// ─── Vault ───────────────────────────────────────────────────────────────────

/// Issues, resolves, refreshes, and closes sessions.
///
/// Read-path failures (missing keys, corrupt records, medium errors) settle
/// to `Unauthenticated`; write-path failures propagate.
pub struct SessionVault<K> {
  kv:                Arc<K>,
  ttl:               Duration,
  refresh_threshold: Duration,
}

impl<K: KeyValue> SessionVault<K> {
  pub fn new(kv: Arc<K>, ttl: Duration, refresh_threshold: Duration) -> Self {
    Self {
      kv,
      ttl,
      refresh_threshold,
    }
  }

  /// Open a session for `principal` and return the bearer token.
  pub fn open(&self, principal: &Principal) -> Result<SessionToken> {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);
    let digest = token_digest(&token);

    let record = TokenRecord {
      expires_at: (Utc::now() + self.ttl).timestamp(),
    };

    self.set(&profile_key(&digest), &serde_json::to_string(principal)?)?;
    self.set(&token_key(&digest), &serde_json::to_string(&record)?)?;

    Ok(SessionToken(token))
  }

  /// Resolve `token` to a settled [`SessionState`].
  ///
  /// An expired session is removed on sight.
  pub fn resolve(&self, token: &str) -> SessionState {
    let digest = token_digest(token);

    let Some(record) = self.read_json::<TokenRecord>(&token_key(&digest)) else {
      return SessionState::Unauthenticated;
    };

    if record.expires_at <= Utc::now().timestamp() {
      self.purge(&digest);
      return SessionState::Unauthenticated;
    }

    match self.read_json::<Principal>(&profile_key(&digest)) {
      Some(principal) => SessionState::Authenticated(principal),
      None => SessionState::Unauthenticated,
    }
  }

  /// Reissue the session when its remaining lifetime is below the
  /// near-expiry threshold; otherwise hand back the current token.
  ///
  /// Returns `None` when the token no longer maps to a live session.
  pub fn refresh(&self, token: &str) -> Result<Option<SessionToken>> {
    let digest = token_digest(token);

    let Some(record) = self.read_json::<TokenRecord>(&token_key(&digest)) else {
      return Ok(None);
    };

    let now = Utc::now().timestamp();
    if record.expires_at <= now {
      self.purge(&digest);
      return Ok(None);
    }

    if record.expires_at - now > self.refresh_threshold.num_seconds() {
      return Ok(Some(SessionToken(token.to_string())));
    }

    let Some(principal) = self.read_json::<Principal>(&profile_key(&digest)) else {
      return Ok(None);
    };

    let reissued = self.open(&principal)?;
    self.close(token)?;
    Ok(Some(reissued))
  }

  /// Remove both session keys. Closing an unknown token is a no-op.
  pub fn close(&self, token: &str) -> Result<()> {
    let digest = token_digest(token);
    self
      .kv
      .remove(&token_key(&digest))
      .map_err(|e| Error::Storage(Box::new(e)))?;
    self
      .kv
      .remove(&profile_key(&digest))
      .map_err(|e| Error::Storage(Box::new(e)))?;
    Ok(())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self
      .kv
      .set(key, value)
      .map_err(|e| Error::Storage(Box::new(e)))
  }

  fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
    let raw = match self.kv.get(key) {
      Ok(Some(raw)) => raw,
      Ok(None) => return None,
      Err(e) => {
        tracing::warn!(key, error = %e, "session read failed");
        return None;
      }
    };

    match serde_json::from_str(&raw) {
      Ok(value) => Some(value),
      Err(e) => {
        tracing::warn!(key, error = %e, "corrupt session record");
        None
      }
    }
  }

  /// Best-effort removal of an expired session's keys.
  fn purge(&self, digest: &str) {
    for key in [token_key(digest), profile_key(digest)] {
      if let Err(e) = self.kv.remove(&key) {
        tracing::warn!(key, error = %e, "failed to remove expired session key");
      }
    }
  }
}

fn profile_key(digest: &str) -> String {
  format!("{PROFILE_KEY_PREFIX}{digest}")
}

fn token_key(digest: &str) -> String {
  format!("{TOKEN_KEY_PREFIX}{digest}")
}

fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}
