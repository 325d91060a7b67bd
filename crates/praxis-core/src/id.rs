//! Identifier helpers.
//!
//! Locally-created records get timestamp-based ids; the external projects
//! service issues 24-character hex ids. [`is_remote_id`] is the one piece of
//! glue this core exposes to that collaborator — callers use it to decide
//! whether an update or a create call is appropriate.

use chrono::Utc;
use rand_core::{OsRng, RngCore};

/// Generate an opaque id for a locally-created record: millisecond timestamp
/// plus a short random suffix so same-millisecond creations stay distinct.
pub fn local_id() -> String {
  let mut suffix = [0u8; 2];
  OsRng.fill_bytes(&mut suffix);
  format!("{}-{}", Utc::now().timestamp_millis(), hex::encode(suffix))
}

/// Whether `id` has the externally-issued shape: exactly 24 hex characters.
pub fn is_remote_id(id: &str) -> bool {
  id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn local_ids_are_distinct_and_not_remote_shaped() {
    let a = local_id();
    let b = local_id();
    assert_ne!(a, b);
    assert!(!is_remote_id(&a));
  }

  #[test]
  fn remote_id_shape() {
    assert!(is_remote_id("507f1f77bcf86cd799439011"));
    assert!(is_remote_id("507F1F77BCF86CD799439011"));

    assert!(!is_remote_id(""));
    assert!(!is_remote_id("507f1f77bcf86cd79943901")); // 23 chars
    assert!(!is_remote_id("507f1f77bcf86cd7994390111")); // 25 chars
    assert!(!is_remote_id("507f1f77bcf86cd79943901g")); // non-hex
    assert!(!is_remote_id("1716300000000-ab")); // local shape
  }
}
