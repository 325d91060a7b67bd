//! SQLite backend for the Praxis key-value port.
//!
//! One `kv(key, value)` table holds a whole serialized collection per row,
//! matching the port's atomic whole-value write contract.

mod kv;
mod schema;

pub mod error;

pub use error::{Error, Result};
pub use kv::SqliteKv;
