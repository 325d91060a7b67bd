//! Core types and storage abstractions for the Praxis content-management
//! system.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod careers;
pub mod content;
pub mod error;
pub mod guard;
pub mod id;
pub mod kv;
pub mod messages;
pub mod programs;
pub mod registry;
pub mod session;
pub mod store;
pub mod users;

pub use error::{Error, Result};
pub use kv::{KeyValue, MemoryKv};
pub use registry::Stores;
pub use session::{Principal, SessionState, SessionToken, SessionVault};
pub use store::{AggregateStore, Identifiable, InsertPolicy};
