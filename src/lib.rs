//! Password generation with an irreversible record of what was generated.
//!
//! Passwords are drawn from configurable character pools; on request their SHA-256
//! digest and metadata are persisted to a JSON file or a SQL table, and can later be
//! searched by label or matched against a candidate password.

pub mod cli;
pub mod core;
pub mod crypto;
pub mod db;
pub mod generators;
pub mod models;
pub mod storage;
pub mod utils;

pub use crate::generators::{generate_password, CharsetPolicy, GeneratorError, PasswordRequest};
pub use crate::models::{PoolOptions, StoredEntry};
pub use crate::storage::{Backend, FileStore, PasswordStore, StorageError};
pub use crate::db::RelationalStore;
