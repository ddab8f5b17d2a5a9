//! # Storage Layer
//!
//! SQLite persistence for nestlist.
//!
//! ## Tables
//!
//! | Table | Rows | Cascade |
//! |-------|------|---------|
//! | `users` | list owners | deleting a user deletes their lists |
//! | `lists` | item containers | deleting a list deletes its items |
//! | `items` | hierarchy nodes | deleting an item deletes its subtree |
//!
//! Items reference their parent through `items.parent_id` only. Cascades are
//! enforced by SQLite foreign keys, which [`Database`] switches on for every
//! connection.
//!
//! ## Concurrency Safety
//!
//! - Mutations run through [`Database::transactionally`] (`BEGIN IMMEDIATE`)
//! - WAL journal: readers never block on a writer
//!
//! ## Key Types
//!
//! - [`Database`] - Connection, schema and transactions
//! - [`Store`] - Row-level queries over a connection or transaction
//! - [`Config`] - User configuration

mod config;
mod db;
mod lists;
mod nodes;
mod store;

pub use config::{Config, ConfigError, GlobalConfig, LogConfig, LogFormat, OutputFormat, CONFIG_ENV};
pub use db::{Database, DatabaseError, DEFAULT_BUSY_TIMEOUT};
pub use nodes::NewItem;
pub use store::Store;
