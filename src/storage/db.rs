//! SQLite database handle
//!
//! Owns the connection, creates the schema and hands out [`Store`] views,
//! either over the bare connection (reads) or over one write transaction.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use thiserror::Error;

use super::Store;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database schema version {found} is newer than supported version {supported}")]
    NewerSchema { found: i32, supported: i32 },
}

/// Default time a writer waits for SQLite's lock before giving up
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// The nestlist database
pub struct Database {
    /// Path to the SQLite file, `None` for in-memory databases
    path: Option<PathBuf>,

    conn: Connection,
}

impl Database {
    /// Schema version - bump when the schema changes
    const SCHEMA_VERSION: i32 = 1;

    /// Opens or creates the database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Opens or creates the database at `path` with a custom busy timeout
    pub fn open_with_timeout(path: &Path, busy_timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        // WAL lets readers proceed while a mutation holds the write lock
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let mut db = Self {
            path: Some(path.to_path_buf()),
            conn,
        };
        db.configure(busy_timeout)?;
        db.ensure_schema()?;

        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Opens a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;

        let mut db = Self { path: None, conn };
        db.configure(DEFAULT_BUSY_TIMEOUT)?;
        db.ensure_schema()?;

        Ok(db)
    }

    fn configure(&mut self, busy_timeout: Duration) -> Result<()> {
        // Cascading deletes of lists and subtrees depend on this
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.busy_timeout(busy_timeout)?;
        Ok(())
    }

    /// Ensures the schema is up to date
    fn ensure_schema(&mut self) -> Result<()> {
        let current_version = self.schema_version()?;

        match current_version {
            0 => self.create_schema(),
            v if v == Self::SCHEMA_VERSION => Ok(()),
            found => Err(DatabaseError::NewerSchema {
                found,
                supported: Self::SCHEMA_VERSION,
            }
            .into()),
        }
    }

    /// Gets the current schema version
    fn schema_version(&self) -> Result<i32> {
        let result: Option<i32> = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .optional()?;

        Ok(result.unwrap_or(0))
    }

    /// Creates the schema in an empty database
    fn create_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS lists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                list_id INTEGER NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
                parent_id INTEGER REFERENCES items(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                position INTEGER NOT NULL DEFAULT 0,
                level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1)
            );

            CREATE INDEX IF NOT EXISTS idx_lists_user ON lists(user_id, position);
            CREATE INDEX IF NOT EXISTS idx_items_scope ON items(list_id, parent_id, position);
            CREATE INDEX IF NOT EXISTS idx_items_parent ON items(parent_id);
            ",
        )?;

        tx.execute_batch(&format!("PRAGMA user_version = {}", Self::SCHEMA_VERSION))?;
        tx.commit()?;

        tracing::info!(version = Self::SCHEMA_VERSION, "database schema created");
        Ok(())
    }

    /// Read access outside any explicit transaction
    pub fn store(&self) -> Store<'_> {
        Store::new(&self.conn)
    }

    /// Runs `f` inside one write transaction.
    ///
    /// The transaction starts with `BEGIN IMMEDIATE`, so the write lock is held
    /// from the first read: a position computed inside `f` cannot be taken by
    /// another writer before `f` inserts it. The transaction commits when `f`
    /// returns `Ok` and rolls back on `Err` or unwinding.
    pub fn transactionally<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Store<'_>) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let value = {
            let store = Store::new(&tx);
            f(&store)
        };

        match value {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                tx.rollback()?;
                Err(err)
            }
        }
    }

    /// Returns the path to the database file, if on disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}
