//! Row-level access to users, lists and items
//!
//! [`Store`] borrows either the bare connection or an open transaction
//! (a `rusqlite::Transaction` derefs to a `Connection`), so the same queries
//! serve reads and transactional mutations.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row};

use crate::domain::{Item, TaskList, User};

/// Query surface over one connection or transaction
pub struct Store<'c> {
    conn: &'c Connection,
}

impl<'c> Store<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn conn(&self) -> &'c Connection {
        self.conn
    }
}

/// Columns selected for every item query, in [`item_from_row`] order
pub(crate) const ITEM_COLUMNS: &str = "id, list_id, parent_id, title, completed, position, level";

/// Columns selected for every list query, in [`list_from_row`] order
pub(crate) const LIST_COLUMNS: &str = "id, user_id, title, position, created_at";

/// Columns selected for every user query, in [`user_from_row`] order
pub(crate) const USER_COLUMNS: &str = "id, name, email, created_at";

pub(crate) fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        list_id: row.get(1)?,
        parent_id: row.get(2)?,
        title: row.get(3)?,
        completed: row.get(4)?,
        position: row.get(5)?,
        level: row.get(6)?,
    })
}

pub(crate) fn list_from_row(row: &Row<'_>) -> rusqlite::Result<TaskList> {
    Ok(TaskList {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        position: row.get(3)?,
        created_at: timestamp(row, 4)?,
    })
}

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: timestamp(row, 3)?,
    })
}

/// Reads an RFC 3339 text column
fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
