//! List and user rows

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use super::store::{list_from_row, user_from_row, Store, LIST_COLUMNS, USER_COLUMNS};
use crate::domain::{ListId, TaskList, User, UserId};

impl<'c> Store<'c> {
    /// Point lookup of a list
    pub fn get_list(&self, id: ListId) -> rusqlite::Result<Option<TaskList>> {
        self.conn()
            .query_row(
                &format!("SELECT {} FROM lists WHERE id = ?1", LIST_COLUMNS),
                params![id],
                list_from_row,
            )
            .optional()
    }

    /// A user's lists ordered by position, ties broken by id
    pub fn lists_for_user(&self, user_id: UserId) -> rusqlite::Result<Vec<TaskList>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {} FROM lists WHERE user_id = ?1 ORDER BY position, id",
            LIST_COLUMNS
        ))?;

        let lists = stmt
            .query_map(params![user_id], list_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(lists)
    }

    /// Highest position among a user's lists, `None` if they have none
    pub fn max_list_position(&self, user_id: UserId) -> rusqlite::Result<Option<i64>> {
        self.conn().query_row(
            "SELECT MAX(position) FROM lists WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
    }

    pub fn insert_list(
        &self,
        user_id: UserId,
        title: &str,
        position: i64,
        created_at: DateTime<Utc>,
    ) -> rusqlite::Result<TaskList> {
        self.conn().execute(
            "INSERT INTO lists (user_id, title, position, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, title, position, created_at.to_rfc3339()],
        )?;

        Ok(TaskList {
            id: ListId::new(self.conn().last_insert_rowid()),
            user_id,
            title: title.to_string(),
            position,
            created_at,
        })
    }

    /// Writes a list's title and position
    pub fn update_list_fields(&self, list: &TaskList) -> rusqlite::Result<usize> {
        self.conn().execute(
            "UPDATE lists SET title = ?1, position = ?2 WHERE id = ?3",
            params![list.title, list.position, list.id],
        )
    }

    /// Deletes a list; its items go with it through `ON DELETE CASCADE`
    pub fn delete_list(&self, id: ListId) -> rusqlite::Result<bool> {
        let deleted = self
            .conn()
            .execute("DELETE FROM lists WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn get_user(&self, id: UserId) -> rusqlite::Result<Option<User>> {
        self.conn()
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()
    }

    /// Looks a user up by an already lower-cased email
    pub fn get_user_by_email(&self, email: &str) -> rusqlite::Result<Option<User>> {
        self.conn()
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                params![email],
                user_from_row,
            )
            .optional()
    }

    pub fn insert_user(
        &self,
        name: &str,
        email: &str,
        created_at: DateTime<Utc>,
    ) -> rusqlite::Result<User> {
        self.conn().execute(
            "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![name, email, created_at.to_rfc3339()],
        )?;

        Ok(User {
            id: UserId::new(self.conn().last_insert_rowid()),
            name: name.to_string(),
            email: email.to_string(),
            created_at,
        })
    }
}
