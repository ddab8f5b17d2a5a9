//! Item rows: the tree node store
//!
//! Every node carries only its own `parent_id`; children are looked up
//! through the `idx_items_scope` and `idx_items_parent` indexes.

use rusqlite::{params, OptionalExtension};

use super::store::{item_from_row, Store, ITEM_COLUMNS};
use crate::domain::{Item, ItemId, ListId, SiblingScope};

/// Values for a freshly inserted item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem<'a> {
    pub list_id: ListId,
    pub parent_id: Option<ItemId>,
    pub title: &'a str,
    pub position: i64,
    pub level: i64,
}

impl<'c> Store<'c> {
    /// Point lookup of an item
    pub fn get_item(&self, id: ItemId) -> rusqlite::Result<Option<Item>> {
        self.conn()
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
                params![id],
                item_from_row,
            )
            .optional()
    }

    /// Direct children of `parent`, whatever list they claim to be in
    pub fn child_items(&self, parent: ItemId) -> rusqlite::Result<Vec<Item>> {
        let mut stmt = self.conn().prepare_cached(&format!(
            "SELECT {} FROM items WHERE parent_id = ?1 ORDER BY position, id",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![parent], item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Every item of a list, in no particular tree order
    pub fn items_in_list(&self, list_id: ListId) -> rusqlite::Result<Vec<Item>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {} FROM items WHERE list_id = ?1 ORDER BY position, id",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![list_id], item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Every item in the database
    pub fn all_items(&self) -> rusqlite::Result<Vec<Item>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {} FROM items ORDER BY id", ITEM_COLUMNS))?;

        let items = stmt
            .query_map([], item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Highest position in a sibling group, `None` when the group is empty
    pub fn max_sibling_position(&self, scope: SiblingScope) -> rusqlite::Result<Option<i64>> {
        self.conn().query_row(
            "SELECT MAX(position) FROM items WHERE list_id = ?1 AND parent_id IS ?2",
            params![scope.list_id, scope.parent_id],
            |row| row.get(0),
        )
    }

    /// Number of top-level items in a list
    pub fn count_top_level(&self, list_id: ListId) -> rusqlite::Result<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM items WHERE list_id = ?1 AND parent_id IS NULL",
            params![list_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Inserts an item and returns it with its new id
    pub fn insert_item(&self, new: &NewItem<'_>) -> rusqlite::Result<Item> {
        self.conn().execute(
            "INSERT INTO items (list_id, parent_id, title, completed, position, level)
             VALUES (?1, ?2, ?3, 0, ?4, ?5)",
            params![new.list_id, new.parent_id, new.title, new.position, new.level],
        )?;

        Ok(Item {
            id: ItemId::new(self.conn().last_insert_rowid()),
            title: new.title.to_string(),
            completed: false,
            level: new.level,
            position: new.position,
            list_id: new.list_id,
            parent_id: new.parent_id,
        })
    }

    /// Writes the editable fields of `item`: title, completed and position
    pub fn update_item_fields(&self, item: &Item) -> rusqlite::Result<usize> {
        self.conn().execute(
            "UPDATE items SET title = ?1, completed = ?2, position = ?3 WHERE id = ?4",
            params![item.title, item.completed, item.position, item.id],
        )
    }

    /// Moves a node: sets its list, parent and level
    pub fn set_placement(
        &self,
        id: ItemId,
        list_id: ListId,
        parent_id: Option<ItemId>,
        level: i64,
    ) -> rusqlite::Result<usize> {
        self.conn().execute(
            "UPDATE items SET list_id = ?1, parent_id = ?2, level = ?3 WHERE id = ?4",
            params![list_id, parent_id, level, id],
        )
    }

    /// Re-homes a descendant: sets its list and level, leaving parent and position
    pub fn set_list_and_level(
        &self,
        id: ItemId,
        list_id: ListId,
        level: i64,
    ) -> rusqlite::Result<usize> {
        let mut stmt = self
            .conn()
            .prepare_cached("UPDATE items SET list_id = ?1, level = ?2 WHERE id = ?3")?;
        stmt.execute(params![list_id, level, id])
    }

    /// Deletes an item; its descendants go with it through `ON DELETE CASCADE`
    pub fn delete_subtree(&self, root: ItemId) -> rusqlite::Result<bool> {
        let deleted = self
            .conn()
            .execute("DELETE FROM items WHERE id = ?1", params![root])?;
        Ok(deleted > 0)
    }
}
