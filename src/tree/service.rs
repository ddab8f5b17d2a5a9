//! Item operations
//!
//! Each mutation runs as one immediate transaction: validation, position
//! allocation and every write either commit together or not at all.

use crate::domain::{
    normalize_title, validate_position, Item, ItemId, ItemNode, ItemUpdate, ListId, ParentChange,
    TitleUse, ITEM_TITLE_MAX,
};
use crate::storage::{Database, NewItem, Store};

use super::error::{TreeError, TreeResult};
use super::{assembler, mutator, positions, validator, walk};

/// Entry point for tree operations on one database
pub struct TreeService<'a> {
    pub(super) db: &'a mut Database,
}

impl<'a> TreeService<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    pub(super) fn store(&self) -> Store<'_> {
        self.db.store()
    }

    /// Creates an item at the end of its sibling group
    pub fn create_item(
        &mut self,
        list_id: ListId,
        title: &str,
        parent_id: Option<ItemId>,
    ) -> TreeResult<Item> {
        let title = normalize_title(title, ITEM_TITLE_MAX, TitleUse::Create)?;

        self.db.transactionally(|store| {
            let placement = validator::resolve_new_item(store, list_id, parent_id)?;
            let position = positions::next_position(store, placement.scope())?;

            let item = store.insert_item(&NewItem {
                list_id,
                parent_id,
                title: &title,
                position,
                level: placement.level,
            })?;

            tracing::info!(
                item = %item.id,
                list = %item.list_id,
                parent = ?item.parent_id.map(ItemId::get),
                level = item.level,
                position = item.position,
                "item created"
            );
            Ok(item)
        })
    }

    /// Applies a partial update, moving the item when its list or parent changes.
    ///
    /// A move keeps the item's position unless a new one is given.
    pub fn update_item(&mut self, item_id: ItemId, update: ItemUpdate) -> TreeResult<Item> {
        self.db.transactionally(|store| {
            let item = fetch(store, item_id)?;

            let mut updated = item.clone();
            if let Some(title) = &update.title {
                updated.title = normalize_title(title, ITEM_TITLE_MAX, TitleUse::Update)?;
            }
            if let Some(completed) = update.completed {
                updated.completed = completed;
            }
            if let Some(position) = update.position {
                updated.position = validate_position(position)?;
            }

            if !update.is_move() {
                store.update_item_fields(&updated)?;
                tracing::info!(item = %item_id, "item updated");
                return Ok(updated);
            }

            let placement = validator::resolve_move(store, &item, update.list_id, update.parent)?;
            store.update_item_fields(&updated)?;
            let (moved, descendants) = mutator::apply_move(store, &updated, &placement)?;

            tracing::info!(
                item = %item_id,
                from_list = %item.list_id,
                to_list = %moved.list_id,
                parent = ?moved.parent_id.map(ItemId::get),
                from_level = item.level,
                to_level = moved.level,
                descendants,
                "item moved"
            );
            Ok(moved)
        })
    }

    /// Changes only an item's list and/or parent
    pub fn move_item(
        &mut self,
        item_id: ItemId,
        list_id: Option<ListId>,
        parent: ParentChange,
    ) -> TreeResult<Item> {
        let mut update = ItemUpdate::default().parent(parent);
        update.list_id = list_id;
        self.update_item(item_id, update)
    }

    /// Deletes an item and its whole subtree, returning how many items went
    pub fn delete_item(&mut self, item_id: ItemId) -> TreeResult<usize> {
        self.db.transactionally(|store| {
            let item = fetch(store, item_id)?;
            let descendants = walk::descendants(store, item.id)?.len();

            store.delete_subtree(item.id)?;

            tracing::info!(
                item = %item_id,
                list = %item.list_id,
                descendants,
                "item deleted"
            );
            Ok(descendants + 1)
        })
    }

    pub fn get_item(&self, item_id: ItemId) -> TreeResult<Item> {
        fetch(&self.store(), item_id)
    }

    /// The ordered, fully nested tree of a list
    pub fn get_tree(&self, list_id: ListId) -> TreeResult<Vec<ItemNode>> {
        let store = self.store();
        if store.get_list(list_id)?.is_none() {
            return Err(TreeError::not_found("List not found"));
        }
        Ok(assembler::load(&store, list_id)?)
    }
}

fn fetch(store: &Store<'_>, item_id: ItemId) -> TreeResult<Item> {
    store
        .get_item(item_id)?
        .ok_or_else(|| TreeError::not_found("Item not found"))
}
