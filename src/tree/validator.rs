//! Hierarchy validation
//!
//! Resolves where an item may go before anything is written. Rules for a move
//! are checked in a fixed order: parent exists, list exists, parent is in the
//! target list, parent is not the item or one of its descendants.

use crate::domain::{Item, ItemId, ListId, ParentChange, SiblingScope, TaskList};
use crate::storage::Store;

use super::error::{TreeError, TreeResult};
use super::walk;

/// Where a new item will be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlacement {
    pub list: TaskList,
    pub parent_id: Option<ItemId>,
    pub level: i64,
}

impl NewPlacement {
    pub fn scope(&self) -> SiblingScope {
        SiblingScope {
            list_id: self.list.id,
            parent_id: self.parent_id,
        }
    }
}

/// Resolved destination of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub list_id: ListId,
    pub parent_id: Option<ItemId>,
    pub level: i64,
    /// `level - old level`, applied to every descendant
    pub level_delta: i64,
    pub list_changed: bool,
}

/// Checks the list and optional parent of an item about to be created
pub fn resolve_new_item(
    store: &Store<'_>,
    list_id: ListId,
    parent_id: Option<ItemId>,
) -> TreeResult<NewPlacement> {
    let list = store
        .get_list(list_id)?
        .ok_or_else(|| TreeError::not_found("List not found"))?;

    let parent = match parent_id {
        Some(id) => {
            let parent = store
                .get_item(id)?
                .ok_or_else(|| TreeError::not_found("Parent item not found"))?;

            if parent.list_id != list_id {
                return Err(TreeError::validation(
                    "Parent item must belong to the same list",
                ));
            }
            Some(parent)
        }
        None => None,
    };

    Ok(NewPlacement {
        list,
        parent_id,
        level: Item::level_under(parent.as_ref()),
    })
}

/// Decides whether `item` may move to `list_id` / `parent` and where it lands.
///
/// With [`ParentChange::Keep`] the item keeps its parent only when no list is
/// named; naming a list, even the item's own, makes it top-level there.
pub fn resolve_move(
    store: &Store<'_>,
    item: &Item,
    list_id: Option<ListId>,
    parent: ParentChange,
) -> TreeResult<Placement> {
    let requested_parent = match parent.target() {
        Some(id) => Some(
            store
                .get_item(id)?
                .ok_or_else(|| TreeError::not_found("Target parent not found"))?,
        ),
        None => None,
    };

    let target_list = list_id.unwrap_or(item.list_id);
    if let Some(id) = list_id {
        if store.get_list(id)?.is_none() {
            return Err(TreeError::not_found("Target list not found"));
        }
    }
    let list_changed = target_list != item.list_id;

    if let Some(parent) = &requested_parent {
        if parent.list_id != target_list {
            return Err(TreeError::validation(
                "Parent item must belong to the target list",
            ));
        }

        if parent.id == item.id || walk::is_descendant(store, item.id, parent.id)? {
            return Err(TreeError::validation(
                "Cannot move an item under its own descendant",
            ));
        }
    }

    let resolved_parent = match parent {
        ParentChange::Under(_) => requested_parent,
        ParentChange::TopLevel => None,
        ParentChange::Keep if list_id.is_some() => None,
        ParentChange::Keep => match item.parent_id {
            Some(id) => Some(
                store
                    .get_item(id)?
                    .ok_or_else(|| TreeError::not_found("Target parent not found"))?,
            ),
            None => None,
        },
    };

    let level = Item::level_under(resolved_parent.as_ref());

    tracing::debug!(
        item = %item.id,
        list = %target_list,
        parent = ?resolved_parent.as_ref().map(|p| p.id.get()),
        level,
        "move resolved"
    );

    Ok(Placement {
        list_id: target_list,
        parent_id: resolved_parent.map(|p| p.id),
        level,
        level_delta: level - item.level,
        list_changed,
    })
}
