//! Descendant traversal
//!
//! Walks go down `parent_id` links with an explicit stack and a visited set,
//! so a corrupted cycle in the stored data ends the walk instead of looping.

use std::collections::HashSet;

use crate::domain::{Item, ItemId};
use crate::storage::Store;

/// All descendants of `root` (not including `root`), depth-first
pub fn descendants(store: &Store<'_>, root: ItemId) -> rusqlite::Result<Vec<Item>> {
    let mut found = Vec::new();
    let mut visited = HashSet::from([root]);
    let mut stack = store.child_items(root)?;
    stack.reverse();

    while let Some(item) = stack.pop() {
        if !visited.insert(item.id) {
            tracing::warn!(item = %item.id, root = %root, "cycle in stored hierarchy, skipping");
            continue;
        }

        let mut children = store.child_items(item.id)?;
        children.reverse();
        stack.extend(children);
        found.push(item);
    }

    Ok(found)
}

/// Returns true if `candidate` sits anywhere below `root`
pub fn is_descendant(store: &Store<'_>, root: ItemId, candidate: ItemId) -> rusqlite::Result<bool> {
    let mut visited = HashSet::from([root]);
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        for child in store.child_items(id)? {
            if child.id == candidate {
                return Ok(true);
            }
            if visited.insert(child.id) {
                stack.push(child.id);
            }
        }
    }

    Ok(false)
}
