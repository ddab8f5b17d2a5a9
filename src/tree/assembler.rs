//! Nested tree view of a list
//!
//! The list's items are loaded in one query, grouped by parent id and then
//! composed bottom-up with an explicit stack of open frames. Depth never
//! touches the call stack.

use std::collections::{HashMap, HashSet};
use std::vec;

use crate::domain::{sibling_order, Item, ItemId, ItemNode, ListId};
use crate::storage::Store;

/// Loads and assembles the tree of `list_id`.
///
/// The list itself is not checked; an unknown list yields an empty tree.
pub fn load(store: &Store<'_>, list_id: ListId) -> rusqlite::Result<Vec<ItemNode>> {
    let items = store.items_in_list(list_id)?;
    Ok(assemble(items))
}

/// Builds ordered top-level nodes with their children from a flat item set.
///
/// Siblings are ordered by position, then id. Items whose parent is not in
/// the set are unreachable and left out.
pub fn assemble(items: Vec<Item>) -> Vec<ItemNode> {
    let total = items.len();

    let mut by_parent: HashMap<Option<ItemId>, Vec<Item>> = HashMap::new();
    for item in items {
        by_parent.entry(item.parent_id).or_default().push(item);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by(sibling_order);
    }

    let mut roots = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<(ItemNode, vec::IntoIter<Item>)> = Vec::new();

    let top = by_parent.remove(&None).unwrap_or_default();
    for root in top {
        if !visited.insert(root.id) {
            continue;
        }
        let children = by_parent.remove(&Some(root.id)).unwrap_or_default();
        stack.push((ItemNode::leaf(root), children.into_iter()));

        while let Some((_, pending)) = stack.last_mut() {
            match pending.next() {
                Some(child) => {
                    if !visited.insert(child.id) {
                        tracing::warn!(item = %child.id, "item reached twice while assembling tree");
                        continue;
                    }
                    let grandchildren = by_parent.remove(&Some(child.id)).unwrap_or_default();
                    stack.push((ItemNode::leaf(child), grandchildren.into_iter()));
                }
                None => {
                    let Some((done, _)) = stack.pop() else { break };
                    match stack.last_mut() {
                        Some((parent, _)) => parent.children.push(done),
                        None => roots.push(done),
                    }
                }
            }
        }
    }

    let unreachable = total - visited.len();
    if unreachable > 0 {
        tracing::warn!(unreachable, "items without a reachable parent left out of tree");
    }
    tracing::debug!(nodes = visited.len(), roots = roots.len(), "tree assembled");

    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, parent: Option<i64>, position: i64, level: i64) -> Item {
        Item {
            id: ItemId::new(id),
            title: format!("item {}", id),
            completed: false,
            level,
            position,
            list_id: ListId::new(1),
            parent_id: parent.map(ItemId::new),
        }
    }

    fn shape(nodes: &[ItemNode]) -> Vec<(i64, Vec<i64>)> {
        nodes
            .iter()
            .map(|n| (n.item.id.get(), n.children.iter().map(|c| c.item.id.get()).collect()))
            .collect()
    }

    #[test]
    fn orders_siblings_by_position_then_id() {
        let nodes = assemble(vec![
            item(1, None, 2, 1),
            item(2, None, 1, 1),
            item(3, Some(1), 5, 2),
            item(4, Some(1), 5, 2),
            item(5, Some(1), 1, 2),
            item(6, None, 2, 1),
        ]);

        assert_eq!(
            shape(&nodes),
            vec![(2, vec![]), (1, vec![5, 3, 4]), (6, vec![])]
        );
    }

    #[test]
    fn handles_deep_chains() {
        let depth = 100_000;
        let mut items = vec![item(1, None, 1, 1)];
        for id in 2..=depth {
            items.push(item(id, Some(id - 1), 1, id));
        }

        let nodes = assemble(items);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].size(), depth as usize);

        let deepest = nodes[0].walk().last().unwrap();
        assert_eq!(deepest.item.id.get(), depth);
        assert!(deepest.children.is_empty());
    }

    #[test]
    fn unreachable_items_are_left_out() {
        let nodes = assemble(vec![
            item(1, None, 1, 1),
            item(2, Some(99), 1, 2),
            // two-node cycle with no root
            item(3, Some(4), 1, 2),
            item(4, Some(3), 1, 3),
        ]);

        assert_eq!(shape(&nodes), vec![(1, vec![])]);
    }

    #[test]
    fn empty_list() {
        assert!(assemble(Vec::new()).is_empty());
    }

    #[test]
    fn load_matches_store() {
        use crate::storage::{Database, NewItem};
        use chrono::Utc;

        let db = Database::open_in_memory().unwrap();
        let store = db.store();
        let user = store.insert_user("Ann", "ann@example.com", Utc::now()).unwrap();
        let list = store.insert_list(user.id, "Home", 1, Utc::now()).unwrap();

        let a = store
            .insert_item(&NewItem { list_id: list.id, parent_id: None, title: "a", position: 1, level: 1 })
            .unwrap();
        let b = store
            .insert_item(&NewItem { list_id: list.id, parent_id: Some(a.id), title: "b", position: 1, level: 2 })
            .unwrap();

        let first = load(&store, list.id).unwrap();
        let second = load(&store, list.id).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].children[0].item, b);
    }
}
