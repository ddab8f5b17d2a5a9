//! Item domain model
//!
//! Items are the nodes of a list's hierarchy. Each item points at its parent
//! through `parent_id` only; children are found by querying for that parent,
//! never through a back-reference held on the parent.

use serde::{Deserialize, Serialize};

use super::id::{ItemId, ListId};

/// Level of a top-level item
pub const TOP_LEVEL: i64 = 1;

/// A single task in a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub completed: bool,
    /// Depth in the hierarchy: 1 for top-level items, parent level + 1 below
    pub level: i64,
    /// Sibling order within `(list_id, parent_id)`
    pub position: i64,
    pub list_id: ListId,
    pub parent_id: Option<ItemId>,
}

impl Item {
    /// Level an item gets when placed under `parent` (or at the top)
    pub fn level_under(parent: Option<&Item>) -> i64 {
        parent.map_or(TOP_LEVEL, |p| p.level + 1)
    }
}

/// Ordering used for siblings everywhere: position, then id
pub fn sibling_order(a: &Item, b: &Item) -> std::cmp::Ordering {
    a.position.cmp(&b.position).then(a.id.cmp(&b.id))
}

/// A group of siblings: all items sharing a list and a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiblingScope {
    pub list_id: ListId,
    pub parent_id: Option<ItemId>,
}

/// An item together with its ordered children, as returned by tree reads.
///
/// Dropping and comparing nodes work iteratively. `Clone`, `Debug` and serde
/// still recurse once per level, so printing a chain many thousands of levels
/// deep as JSON is bounded by the thread's stack.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct ItemNode {
    #[serde(flatten)]
    pub item: Item,
    pub children: Vec<ItemNode>,
}

impl PartialEq for ItemNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.item != b.item || a.children.len() != b.children.len() {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Drop for ItemNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl ItemNode {
    pub fn leaf(item: Item) -> Self {
        Self {
            item,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Visits every node of the subtree in depth-first pre-order
    pub fn walk(&self) -> impl Iterator<Item = &ItemNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Requested change to an item's parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentChange {
    /// Leave the parent as it is, unless the update names a list: then the
    /// item becomes top-level in that list, even if it is the current one.
    #[default]
    Keep,
    /// Detach the item so it becomes top-level
    TopLevel,
    /// Re-parent under the given item
    Under(ItemId),
}

impl ParentChange {
    /// The explicitly requested parent, if any
    pub fn target(self) -> Option<ItemId> {
        match self {
            ParentChange::Under(id) => Some(id),
            ParentChange::Keep | ParentChange::TopLevel => None,
        }
    }

    /// Maps the wire convention where `0` means "top-level"
    pub fn from_raw(raw: i64) -> Self {
        if raw == 0 {
            ParentChange::TopLevel
        } else {
            ParentChange::Under(ItemId::new(raw))
        }
    }
}

/// Partial update of an item; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub position: Option<i64>,
    pub list_id: Option<ListId>,
    pub parent: ParentChange,
}

impl ItemUpdate {
    /// Returns true if the update changes the item's list or parent
    pub fn is_move(&self) -> bool {
        self.list_id.is_some() || self.parent != ParentChange::Keep
    }

    /// Returns true if nothing would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.position.is_none() && !self.is_move()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn position(mut self, position: i64) -> Self {
        self.position = Some(position);
        self
    }

    pub fn list(mut self, list_id: ListId) -> Self {
        self.list_id = Some(list_id);
        self
    }

    pub fn parent(mut self, parent: ParentChange) -> Self {
        self.parent = parent;
        self
    }
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

    #[test]
    fn level_under_parent() {
        let parent = item(1, None, 1, 3);
        assert_eq!(Item::level_under(Some(&parent)), 4);
        assert_eq!(Item::level_under(None), TOP_LEVEL);
    }

    #[test]
    fn sibling_order_breaks_ties_by_id() {
        let mut items = vec![item(3, None, 2, 1), item(2, None, 1, 1), item(1, None, 2, 1)];
        items.sort_by(sibling_order);
        let ids: Vec<i64> = items.iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn node_serializes_flat_with_children() {
        let mut root = ItemNode::leaf(item(1, None, 1, 1));
        root.children.push(ItemNode::leaf(item(2, Some(1), 1, 2)));

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["parent_id"], serde_json::Value::Null);
        assert_eq!(json["children"][0]["id"], 2);
        assert_eq!(json["children"][0]["level"], 2);
        assert_eq!(json["children"][0]["children"], serde_json::json!([]));
    }

    #[test]
    fn walk_is_preorder() {
        let mut root = ItemNode::leaf(item(1, None, 1, 1));
        let mut b = ItemNode::leaf(item(2, Some(1), 1, 2));
        b.children.push(ItemNode::leaf(item(4, Some(2), 1, 3)));
        root.children.push(b);
        root.children.push(ItemNode::leaf(item(3, Some(1), 2, 2)));

        let ids: Vec<i64> = root.walk().map(|n| n.item.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
        assert_eq!(root.size(), 4);
    }

    #[test]
    fn parent_change_from_raw() {
        assert_eq!(ParentChange::from_raw(0), ParentChange::TopLevel);
        assert_eq!(ParentChange::from_raw(5), ParentChange::Under(ItemId::new(5)));
        // only zero is special; anything else names a parent
        assert_eq!(ParentChange::from_raw(-1), ParentChange::Under(ItemId::new(-1)));
    }

    fn chain(depth: i64) -> ItemNode {
        let mut node = ItemNode::leaf(item(depth, Some(depth - 1), 1, depth));
        for id in (1..depth).rev() {
            let mut parent = ItemNode::leaf(item(id, (id > 1).then(|| id - 1), 1, id));
            parent.children.push(node);
            node = parent;
        }
        node
    }

    #[test]
    fn deep_chains_compare_and_drop_without_recursion() {
        let depth = 200_000;
        let a = chain(depth);
        let b = chain(depth);
        assert!(a == b);

        let mut c = chain(depth);
        let mut tail = &mut c;
        while !tail.children.is_empty() {
            tail = &mut tail.children[0];
        }
        tail.item.completed = true;
        assert!(a != c);
    }

    #[test]
    fn update_builder_flags_moves() {
        let update = ItemUpdate::default().title("x").completed(true);
        assert!(!update.is_move());
        assert!(!update.is_empty());

        let update = ItemUpdate::default().parent(ParentChange::TopLevel);
        assert!(update.is_move());

        assert!(ItemUpdate::default().is_empty());
    }
}
