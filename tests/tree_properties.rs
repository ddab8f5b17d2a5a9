//! Property tests for the hierarchy invariants
//!
//! Random sequences of creates, moves and deletes are replayed against an
//! in-memory database; after every step the stored tree must still satisfy
//! the level, list and ordering rules.

use std::collections::HashSet;

use nestlist::domain::{ItemNode, ListId, ParentChange};
use nestlist::storage::Database;
use nestlist::tree::TreeService;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    /// Create in list `list`, under the `parent`-th existing item of that list
    Create { list: usize, parent: Option<usize> },
    /// Move the `item`-th item to `list`, under the `parent`-th item there
    Move {
        item: usize,
        list: usize,
        parent: Option<usize>,
    },
    /// Delete the `item`-th item
    Delete { item: usize },
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..2usize, proptest::option::of(0..16usize))
            .prop_map(|(list, parent)| Op::Create { list, parent }),
        3 => (0..16usize, 0..2usize, proptest::option::of(0..16usize))
            .prop_map(|(item, list, parent)| Op::Move { item, list, parent }),
        1 => (0..16usize).prop_map(|item| Op::Delete { item }),
    ]
}

struct World {
    db: Database,
    lists: [ListId; 2],
}

impl World {
    fn new() -> Self {
        let mut db = Database::open_in_memory().unwrap();
        let mut service = TreeService::new(&mut db);
        let user = service.add_user("Ann", "ann@example.com").unwrap();
        let home = service.create_list(user.id, "Home").unwrap().id;
        let work = service.create_list(user.id, "Work").unwrap().id;
        Self {
            db,
            lists: [home, work],
        }
    }

    fn service(&mut self) -> TreeService<'_> {
        TreeService::new(&mut self.db)
    }

    /// Flattened pre-order view of one list
    fn flat(&mut self, list: ListId) -> Vec<ItemNode> {
        let tree = self.service().get_tree(list).unwrap();
        tree.iter().flat_map(|n| n.walk().cloned()).collect()
    }

    fn all(&mut self) -> Vec<ItemNode> {
        let lists = self.lists;
        lists.iter().flat_map(|&l| self.flat(l)).collect()
    }

    fn apply(&mut self, op: &Op) {
        match *op {
            Op::Create { list, parent } => {
                let list_id = self.lists[list];
                let existing = self.flat(list_id);
                let parent = parent.and_then(|i| existing.get(i)).map(|n| n.item.id);
                self.service().create_item(list_id, "node", parent).unwrap();
            }
            Op::Move { item, list, parent } => {
                let all = self.all();
                let Some(node) = all.get(item) else { return };
                let list_id = self.lists[list];
                let target = self.flat(list_id);
                let change = match parent.and_then(|i| target.get(i)) {
                    Some(p) => ParentChange::Under(p.item.id),
                    None => ParentChange::TopLevel,
                };

                let would_cycle = match change {
                    ParentChange::Under(p) => node.walk().any(|n| n.item.id == p),
                    _ => false,
                };

                let result = self.service().move_item(node.item.id, Some(list_id), change);
                if would_cycle {
                    let err = result.unwrap_err();
                    assert!(err.is_validation());
                } else {
                    let moved = result.unwrap();
                    assert_eq!(moved.list_id, list_id);
                }
            }
            Op::Delete { item } => {
                let all = self.all();
                let Some(node) = all.get(item) else { return };
                let removed = self.service().delete_item(node.item.id).unwrap();
                assert_eq!(removed, node.size());
            }
        }
    }
}

fn assert_consistent(nodes: &[ItemNode], list: ListId) {
    let mut stack: Vec<(&ItemNode, Option<&ItemNode>)> = nodes.iter().map(|n| (n, None)).collect();
    while let Some((node, parent)) = stack.pop() {
        let item = &node.item;
        assert_eq!(item.list_id, list);
        match parent {
            None => {
                assert_eq!(item.level, 1);
                assert_eq!(item.parent_id, None);
            }
            Some(parent) => {
                assert_eq!(item.level, parent.item.level + 1);
                assert_eq!(item.parent_id, Some(parent.item.id));
            }
        }

        let keys: Vec<(i64, i64)> = node
            .children
            .iter()
            .map(|c| (c.item.position, c.item.id.get()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);

        stack.extend(node.children.iter().map(|c| (c, Some(node))));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn hierarchy_invariants_hold(ops in proptest::collection::vec(arb_op(), 1..40)) {
        let mut world = World::new();

        for op in &ops {
            world.apply(op);

            let lists = world.lists;
            for list in lists {
                let tree = world.service().get_tree(list).unwrap();
                assert_consistent(&tree, list);

                let again = world.service().get_tree(list).unwrap();
                prop_assert_eq!(&tree, &again);
            }

            prop_assert!(world.service().check_integrity(None).unwrap().is_empty());
        }

        // every stored item is reachable from some root
        let reachable: HashSet<_> = world.all().into_iter().map(|n| n.item.id).collect();
        let stored = world.db.store().all_items().unwrap();
        prop_assert_eq!(reachable.len(), stored.len());
        prop_assert!(stored.iter().all(|item| reachable.contains(&item.id)));
    }

    #[test]
    fn new_items_append_after_max(count in 1..20usize) {
        let mut world = World::new();
        let list = world.lists[0];

        for expected in 1..=count {
            let item = world.service().create_item(list, "node", None).unwrap();
            prop_assert_eq!(item.position, expected as i64);
        }
    }
}
