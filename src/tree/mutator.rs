//! Subtree re-homing
//!
//! A move rewrites the moved node's list, parent and level, then shifts the
//! level (and list, if it changed) of every descendant. Descendants keep their
//! parent and position, so the shape below the moved node is preserved.

use crate::domain::{Item, TOP_LEVEL};
use crate::storage::Store;

use super::validator::Placement;
use super::walk;

/// Applies a validated placement to `item` and its subtree.
///
/// Must run inside the caller's transaction so the node and its descendants
/// change together. Returns the moved item and the number of descendants
/// rewritten.
pub fn apply_move(
    store: &Store<'_>,
    item: &Item,
    placement: &Placement,
) -> rusqlite::Result<(Item, usize)> {
    store.set_placement(item.id, placement.list_id, placement.parent_id, placement.level)?;

    let mut rewritten = 0;
    if placement.level_delta != 0 || placement.list_changed {
        for descendant in walk::descendants(store, item.id)? {
            let level = (descendant.level + placement.level_delta).max(TOP_LEVEL);
            store.set_list_and_level(descendant.id, placement.list_id, level)?;
            rewritten += 1;
        }
    }

    let moved = Item {
        list_id: placement.list_id,
        parent_id: placement.parent_id,
        level: placement.level,
        ..item.clone()
    };

    tracing::debug!(
        item = %moved.id,
        descendants = rewritten,
        delta = placement.level_delta,
        "subtree re-homed"
    );

    Ok((moved, rewritten))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemId, ListId, ParentChange};
    use crate::storage::{Database, NewItem};
    use crate::tree::validator::resolve_move;
    use chrono::Utc;

    fn setup() -> (Database, ListId, ListId) {
        let db = Database::open_in_memory().unwrap();
        let (home, work) = {
            let store = db.store();
            let user = store.insert_user("Ann", "ann@example.com", Utc::now()).unwrap();
            let home = store.insert_list(user.id, "Home", 1, Utc::now()).unwrap().id;
            let work = store.insert_list(user.id, "Work", 2, Utc::now()).unwrap().id;
            (home, work)
        };
        (db, home, work)
    }

    fn add(store: &Store<'_>, list_id: ListId, parent: Option<&Item>, position: i64) -> Item {
        store
            .insert_item(&NewItem {
                list_id,
                parent_id: parent.map(|p| p.id),
                title: "node",
                position,
                level: Item::level_under(parent),
            })
            .unwrap()
    }

    fn load(store: &Store<'_>, id: ItemId) -> Item {
        store.get_item(id).unwrap().unwrap()
    }

    #[test]
    fn moving_under_new_root_shifts_levels() {
        let (db, home, _) = setup();
        let store = db.store();

        let a = add(&store, home, None, 1);
        let b = add(&store, home, Some(&a), 1);
        let c = add(&store, home, None, 2);

        let placement = resolve_move(&store, &a, None, ParentChange::Under(c.id)).unwrap();
        let (moved, rewritten) = apply_move(&store, &a, &placement).unwrap();

        assert_eq!(rewritten, 1);
        assert_eq!(moved.level, 2);
        assert_eq!(moved.parent_id, Some(c.id));

        let a = load(&store, a.id);
        let b_after = load(&store, b.id);
        assert_eq!(a.level, 2);
        assert_eq!(a.parent_id, Some(c.id));
        assert_eq!(b_after.level, 3);
        assert_eq!(b_after.parent_id, Some(a.id));
        assert_eq!(b_after.position, b.position);
    }

    #[test]
    fn moving_across_lists_rehomes_descendants() {
        let (db, home, work) = setup();
        let store = db.store();

        let a = add(&store, home, None, 1);
        let b = add(&store, home, Some(&a), 4);
        let c = add(&store, home, Some(&b), 7);
        let target = add(&store, work, None, 1);

        let placement = resolve_move(&store, &a, Some(work), ParentChange::Under(target.id)).unwrap();
        let (_, rewritten) = apply_move(&store, &a, &placement).unwrap();
        assert_eq!(rewritten, 2);

        for (id, level, parent, position) in [(b.id, 3, a.id, 4), (c.id, 4, b.id, 7)] {
            let node = load(&store, id);
            assert_eq!(node.list_id, work);
            assert_eq!(node.level, level);
            assert_eq!(node.parent_id, Some(parent));
            assert_eq!(node.position, position);
        }
    }

    #[test]
    fn same_level_move_skips_descendants() {
        let (db, home, _) = setup();
        let store = db.store();

        let a = add(&store, home, None, 1);
        let b = add(&store, home, Some(&a), 1);
        let c = add(&store, home, None, 2);
        let _d = add(&store, home, Some(&b), 1);

        // b (level 2) moves from a to c: still level 2
        let placement = resolve_move(&store, &b, None, ParentChange::Under(c.id)).unwrap();
        let (_, rewritten) = apply_move(&store, &b, &placement).unwrap();
        assert_eq!(rewritten, 0);
        assert_eq!(load(&store, b.id).parent_id, Some(c.id));
    }

    #[test]
    fn levels_never_drop_below_top() {
        let (db, home, _) = setup();
        let store = db.store();

        let a = add(&store, home, None, 1);
        let b = add(&store, home, Some(&a), 1);

        let forged = Placement {
            list_id: home,
            parent_id: None,
            level: 1,
            level_delta: -5,
            list_changed: false,
        };
        apply_move(&store, &a, &forged).unwrap();

        assert_eq!(load(&store, b.id).level, TOP_LEVEL);
    }
}
