//! Position allocation for new siblings
//!
//! Positions are append-only: a new member gets one more than the current
//! maximum of its group. Gaps are never filled and nothing is renumbered.
//! Callers run allocation and insert in the same immediate transaction, so
//! two writers cannot both observe the same maximum.

use crate::domain::{SiblingScope, UserId};
use crate::storage::Store;

/// Position of the first member of an empty group
pub const FIRST_POSITION: i64 = 1;

fn after(max: Option<i64>) -> i64 {
    max.map_or(FIRST_POSITION, |max| max + 1)
}

/// Next free position among the items of `scope`
pub fn next_position(store: &Store<'_>, scope: SiblingScope) -> rusqlite::Result<i64> {
    let max = store.max_sibling_position(scope)?;
    Ok(after(max))
}

/// Next free position among a user's lists
pub fn next_list_position(store: &Store<'_>, user_id: UserId) -> rusqlite::Result<i64> {
    let max = store.max_list_position(user_id)?;
    Ok(after(max))
}
