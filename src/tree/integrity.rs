//! Hierarchy invariant checks over stored items

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::domain::{Item, ItemId, ListId, TOP_LEVEL};

use super::error::TreeResult;
use super::service::TreeService;

/// One violated invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// Level is not 1 at the top or parent level + 1 below it
    WrongLevel {
        item: ItemId,
        expected: i64,
        found: i64,
    },
    /// Item and parent live in different lists
    ListMismatch {
        item: ItemId,
        list: ListId,
        parent_list: ListId,
    },
    /// Parent id points at nothing
    Orphan { item: ItemId, parent: ItemId },
    /// Following parents from the item leads back to it
    Cycle { item: ItemId },
}

impl IntegrityIssue {
    pub fn item(&self) -> ItemId {
        match self {
            IntegrityIssue::WrongLevel { item, .. }
            | IntegrityIssue::ListMismatch { item, .. }
            | IntegrityIssue::Orphan { item, .. }
            | IntegrityIssue::Cycle { item } => *item,
        }
    }
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::WrongLevel { item, expected, found } => {
                write!(f, "item {} has level {}, expected {}", item, found, expected)
            }
            IntegrityIssue::ListMismatch { item, list, parent_list } => write!(
                f,
                "item {} is in list {} but its parent is in list {}",
                item, list, parent_list
            ),
            IntegrityIssue::Orphan { item, parent } => {
                write!(f, "item {} points at missing parent {}", item, parent)
            }
            IntegrityIssue::Cycle { item } => write!(f, "item {} is its own ancestor", item),
        }
    }
}

impl TreeService<'_> {
    /// Checks every item (or every item of one list) against the hierarchy
    /// invariants. An empty result means the data is healthy.
    pub fn check_integrity(&self, list_id: Option<ListId>) -> TreeResult<Vec<IntegrityIssue>> {
        let items = self.store().all_items()?;
        let issues = find_issues(&items, list_id);

        tracing::debug!(
            items = items.len(),
            issues = issues.len(),
            list = ?list_id.map(ListId::get),
            "integrity checked"
        );
        Ok(issues)
    }
}

fn find_issues(items: &[Item], list_id: Option<ListId>) -> Vec<IntegrityIssue> {
    let by_id: HashMap<ItemId, &Item> = items.iter().map(|i| (i.id, i)).collect();
    let mut issues = Vec::new();

    for item in items {
        if list_id.is_some_and(|id| id != item.list_id) {
            continue;
        }

        let Some(parent_id) = item.parent_id else {
            if item.level != TOP_LEVEL {
                issues.push(IntegrityIssue::WrongLevel {
                    item: item.id,
                    expected: TOP_LEVEL,
                    found: item.level,
                });
            }
            continue;
        };

        let Some(parent) = by_id.get(&parent_id) else {
            issues.push(IntegrityIssue::Orphan {
                item: item.id,
                parent: parent_id,
            });
            continue;
        };

        if parent.list_id != item.list_id {
            issues.push(IntegrityIssue::ListMismatch {
                item: item.id,
                list: item.list_id,
                parent_list: parent.list_id,
            });
        }

        if item.level != parent.level + 1 {
            issues.push(IntegrityIssue::WrongLevel {
                item: item.id,
                expected: parent.level + 1,
                found: item.level,
            });
        }

        if on_cycle(&by_id, item) {
            issues.push(IntegrityIssue::Cycle { item: item.id });
        }
    }

    issues
}

/// Climbs parent links from `item`; true if it comes back around
fn on_cycle(by_id: &HashMap<ItemId, &Item>, item: &Item) -> bool {
    let mut seen = HashSet::new();
    let mut current = item.parent_id;

    while let Some(id) = current {
        if id == item.id {
            return true;
        }
        // a cycle above us that does not include this item
        if !seen.insert(id) {
            return false;
        }
        current = by_id.get(&id).and_then(|parent| parent.parent_id);
    }

    false
}
