//! nestlist - task lists with arbitrarily nested items
//!
//! Users own ordered lists; each list holds a tree of items of unbounded
//! depth. The [`tree`] module keeps every item's level, list and sibling
//! position consistent through creates, edits, moves and deletes.

pub mod cli;
pub mod domain;
pub mod storage;
pub mod tree;

pub use domain::{Item, ItemId, ItemNode, ItemUpdate, ListId, ParentChange, TaskList, User, UserId};
pub use tree::{TreeError, TreeService};
