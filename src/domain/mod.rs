//! Domain models for nestlist
//!
//! Contains users, lists and items plus field validation, without any I/O.

mod id;
mod item;
mod list;
mod validation;

pub use id::{IdError, ItemId, ListId, UserId};
pub use item::{sibling_order, Item, ItemNode, ItemUpdate, ParentChange, SiblingScope, TOP_LEVEL};
pub use list::{ListSummary, TaskList, User};
pub use validation::{
    normalize_email, normalize_name, normalize_title, validate_position, TitleUse,
    ValidationError, EMAIL_MAX, ITEM_TITLE_MAX, LIST_TITLE_MAX, USER_NAME_MAX,
};
