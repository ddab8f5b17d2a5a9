//! List and user domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ListId, UserId};

/// A user who owns lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Always stored lower-cased
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A container of items owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: ListId,
    pub user_id: UserId,
    pub title: String,
    /// Order among the owner's lists; ties are broken by id
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

impl TaskList {
    /// Returns true if `user` owns this list
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}

/// A list with the number of its top-level items, for overviews
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    #[serde(flatten)]
    pub list: TaskList,
    pub item_count: usize,
}
