//! Users and the lists they own

use chrono::Utc;

use crate::domain::{
    normalize_email, normalize_name, normalize_title, validate_position, ListId, ListSummary,
    TaskList, TitleUse, User, UserId, LIST_TITLE_MAX,
};
use crate::storage::Store;

use super::error::{TreeError, TreeResult};
use super::positions;
use super::service::TreeService;

impl TreeService<'_> {
    /// Registers a user; emails are unique after lower-casing
    pub fn add_user(&mut self, name: &str, email: &str) -> TreeResult<User> {
        let name = normalize_name(name)?;
        let email = normalize_email(email)?;

        self.db.transactionally(|store| {
            if store.get_user_by_email(&email)?.is_some() {
                return Err(TreeError::Conflict("Email already exists".to_string()));
            }

            let user = store.insert_user(&name, &email, Utc::now())?;
            tracing::info!(user = %user.id, "user added");
            Ok(user)
        })
    }

    pub fn get_user(&self, user_id: UserId) -> TreeResult<User> {
        fetch_user(&self.store(), user_id)
    }

    pub fn user_by_email(&self, email: &str) -> TreeResult<User> {
        let email = email.trim().to_lowercase();
        self.store()
            .get_user_by_email(&email)?
            .ok_or_else(|| TreeError::not_found("User not found"))
    }

    /// Creates a list after the user's last one
    pub fn create_list(&mut self, user_id: UserId, title: &str) -> TreeResult<TaskList> {
        let title = normalize_title(title, LIST_TITLE_MAX, TitleUse::Create)?;

        self.db.transactionally(|store| {
            fetch_user(store, user_id)?;
            let position = positions::next_list_position(store, user_id)?;
            let list = store.insert_list(user_id, &title, position, Utc::now())?;

            tracing::info!(list = %list.id, user = %user_id, position, "list created");
            Ok(list)
        })
    }

    /// A user's lists in order, with their top-level item counts
    pub fn user_lists(&self, user_id: UserId) -> TreeResult<Vec<ListSummary>> {
        let store = self.store();
        fetch_user(&store, user_id)?;

        store
            .lists_for_user(user_id)?
            .into_iter()
            .map(|list| -> TreeResult<ListSummary> {
                let item_count = store.count_top_level(list.id)?;
                Ok(ListSummary { list, item_count })
            })
            .collect()
    }

    pub fn get_list(&self, list_id: ListId) -> TreeResult<TaskList> {
        fetch_list(&self.store(), list_id)
    }

    pub fn update_list(
        &mut self,
        list_id: ListId,
        title: Option<&str>,
        position: Option<i64>,
    ) -> TreeResult<TaskList> {
        let title = title
            .map(|t| normalize_title(t, LIST_TITLE_MAX, TitleUse::Update))
            .transpose()?;
        let position = position.map(validate_position).transpose()?;

        self.db.transactionally(|store| {
            let mut list = fetch_list(store, list_id)?;
            if let Some(title) = title {
                list.title = title;
            }
            if let Some(position) = position {
                list.position = position;
            }

            store.update_list_fields(&list)?;
            tracing::info!(list = %list_id, "list updated");
            Ok(list)
        })
    }

    /// Deletes a list together with all of its items
    pub fn delete_list(&mut self, list_id: ListId) -> TreeResult<()> {
        self.db.transactionally(|store| {
            fetch_list(store, list_id)?;
            store.delete_list(list_id)?;
            tracing::info!(list = %list_id, "list deleted");
            Ok(())
        })
    }
}

fn fetch_user(store: &Store<'_>, user_id: UserId) -> TreeResult<User> {
    store
        .get_user(user_id)?
        .ok_or_else(|| TreeError::not_found("User not found"))
}

fn fetch_list(store: &Store<'_>, list_id: ListId) -> TreeResult<TaskList> {
    store
        .get_list(list_id)?
        .ok_or_else(|| TreeError::not_found("List not found"))
}
