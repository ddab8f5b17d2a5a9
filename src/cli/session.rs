//! Per-invocation state: configuration, open database and acting user

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use crate::domain::{Item, ItemId, ListId, TaskList, User};
use crate::storage::{Config, Database};
use crate::tree::TreeService;

/// What the acting user is trying to do; names the denial message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ViewList,
    ModifyList,
    DeleteList,
    AddItems,
    ModifyItem,
    MoveItems,
    DeleteItem,
}

impl Access {
    fn action(self) -> &'static str {
        match self {
            Access::ViewList => "access this list",
            Access::ModifyList => "modify this list",
            Access::DeleteList => "delete this list",
            Access::AddItems => "add items to this list",
            Access::ModifyItem => "modify this item",
            Access::MoveItems => "move items to this list",
            Access::DeleteItem => "delete this item",
        }
    }
}

pub struct Session {
    pub config: Config,
    db: Database,
    db_path: PathBuf,
    user_email: Option<String>,
}

impl Session {
    /// Opens the database named by `db_override`, the config, or the default location
    pub fn open(config: Config, db_override: Option<&Path>, user_override: Option<&str>) -> Result<Self> {
        let db_path = config.database_path(db_override);
        let db = Database::open_with_timeout(&db_path, config.busy_timeout())
            .with_context(|| format!("Cannot use database {}", db_path.display()))?;
        let user_email = config.effective_user(user_override);

        tracing::debug!(db = %db_path.display(), user = ?user_email, "session opened");

        Ok(Self {
            config,
            db,
            db_path,
            user_email,
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn service(&mut self) -> TreeService<'_> {
        TreeService::new(&mut self.db)
    }

    /// The user commands act as
    pub fn current_user(&mut self) -> Result<User> {
        let email = self
            .user_email
            .clone()
            .ok_or_else(|| anyhow!("No user selected; pass --user <email> or set NEST_USER"))?;

        self.service()
            .user_by_email(&email)
            .with_context(|| format!("Cannot act as {}", email))
    }

    /// Loads a list and checks that the acting user owns it
    pub fn owned_list(&mut self, list_id: ListId, access: Access) -> Result<(User, TaskList)> {
        let user = self.current_user()?;
        let list = self.service().get_list(list_id)?;
        ensure_owner(&list, &user, access)?;
        Ok((user, list))
    }

    /// Loads an item and checks that the acting user owns its list
    pub fn owned_item(&mut self, item_id: ItemId, access: Access) -> Result<Item> {
        let user = self.current_user()?;
        let item = self.service().get_item(item_id)?;
        let list = self.service().get_list(item.list_id)?;
        ensure_owner(&list, &user, access)?;
        Ok(item)
    }
}

fn ensure_owner(list: &TaskList, user: &User, access: Access) -> Result<()> {
    if !list.is_owned_by(user.id) {
        tracing::warn!(list = %list.id, user = %user.id, ?access, "permission denied");
        bail!("You do not have permission to {}", access.action());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session(dir: &TempDir, user: Option<&str>) -> Session {
        let config = Config::from_path(&dir.path().join("config.toml")).unwrap();
        Session::open(config, Some(&dir.path().join("nest.db")), user).unwrap()
    }

    #[test]
    fn requires_a_user() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir, None);
        let err = session.current_user().unwrap_err();
        assert!(err.to_string().contains("No user selected"));
    }

    #[test]
    fn other_users_lists_are_denied() {
        let dir = TempDir::new().unwrap();
        let mut ann = session(&dir, Some("ann@example.com"));
        let (list, item) = {
            let mut service = ann.service();
            let ann_user = service.add_user("Ann", "ann@example.com").unwrap();
            service.add_user("Bob", "bob@example.com").unwrap();
            let list = service.create_list(ann_user.id, "Home").unwrap();
            let item = service.create_item(list.id, "a", None).unwrap();
            (list, item)
        };
        assert!(ann.owned_list(list.id, Access::ModifyList).is_ok());
        drop(ann);

        let mut bob = session(&dir, Some("BOB@example.com"));
        let err = bob.owned_list(list.id, Access::DeleteList).unwrap_err();
        assert_eq!(err.to_string(), "You do not have permission to delete this list");

        let err = bob.owned_item(item.id, Access::MoveItems).unwrap_err();
        assert_eq!(err.to_string(), "You do not have permission to move items to this list");
    }
}
