//! List CLI commands

use anyhow::{bail, Result};
use clap::Subcommand;

use super::output::Output;
use super::session::{Access, Session};
use crate::domain::ListId;

#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// Create a list at the end of your lists
    New {
        /// List title
        title: String,
    },

    /// Show your lists in order
    Ls,

    /// Rename or reorder a list
    Edit {
        /// List ID
        id: ListId,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New position among your lists
        #[arg(long)]
        position: Option<i64>,
    },

    /// Delete a list and every item in it
    Rm {
        /// List ID
        id: ListId,
    },
}

pub fn run(cmd: ListCommands, session: &mut Session, output: &Output) -> Result<()> {
    match cmd {
        ListCommands::New { title } => new_list(session, output, &title),
        ListCommands::Ls => show_lists(session, output),
        ListCommands::Edit { id, title, position } => {
            edit_list(session, output, id, title.as_deref(), position)
        }
        ListCommands::Rm { id } => remove_list(session, output, id),
    }
}

fn new_list(session: &mut Session, output: &Output, title: &str) -> Result<()> {
    let user = session.current_user()?;
    let list = session.service().create_list(user.id, title)?;

    if output.is_json() {
        output.data(&list);
    } else {
        output.success(&format!("Created list {}: {}", list.id, list.title));
    }
    Ok(())
}

fn show_lists(session: &mut Session, output: &Output) -> Result<()> {
    let user = session.current_user()?;
    let lists = session.service().user_lists(user.id)?;

    if output.is_json() {
        output.data(&lists);
        return Ok(());
    }

    if lists.is_empty() {
        println!("No lists yet. Create one with: nest list new <title>");
        return Ok(());
    }

    output.row(&["ID", "POS", "ITEMS", "TITLE"]);
    for summary in &lists {
        let id = summary.list.id.to_string();
        let position = summary.list.position.to_string();
        let count = summary.item_count.to_string();
        output.row(&[id.as_str(), position.as_str(), count.as_str(), summary.list.title.as_str()]);
    }
    Ok(())
}

fn edit_list(
    session: &mut Session,
    output: &Output,
    id: ListId,
    title: Option<&str>,
    position: Option<i64>,
) -> Result<()> {
    if title.is_none() && position.is_none() {
        bail!("Nothing to change; pass --title or --position");
    }

    session.owned_list(id, Access::ModifyList)?;
    let list = session.service().update_list(id, title, position)?;

    if output.is_json() {
        output.data(&list);
    } else {
        output.success(&format!("Updated list {}: {}", list.id, list.title));
    }
    Ok(())
}

fn remove_list(session: &mut Session, output: &Output, id: ListId) -> Result<()> {
    let (_, list) = session.owned_list(id, Access::DeleteList)?;
    session.service().delete_list(id)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "deleted": list.id }));
    } else {
        output.success(&format!("Deleted list {}: {}", list.id, list.title));
    }
    Ok(())
}
