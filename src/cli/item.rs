//! Item CLI commands

use anyhow::{bail, Result};
use clap::Subcommand;

use super::output::Output;
use super::session::{Access, Session};
use crate::domain::{Item, ItemId, ItemNode, ItemUpdate, ListId, ParentChange};

#[derive(Debug, Subcommand)]
pub enum ItemCommands {
    /// Add an item at the end of its siblings
    ///
    /// Examples:
    ///   nest item add 1 "Groceries"             # Top-level item in list 1
    ///   nest item add 1 "Milk" --parent 4       # Child of item 4
    Add {
        /// List ID
        list: ListId,

        /// Item title
        title: String,

        /// Parent item ID
        #[arg(long)]
        parent: Option<ItemId>,
    },

    /// Show a single item
    Show {
        /// Item ID
        id: ItemId,
    },

    /// Change an item's fields, moving it if --list or --parent is given
    Edit {
        /// Item ID
        id: ItemId,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New position among its siblings
        #[arg(long)]
        position: Option<i64>,

        /// Move to this list
        #[arg(long)]
        list: Option<ListId>,

        /// New parent item ID; 0 makes the item top-level
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        parent: Option<i64>,
    },

    /// Mark an item as completed
    Done {
        /// Item ID
        id: ItemId,
    },

    /// Mark an item as not completed
    Undo {
        /// Item ID
        id: ItemId,
    },

    /// Move an item and its subtree
    ///
    /// Examples:
    ///   nest item mv 7 --parent 3               # Under item 3
    ///   nest item mv 7 --top                    # Top-level in the same list
    ///   nest item mv 7 --list 2                 # Top-level in list 2
    Mv {
        /// Item ID
        id: ItemId,

        /// Target list
        #[arg(long)]
        list: Option<ListId>,

        /// New parent item ID; 0 makes the item top-level
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..), conflicts_with = "top")]
        parent: Option<i64>,

        /// Make the item top-level
        #[arg(long)]
        top: bool,
    },

    /// Delete an item and everything below it
    Rm {
        /// Item ID
        id: ItemId,
    },

    /// Show a list's items as a tree
    Tree {
        /// List ID
        list: ListId,
    },
}

pub fn run(cmd: ItemCommands, session: &mut Session, output: &Output) -> Result<()> {
    match cmd {
        ItemCommands::Add {
            list,
            title,
            parent,
        } => add_item(session, output, list, &title, parent),
        ItemCommands::Show { id } => {
            let item = session.owned_item(id, Access::ViewList)?;
            print_item(output, &item);
            Ok(())
        }
        ItemCommands::Edit {
            id,
            title,
            position,
            list,
            parent,
        } => {
            let update = ItemUpdate {
                title,
                completed: None,
                position,
                list_id: list,
                parent: parent.map_or(ParentChange::Keep, ParentChange::from_raw),
            };
            if update.is_empty() {
                bail!("Nothing to change; pass --title, --position, --list or --parent");
            }
            update_item(session, output, id, update)
        }
        ItemCommands::Done { id } => {
            update_item(session, output, id, ItemUpdate::default().completed(true))
        }
        ItemCommands::Undo { id } => {
            update_item(session, output, id, ItemUpdate::default().completed(false))
        }
        ItemCommands::Mv {
            id,
            list,
            parent,
            top,
        } => {
            let parent = match (parent, top) {
                (_, true) => ParentChange::TopLevel,
                (Some(raw), false) => ParentChange::from_raw(raw),
                (None, false) => ParentChange::Keep,
            };
            let mut update = ItemUpdate::default().parent(parent);
            update.list_id = list;
            if !update.is_move() {
                bail!("Nothing to move; pass --list, --parent or --top");
            }
            update_item(session, output, id, update)
        }
        ItemCommands::Rm { id } => remove_item(session, output, id),
        ItemCommands::Tree { list } => show_tree(session, output, list),
    }
}

fn add_item(
    session: &mut Session,
    output: &Output,
    list_id: ListId,
    title: &str,
    parent: Option<ItemId>,
) -> Result<()> {
    session.owned_list(list_id, Access::AddItems)?;
    let item = session.service().create_item(list_id, title, parent)?;

    if output.is_json() {
        output.data(&item);
    } else {
        output.success(&format!("Created item {}: {}", item.id, item.title));
    }
    Ok(())
}

fn update_item(session: &mut Session, output: &Output, id: ItemId, update: ItemUpdate) -> Result<()> {
    let before = session.owned_item(id, Access::ModifyItem)?;
    if let Some(target) = update.list_id.filter(|&list| list != before.list_id) {
        session.owned_list(target, Access::MoveItems)?;
    }

    let item = session.service().update_item(id, update)?;

    if output.is_json() {
        output.data(&item);
    } else if item.list_id != before.list_id || item.parent_id != before.parent_id {
        let parent = item
            .parent_id
            .map_or_else(|| "top level".to_string(), |p| format!("item {}", p));
        output.success(&format!(
            "Moved item {} to list {} under {} (level {})",
            item.id, item.list_id, parent, item.level
        ));
    } else {
        output.success(&format!("Updated item {}: {}", item.id, item.title));
    }
    Ok(())
}

fn remove_item(session: &mut Session, output: &Output, id: ItemId) -> Result<()> {
    session.owned_item(id, Access::DeleteItem)?;
    let removed = session.service().delete_item(id)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "deleted": id, "removed": removed }));
    } else {
        output.success(&format!("Deleted item {} ({} item(s) removed)", id, removed));
    }
    Ok(())
}

fn show_tree(session: &mut Session, output: &Output, list_id: ListId) -> Result<()> {
    let (_, list) = session.owned_list(list_id, Access::ViewList)?;
    let nodes = session.service().get_tree(list_id)?;

    if output.is_json() {
        output.data(&nodes);
        return Ok(());
    }

    println!("{} (list {})", list.title, list.id);
    if nodes.is_empty() {
        println!("  (empty)");
    }
    for line in render_tree(&nodes) {
        println!("{}", line);
    }
    Ok(())
}

fn print_item(output: &Output, item: &Item) {
    if output.is_json() {
        output.data(item);
        return;
    }

    println!("ID:        {}", item.id);
    println!("Title:     {}", item.title);
    println!("Completed: {}", if item.completed { "yes" } else { "no" });
    println!("List:      {}", item.list_id);
    match item.parent_id {
        Some(parent) => println!("Parent:    {}", parent),
        None => println!("Parent:    -"),
    }
    println!("Level:     {}", item.level);
    println!("Position:  {}", item.position);
}

/// One line per node, indented two spaces per depth
fn render_tree(nodes: &[ItemNode]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut stack: Vec<(usize, &ItemNode)> = nodes.iter().rev().map(|n| (1, n)).collect();

    while let Some((depth, node)) = stack.pop() {
        let mark = if node.item.completed { 'x' } else { ' ' };
        lines.push(format!(
            "{}[{}] {}  {}",
            "  ".repeat(depth),
            mark,
            node.item.id,
            node.item.title
        ));
        stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
    }

    lines
}
