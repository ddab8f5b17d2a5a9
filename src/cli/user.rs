//! User CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use super::session::Session;
use crate::domain::User;

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// Register a user
    ///
    /// Examples:
    ///   nest user add "Ann Lee" ann@example.com
    ///   nest user add "Ann Lee" ann@example.com --default
    Add {
        /// Display name
        name: String,

        /// Email address (unique, case-insensitive)
        email: String,

        /// Save as the default user in the config file
        #[arg(long)]
        default: bool,
    },

    /// Show the user commands act as
    Show,
}

pub fn run(cmd: UserCommands, session: &mut Session, output: &Output) -> Result<()> {
    match cmd {
        UserCommands::Add {
            name,
            email,
            default,
        } => add_user(session, output, &name, &email, default),
        UserCommands::Show => {
            let user = session.current_user()?;
            print_user(output, &user);
            Ok(())
        }
    }
}

fn add_user(
    session: &mut Session,
    output: &Output,
    name: &str,
    email: &str,
    make_default: bool,
) -> Result<()> {
    let user = session.service().add_user(name, email)?;

    if make_default {
        session.config.global.user = Some(user.email.clone());
        session.config.save()?;
    }

    if output.is_json() {
        output.data(&user);
    } else {
        output.success(&format!("Created user {}: {} <{}>", user.id, user.name, user.email));
        if make_default {
            output.success("Saved as default user");
        }
    }

    Ok(())
}

fn print_user(output: &Output, user: &User) {
    if output.is_json() {
        output.data(user);
    } else {
        println!("ID:      {}", user.id);
        println!("Name:    {}", user.name);
        println!("Email:   {}", user.email);
        println!("Created: {}", user.created_at.format("%Y-%m-%d %H:%M"));
    }
}
