//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Database setup and checks | `init`, `check` |
//! | User | Who commands act as | `user add`, `user show` |
//! | List | A user's lists | `list new`, `list ls`, `list rm` |
//! | Item | Nested items | `item add`, `item mv`, `item tree` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Acting User
//!
//! List and item commands run as the user named by `--user`, `NEST_USER` or
//! the `user` config key, and only touch that user's lists:
//! ```bash
//! nest --user ann@example.com item tree 1
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod item;
mod list;
mod output;
mod session;
mod user;

pub use app::{run, Cli, Commands, LOG_ENV};
pub use output::{Output, OutputFormat};
pub use session::{Access, Session};
