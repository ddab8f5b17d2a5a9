//! Hierarchy core
//!
//! | Module       | Responsibility                                   |
//! |--------------|--------------------------------------------------|
//! | `positions`  | next sibling position in a scope                 |
//! | `validator`  | parent, list and cycle checks before writes      |
//! | `mutator`    | re-levels and re-homes a moved subtree           |
//! | `assembler`  | nested children view for reads                   |
//! | `service`    | transactional item operations                    |
//! | `lists`      | users and lists                                  |
//! | `integrity`  | invariant checks over stored items               |

pub mod assembler;
mod error;
mod integrity;
mod lists;
pub mod mutator;
pub mod positions;
mod service;
pub mod validator;
pub mod walk;

pub use error::{TreeError, TreeResult};
pub use integrity::IntegrityIssue;
pub use service::TreeService;
pub use validator::{NewPlacement, Placement};
