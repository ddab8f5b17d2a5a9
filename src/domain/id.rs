//! Typed row identifiers
//!
//! Users, lists and items are all keyed by SQLite integer row ids. Each gets
//! its own newtype so a list id can never be passed where an item id is
//! expected.
//!
//! ID Format (CLI and JSON): the bare positive integer, e.g. `42`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid {kind} ID: expected a positive integer, got '{value}'")]
    Invalid { kind: &'static str, value: String },
}

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row id
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw row id
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(raw) if raw > 0 => Ok(Self(raw)),
                    _ => Err(IdError::Invalid {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl rusqlite::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                rusqlite::ToSql::to_sql(&self.0)
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                <i64 as rusqlite::types::FromSql>::column_result(value).map(Self)
            }
        }
    };
}

row_id!(
    /// Identifier of a user (list owner)
    UserId,
    "user"
);

row_id!(
    /// Identifier of a list
    ListId,
    "list"
);

row_id!(
    /// Identifier of an item (a node in a list's hierarchy)
    ItemId,
    "item"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        let id: ItemId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);

        let id: ListId = " 7 ".parse().unwrap();
        assert_eq!(id, ListId::new(7));
    }

    #[test]
    fn parse_rejects_non_positive() {
        assert!("0".parse::<ItemId>().is_err());
        assert!("-3".parse::<ListId>().is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "abc".parse::<UserId>().unwrap_err();
        assert_eq!(
            err,
            IdError::Invalid {
                kind: "user",
                value: "abc".to_string()
            }
        );
        assert!(err.to_string().contains("Invalid user ID"));
    }

    #[test]
    fn display_is_bare_integer() {
        assert_eq!(ItemId::new(12).to_string(), "12");
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&ListId::new(3)).unwrap();
        assert_eq!(json, "3");

        let id: ItemId = serde_json::from_str("9").unwrap();
        assert_eq!(id, ItemId::new(9));
    }
}
