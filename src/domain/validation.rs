//! Field validation shared by users, lists and items

use thiserror::Error;

/// Maximum length of a list title, in characters
pub const LIST_TITLE_MAX: usize = 200;

/// Maximum length of an item title, in characters
pub const ITEM_TITLE_MAX: usize = 500;

/// Maximum length of a user name, in characters
pub const USER_NAME_MAX: usize = 100;

/// Maximum length of an email address, in characters
pub const EMAIL_MAX: usize = 120;

/// A rejected field value, carrying the user-facing message
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Whether a title is being set for the first time or replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleUse {
    Create,
    Update,
}

/// Trims a title and checks it against `max` characters
pub fn normalize_title(raw: &str, max: usize, usage: TitleUse) -> Result<String, ValidationError> {
    let title = raw.trim();

    if title.is_empty() {
        return Err(match usage {
            TitleUse::Create => ValidationError::new("Title is required"),
            TitleUse::Update => ValidationError::new("Title cannot be empty"),
        });
    }

    if title.chars().count() > max {
        return Err(ValidationError::new(format!(
            "Title must be {} characters or less",
            max
        )));
    }

    Ok(title.to_string())
}

/// Positions are caller-editable but never negative
pub fn validate_position(position: i64) -> Result<i64, ValidationError> {
    if position < 0 {
        return Err(ValidationError::new(
            "Position must be a non-negative integer",
        ));
    }
    Ok(position)
}

/// Trims and lower-cases an email address
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();

    if email.is_empty() {
        return Err(ValidationError::new("Email is required"));
    }
    if email.chars().count() > EMAIL_MAX {
        return Err(ValidationError::new(format!(
            "Email must be {} characters or less",
            EMAIL_MAX
        )));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::new("Invalid email format"));
    }

    Ok(email)
}

/// Trims a user's display name
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::new("Name is required"));
    }
    if name.chars().count() > USER_NAME_MAX {
        return Err(ValidationError::new(format!(
            "Name must be {} characters or less",
            USER_NAME_MAX
        )));
    }
    Ok(name.to_string())
}
