use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const NAME_MIN_CHARS: usize = 4;
pub const NAME_TOO_SHORT: &str = "Name must be at least 4 characters long";
pub const EMAIL_INVALID: &str = "Email must be valid";
pub const EMAIL_TAKEN: &str = "Email must be unique";

const EMAIL_LOCAL_MAX: usize = 64;
const EMAIL_MAX: usize = 254;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    )
    .expect("compile email regex")
});

/// A stored directory entry. Field order matches the persisted JSON objects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl User {
    /// Case-insensitive substring match on the name.
    pub fn name_contains(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

/// Submitted form data for create/update. Missing fields arrive as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UserInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into() }
    }

    /// Run every field check against the current collection and collect the failures.
    /// `exclude` skips the record being updated in the uniqueness check.
    pub fn validate_against(&self, users: &[User], exclude: Option<u64>) -> FormErrors {
        let mut errors = FormErrors::default();
        if let Err(ModelError::Validation(msg)) = validate_name(&self.name) {
            errors.name = Some(msg);
        }
        match validate_email(&self.email) {
            Err(ModelError::Validation(msg)) => errors.email = Some(msg),
            Ok(()) if email_taken(users, &self.email, exclude) => errors.email = Some(EMAIL_TAKEN.into()),
            Ok(()) => {}
        }
        errors
    }
}

/// Per-field error messages shown next to the form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.chars().count() < NAME_MIN_CHARS {
        return Err(ModelError::Validation(NAME_TOO_SHORT.into()));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let well_formed = !email.is_empty()
        && email.len() <= EMAIL_MAX
        && email.split('@').next().map_or(false, |local| local.len() <= EMAIL_LOCAL_MAX)
        && EMAIL_RE.is_match(email);
    if !well_formed {
        return Err(ModelError::Validation(EMAIL_INVALID.into()));
    }
    Ok(())
}

/// True when another user already holds `email` (ASCII case-insensitive).
pub fn email_taken(users: &[User], email: &str, exclude: Option<u64>) -> bool {
    users
        .iter()
        .filter(|u| Some(u.id) != exclude)
        .any(|u| u.email.eq_ignore_ascii_case(email))
}

/// Next id: highest existing id plus one, or 1 for an empty collection.
/// `None` once the highest id is `u64::MAX`.
pub fn next_id(users: &[User]) -> Option<u64> {
    users.iter().map(|u| u.id).max().unwrap_or(0).checked_add(1)
}
