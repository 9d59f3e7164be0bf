//! Person types.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{InvitationState, PersonId};
use crate::{ValidationError, ValidationErrors};

/// Person record
#[derive(Clone, Debug, PartialEq)]
pub struct Person {
    pub id: PersonId,
    pub email: String,
    pub username: Option<String>,
    pub invitation: InvitationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Whether a live token is stored as of `now`: set, and either carrying no
    /// expiry or an expiry still in the future. An expired token does not
    /// count as pending, so the person stays re-invitable after the period
    /// lapses.
    pub fn has_pending_invitation(&self, now: DateTime<Utc>) -> bool {
        self.invitation.token.is_some()
            && self.invitation.expires_at.map_or(true, |expires| expires > now)
    }
}

/// Identifying attributes a person can be looked up by.
///
/// The engine checks these in configured order during issuance; the order is
/// an observable tie-break, so it lives in configuration as a list, not a set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Email,
    Username,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityField::Email => f.write_str("email"),
            IdentityField::Username => f.write_str("username"),
        }
    }
}

/// Unsaved identifying attributes for a person.
///
/// Issuance takes a draft; when store-level validation rejects it, the draft
/// is handed back to the caller together with the errors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub email: Option<String>,
    pub username: Option<String>,
}

impl PersonDraft {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            username: None,
        }
    }

    /// Value for one identity field, if the draft carries it.
    pub fn value_of(&self, field: IdentityField) -> Option<&str> {
        match field {
            IdentityField::Email => self.email.as_deref(),
            IdentityField::Username => self.username.as_deref(),
        }
    }

    /// Store-level constraints, shared by every backend.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        match self.email.as_deref() {
            None | Some("") => errors.push(ValidationError {
                field: "email",
                message: "email is required".into(),
            }),
            Some(email) if !email.contains('@') => errors.push(ValidationError {
                field: "email",
                message: "email must contain '@'".into(),
            }),
            Some(_) => {}
        }
        if self.username.as_deref() == Some("") {
            errors.push(ValidationError {
                field: "username",
                message: "username must not be empty".into(),
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}
