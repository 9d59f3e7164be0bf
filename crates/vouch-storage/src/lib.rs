//! Storage abstraction for vouch.
//!
//! Backend crates (e.g., vouch-store-sqlite) implement the [`Store`] trait so
//! `vouch-core` doesn't depend on any specific database engine or schema
//! details. The engine only ever reads and writes one person row at a time;
//! backends must make every multi-field invitation write on a row atomic with
//! respect to other writers of that row.

use std::fmt;

use thiserror::Error;

mod store;
mod types;

#[cfg(feature = "test-support")]
pub use store::MockStore;
pub use store::Store;
pub use types::*;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("conflict")]
    Conflict,
    #[error("invalid person: {0}")]
    Invalid(ValidationErrors),
    #[error("backend error: {0}")]
    Backend(String),
}

/// One failed store-level constraint on a draft field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All constraints a draft failed, in the order they were checked.
///
/// Surfaced to callers as a recoverable value (a half-filled invitation form
/// is an expected situation), never as a panic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field, if any failed.
    pub fn on(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_display_joins_with_semicolons() {
        let errors = ValidationErrors(vec![
            ValidationError {
                field: "email",
                message: "email is required".into(),
            },
            ValidationError {
                field: "username",
                message: "username must not be empty".into(),
            },
        ]);
        assert_eq!(
            errors.to_string(),
            "email: email is required; username: username must not be empty"
        );
    }

    #[test]
    fn validation_errors_on_filters_by_field() {
        let errors = ValidationErrors(vec![ValidationError {
            field: "email",
            message: "email is required".into(),
        }]);
        assert_eq!(errors.on("email"), vec!["email is required"]);
        assert!(errors.on("username").is_empty());
    }
}
