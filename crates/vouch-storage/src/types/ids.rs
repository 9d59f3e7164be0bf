//! Strongly-typed identifiers (avoid mixing strings/UUIDs arbitrarily).

use std::fmt;

use uuid::Uuid;

/// Person identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PersonId(pub Uuid);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
