//! Invitation field types.

use chrono::{DateTime, Utc};

use super::PersonId;

/// Invitation-related fields on a person row.
///
/// `token` is an opaque bearer credential; `accepted_at` non-null means the
/// invitation has been redeemed and the token cleared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvitationState {
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub invited_by: Option<PersonId>,
}

/// Field values written by one issuance.
///
/// Backends apply all of these as a single atomic multi-field update. A
/// `None` `invited_by` leaves any previously recorded inviter intact.
#[derive(Clone, Debug, PartialEq)]
pub struct Issuance {
    pub token: String,
    pub email_sent_at: DateTime<Utc>,
    /// `None` when the configured expiration period is "never".
    pub expires_at: Option<DateTime<Utc>>,
    pub invited_by: Option<PersonId>,
}
