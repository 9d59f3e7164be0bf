//! Invitation-based account provisioning.
//!
//! An inviter grants a not-yet-registered person access by issuing a
//! single-use, time-limited bearer token; the invitee later redeems the token
//! to activate their account. The engine covers three operations — `issue`,
//! `lookup_by_token`, and `accept` — over a person entity persisted by a
//! collaborating [`vouch_storage::Store`].
//!
//! Persistence, schema provisioning, and the notification transport are
//! external collaborators; this crate only defines their contracts.

mod config;
mod engine;
mod notify;
mod token;

pub use config::{ConfigError, InvitationConfig};
pub use engine::{EngineError, InvitationEngine, IssueOutcome};
pub use notify::{Notifier, NotifyError};
pub use token::generate_invitation_token;
