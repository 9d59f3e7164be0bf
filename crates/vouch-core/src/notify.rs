//! Notifier contract for invitation notices.

use thiserror::Error;
use vouch_storage::Person;

/// Notice delivery error
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to send notice: {0}")]
    SendFailed(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Capability for delivering an invitation notice to a person.
///
/// The person handed in carries the freshly issued token. Delivery failures
/// are the collaborator's concern: the engine logs them and still treats the
/// issuance as complete.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, person: &Person) -> Result<(), NotifyError>;
}
