//! The invitation engine: issue, lookup, accept.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};
use vouch_storage::{
    IdentityField, Issuance, Person, PersonDraft, Store, StoreError, ValidationErrors,
};

use crate::config::{ConfigError, InvitationConfig};
use crate::token::generate_invitation_token;

/// Engine operation errors.
///
/// "Token not found or expired" is not an error — those surface as `Ok(None)`
/// from lookups. Store validation failures surface as
/// [`IssueOutcome::Rejected`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// Two different identifying attributes matched two different rows.
    #[error("ambiguous identity: {first} and {second} match different persons")]
    AmbiguousIdentity {
        first: IdentityField,
        second: IdentityField,
    },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of an issuance call.
#[derive(Clone, Debug)]
pub enum IssueOutcome {
    /// A fresh token was generated, persisted, and (when enabled) a notice
    /// delivered.
    Issued(Person),
    /// The person already holds an unredeemed token. Nothing was written and
    /// nothing was sent.
    Pending(Person),
    /// Store-level validation rejected the draft. Nothing was persisted and
    /// nothing was sent; the draft comes back so the caller can show what
    /// failed.
    Rejected {
        draft: PersonDraft,
        errors: ValidationErrors,
    },
}

impl IssueOutcome {
    /// The persisted person, when one exists.
    pub fn person(&self) -> Option<&Person> {
        match self {
            IssueOutcome::Issued(p) | IssueOutcome::Pending(p) => Some(p),
            IssueOutcome::Rejected { .. } => None,
        }
    }
}

/// Invitation engine over a [`Store`].
///
/// Holds a validated [`InvitationConfig`]; all operations are synchronous
/// request/response, and the store is the sole point of shared mutable state.
#[derive(Debug)]
pub struct InvitationEngine<S> {
    store: S,
    config: InvitationConfig,
}

impl<S: Store> InvitationEngine<S> {
    /// Build an engine from a configuration.
    ///
    /// Runs [`InvitationConfig::validate`]; a misconfigured engine (for
    /// example, notifications enabled with no notifier) can never be
    /// constructed.
    pub fn new(store: S, config: InvitationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &InvitationConfig {
        &self.config
    }

    /// Issue an invitation for the person identified by `draft`, creating the
    /// person when no row matches.
    ///
    /// Re-inviting a person who already holds a live unredeemed token is an
    /// idempotent no-op ([`IssueOutcome::Pending`]): no new token, no write,
    /// no notice. A stored token that has already expired does not block
    /// re-issuance. Otherwise a fresh token and expiry are persisted as one
    /// atomic multi-field write and at most one notice is delivered.
    pub async fn issue(
        &self,
        draft: &PersonDraft,
        inviter: Option<&Person>,
    ) -> Result<IssueOutcome, EngineError> {
        let existing = self.find_existing(draft).await?;
        let now = Utc::now();

        if let Some(person) = &existing {
            if person.has_pending_invitation(now) {
                debug!(person = %person.id, "invitation already pending, skipping issuance");
                return Ok(IssueOutcome::Pending(person.clone()));
            }
        }

        let issuance = Issuance {
            token: generate_invitation_token(),
            email_sent_at: now,
            expires_at: self.config.expiration_period.map(|period| now + period),
            invited_by: inviter.map(|p| p.id.clone()),
        };

        let person = match existing {
            Some(person) => self.store.write_issuance(&person.id, &issuance).await?,
            None => match self.store.create_with_issuance(draft, &issuance).await {
                Ok(person) => person,
                Err(StoreError::Invalid(errors)) => {
                    debug!(%errors, "issuance rejected by store validation");
                    return Ok(IssueOutcome::Rejected {
                        draft: draft.clone(),
                        errors,
                    });
                }
                Err(err) => return Err(err.into()),
            },
        };

        info!(person = %person.id, "invitation issued");
        self.notify(&person).await;
        Ok(IssueOutcome::Issued(person))
    }

    /// Return the person holding a live (stored and unexpired) token.
    ///
    /// An empty token is never looked up — the store is not queried at all.
    /// The stored expiry governs validity, not the currently configured
    /// period: the period may have changed since issuance, and a null stored
    /// expiry never expires.
    pub async fn lookup_by_token(&self, token: &str) -> Result<Option<Person>, EngineError> {
        if token.is_empty() {
            return Ok(None);
        }
        let person = match self.store.find_by_token(token).await {
            Ok(person) => person,
            Err(StoreError::NotFound) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if let Some(expires_at) = person.invitation.expires_at {
            if expires_at <= Utc::now() {
                debug!(person = %person.id, %expires_at, "invitation token expired");
                return Ok(None);
            }
        }
        Ok(Some(person))
    }

    /// Redeem a live token: stamp `accepted_at` and clear the token in one
    /// atomic update.
    ///
    /// When the stored token changed between lookup and write, the person is
    /// returned unmodified; callers check `accepted_at` to determine success.
    pub async fn accept(&self, token: &str) -> Result<Option<Person>, EngineError> {
        let Some(person) = self.lookup_by_token(token).await? else {
            return Ok(None);
        };
        match self.store.mark_accepted(&person.id, token, Utc::now()).await {
            Ok(accepted) => {
                info!(person = %accepted.id, "invitation accepted");
                Ok(Some(accepted))
            }
            // Token changed under us; hand back the person unmodified.
            Err(StoreError::Conflict) => Ok(Some(person)),
            Err(err) => Err(err.into()),
        }
    }

    /// First match over the configured identity order wins; a later attribute
    /// matching a different row is an ambiguity error.
    async fn find_existing(&self, draft: &PersonDraft) -> Result<Option<Person>, EngineError> {
        let mut found: Option<(IdentityField, Person)> = None;
        for field in &self.config.identity_order {
            let Some(value) = draft.value_of(*field) else {
                continue;
            };
            match self.store.find_by_identity(*field, value).await {
                Ok(person) => match &found {
                    None => found = Some((*field, person)),
                    Some((first, candidate)) if candidate.id != person.id => {
                        return Err(EngineError::AmbiguousIdentity {
                            first: *first,
                            second: *field,
                        });
                    }
                    Some(_) => {}
                },
                Err(StoreError::NotFound) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(found.map(|(_, person)| person))
    }

    async fn notify(&self, person: &Person) {
        if self.config.notifications_disabled {
            return;
        }
        // validate() guarantees a notifier whenever notifications are enabled.
        let Some(notifier) = &self.config.notifier else {
            return;
        };
        if let Err(err) = notifier.deliver(person).await {
            warn!(person = %person.id, error = %err, "invitation notice delivery failed");
        }
    }
}
