//! The Store trait that backends implement.

use chrono::{DateTime, Utc};

use crate::types::*;
use crate::StoreError;

/// The storage trait `vouch-core` depends on.
///
/// Lookups return [`StoreError::NotFound`] rather than an option; the engine
/// maps that to "no result" at its own surface.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Find a person by one identifying attribute.
    async fn find_by_identity(
        &self,
        field: IdentityField,
        value: &str,
    ) -> Result<Person, StoreError>;

    /// Find the person whose stored invitation token equals `token`.
    ///
    /// Token equality lookups are the hot path; backends index the column.
    async fn find_by_token(&self, token: &str) -> Result<Person, StoreError>;

    /// Create a person from a draft and apply an issuance, both in one
    /// transaction. Fails with [`StoreError::Invalid`] when the draft breaks
    /// a store-level constraint; nothing is persisted in that case.
    async fn create_with_issuance(
        &self,
        draft: &PersonDraft,
        issuance: &Issuance,
    ) -> Result<Person, StoreError>;

    /// Apply an issuance to an existing person as one atomic multi-field
    /// update. A `None` `invited_by` must leave any previously recorded
    /// inviter intact.
    async fn write_issuance(
        &self,
        person_id: &PersonId,
        issuance: &Issuance,
    ) -> Result<Person, StoreError>;

    /// Set `accepted_at` and clear the token, only if the stored token still
    /// equals `token`. Fails with [`StoreError::Conflict`] when the token
    /// changed between the caller's lookup and this write.
    async fn mark_accepted(
        &self,
        person_id: &PersonId,
        token: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<Person, StoreError>;

    /// Get person by ID.
    async fn get_person(&self, person_id: &PersonId) -> Result<Person, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct NoopStore;

    fn person() -> Person {
        Person {
            id: PersonId(Uuid::now_v7()),
            email: "test@example.com".to_string(),
            username: None,
            invitation: InvitationState::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[async_trait::async_trait]
    impl Store for NoopStore {
        async fn find_by_identity(
            &self,
            _field: IdentityField,
            _value: &str,
        ) -> Result<Person, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn find_by_token(&self, _token: &str) -> Result<Person, StoreError> {
            Err(StoreError::NotFound)
        }

        async fn create_with_issuance(
            &self,
            draft: &PersonDraft,
            issuance: &Issuance,
        ) -> Result<Person, StoreError> {
            draft.validate().map_err(StoreError::Invalid)?;
            let mut p = person();
            p.email = draft.email.clone().unwrap_or_default();
            p.invitation.token = Some(issuance.token.clone());
            Ok(p)
        }

        async fn write_issuance(
            &self,
            _person_id: &PersonId,
            _issuance: &Issuance,
        ) -> Result<Person, StoreError> {
            Ok(person())
        }

        async fn mark_accepted(
            &self,
            _person_id: &PersonId,
            _token: &str,
            _accepted_at: DateTime<Utc>,
        ) -> Result<Person, StoreError> {
            Err(StoreError::Conflict)
        }

        async fn get_person(&self, _person_id: &PersonId) -> Result<Person, StoreError> {
            Err(StoreError::NotFound)
        }
    }

    // Object safety plus a call through each method without compile errors.
    #[tokio::test]
    async fn trait_smoke() {
        let s: Box<dyn Store> = Box::new(NoopStore);

        assert!(matches!(
            s.find_by_identity(IdentityField::Email, "a@x.com").await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            s.find_by_token("inv_x").await,
            Err(StoreError::NotFound)
        ));

        let issuance = Issuance {
            token: "inv_x".to_string(),
            email_sent_at: Utc::now(),
            expires_at: None,
            invited_by: None,
        };
        let created = s
            .create_with_issuance(&PersonDraft::with_email("a@x.com"), &issuance)
            .await
            .unwrap();
        assert!(created.has_pending_invitation(Utc::now()));

        let err = s
            .create_with_issuance(&PersonDraft::default(), &issuance)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));

        let _ = s.write_issuance(&created.id, &issuance).await.unwrap();
        assert!(matches!(
            s.mark_accepted(&created.id, "inv_x", Utc::now()).await,
            Err(StoreError::Conflict)
        ));
    }
}
