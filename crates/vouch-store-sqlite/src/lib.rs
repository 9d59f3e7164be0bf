//! SQLite backend for the vouch [`Store`] trait.
//!
//! Timestamps are stored as epoch milliseconds so sub-second expiration
//! periods survive the round trip. Invitation-field writes are single UPDATE
//! statements, which SQLite applies atomically per row.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;
use vouch_storage::{
    IdentityField, InvitationState, Issuance, Person, PersonDraft, PersonId, Store, StoreError,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const PERSON_COLUMNS: &str = "id, email, username, invitation_token, invitation_token_expires_at, \
     invitation_email_sent_at, invitation_accepted_at, invited_by_id, created_at, updated_at";

/// One row of the `persons` table, in `PERSON_COLUMNS` order.
type PersonRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<i64>,
    Option<i64>,
    Option<i64>,
    Option<String>,
    i64,
    i64,
);

pub struct SqlitePersonStore {
    pool: SqlitePool,
}

impl SqlitePersonStore {
    /// `~/.vouch/store.db` (creates dir with 0700 perms on unix)
    pub async fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::home_dir()
            .ok_or_else(|| StoreError::Backend("no home dir".into()))?
            .join(".vouch");
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Backend(e.to_string()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        let path = dir.join("store.db");
        let url = format!("sqlite://{}", path.to_string_lossy());
        Self::open(&url).await
    }

    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }

    async fn fetch_person(&self, person_id: &PersonId) -> Result<Person, StoreError> {
        let sql = format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id=?");
        let row = sqlx::query_as::<_, PersonRow>(&sql)
            .bind(person_id.0.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => person_from_row(row),
        }
    }
}

fn identity_column(field: IdentityField) -> &'static str {
    match field {
        IdentityField::Email => "email",
        IdentityField::Username => "username",
    }
}

fn to_millis(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Backend(format!("timestamp out of range: {ms}")))
}

fn parse_id(s: &str) -> Result<PersonId, StoreError> {
    Uuid::try_parse(s)
        .map(PersonId)
        .map_err(|e| StoreError::Backend(e.to_string()))
}

fn person_from_row(row: PersonRow) -> Result<Person, StoreError> {
    let (
        id,
        email,
        username,
        token,
        expires_at,
        email_sent_at,
        accepted_at,
        invited_by,
        created_at,
        updated_at,
    ) = row;

    Ok(Person {
        id: parse_id(&id)?,
        email,
        username,
        invitation: InvitationState {
            token,
            expires_at: expires_at.map(from_millis).transpose()?,
            email_sent_at: email_sent_at.map(from_millis).transpose()?,
            accepted_at: accepted_at.map(from_millis).transpose()?,
            invited_by: invited_by.as_deref().map(parse_id).transpose()?,
        },
        created_at: from_millis(created_at)?,
        updated_at: from_millis(updated_at)?,
    })
}

fn map_insert_err(e: sqlx::Error) -> StoreError {
    let s = e.to_string();
    if s.contains("UNIQUE") {
        StoreError::AlreadyExists
    } else {
        StoreError::Backend(s)
    }
}

#[async_trait::async_trait]
impl Store for SqlitePersonStore {
    async fn find_by_identity(
        &self,
        field: IdentityField,
        value: &str,
    ) -> Result<Person, StoreError> {
        let sql = format!(
            "SELECT {PERSON_COLUMNS} FROM persons WHERE {}=?",
            identity_column(field)
        );
        let row = sqlx::query_as::<_, PersonRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => person_from_row(row),
        }
    }

    async fn find_by_token(&self, token: &str) -> Result<Person, StoreError> {
        let sql = format!("SELECT {PERSON_COLUMNS} FROM persons WHERE invitation_token=?");
        let row = sqlx::query_as::<_, PersonRow>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match row {
            None => Err(StoreError::NotFound),
            Some(row) => person_from_row(row),
        }
    }

    async fn create_with_issuance(
        &self,
        draft: &PersonDraft,
        issuance: &Issuance,
    ) -> Result<Person, StoreError> {
        draft.validate().map_err(StoreError::Invalid)?;

        // Validation guarantees the email is present.
        let email = draft.email.clone().unwrap_or_default();
        let id = Uuid::now_v7();
        let now = Utc::now();

        // Create and issuance in a single INSERT: one atomic row write.
        sqlx::query(
            "INSERT INTO persons(id, email, username, invitation_token, \
             invitation_token_expires_at, invitation_email_sent_at, invited_by_id, \
             created_at, updated_at)
             VALUES(?,?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(&email)
        .bind(&draft.username)
        .bind(&issuance.token)
        .bind(issuance.expires_at.map(to_millis))
        .bind(to_millis(issuance.email_sent_at))
        .bind(issuance.invited_by.as_ref().map(|p| p.0.to_string()))
        .bind(to_millis(now))
        .bind(to_millis(now))
        .execute(&self.pool)
        .await
        .map_err(map_insert_err)?;

        Ok(Person {
            id: PersonId(id),
            email,
            username: draft.username.clone(),
            invitation: InvitationState {
                token: Some(issuance.token.clone()),
                expires_at: issuance.expires_at,
                email_sent_at: Some(issuance.email_sent_at),
                accepted_at: None,
                invited_by: issuance.invited_by.clone(),
            },
            created_at: now,
            updated_at: now,
        })
    }

    async fn write_issuance(
        &self,
        person_id: &PersonId,
        issuance: &Issuance,
    ) -> Result<Person, StoreError> {
        // COALESCE keeps a previously recorded inviter when none is supplied.
        let result = sqlx::query(
            "UPDATE persons SET invitation_token=?,
                                invitation_token_expires_at=?,
                                invitation_email_sent_at=?,
                                invited_by_id=COALESCE(?, invited_by_id),
                                updated_at=?
             WHERE id=?",
        )
        .bind(&issuance.token)
        .bind(issuance.expires_at.map(to_millis))
        .bind(to_millis(issuance.email_sent_at))
        .bind(issuance.invited_by.as_ref().map(|p| p.0.to_string()))
        .bind(to_millis(Utc::now()))
        .bind(person_id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        self.fetch_person(person_id).await
    }

    async fn mark_accepted(
        &self,
        person_id: &PersonId,
        token: &str,
        accepted_at: DateTime<Utc>,
    ) -> Result<Person, StoreError> {
        let result = sqlx::query(
            "UPDATE persons SET invitation_accepted_at=?,
                                invitation_token=NULL,
                                updated_at=?
             WHERE id=? AND invitation_token=?",
        )
        .bind(to_millis(accepted_at))
        .bind(to_millis(Utc::now()))
        .bind(person_id.0.to_string())
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Distinguish a vanished row from a token that changed under us.
            return match self.fetch_person(person_id).await {
                Ok(_) => Err(StoreError::Conflict),
                Err(e) => Err(e),
            };
        }
        self.fetch_person(person_id).await
    }

    async fn get_person(&self, person_id: &PersonId) -> Result<Person, StoreError> {
        self.fetch_person(person_id).await
    }
}
