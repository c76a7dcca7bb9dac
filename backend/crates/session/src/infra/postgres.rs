//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kernel::id::UserId;

use crate::domain::entity::{refresh_token::RefreshRecord, user::User};
use crate::domain::repository::{RefreshTokenRepository, UserRepository};
use crate::domain::value_object::{credential::Credential, email::Email};
use crate::error::SessionResult;

/// PostgreSQL-backed session repository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove refresh records past their natural expiry
    pub async fn cleanup_expired(&self) -> SessionResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Cleaned up expired refresh tokens");

        Ok(deleted)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    nickname: String,
    password: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            nickname: self.nickname,
            credential: Credential::from_stored(self.password),
        }
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    user_id: Uuid,
    token: String,
    expires_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RefreshTokenRow {
    fn into_record(self) -> RefreshRecord {
        RefreshRecord {
            user_id: UserId::from_uuid(self.user_id),
            token: self.token,
            expires_at: self.expires_at,
            updated_at: self.updated_at,
        }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgSessionRepository {
    async fn find_by_email(&self, email: &Email) -> SessionResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, nickname, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_by_id(&self, user_id: &UserId) -> SessionResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, email, nickname, password
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn update_credential(
        &self,
        user_id: &UserId,
        credential: &Credential,
    ) -> SessionResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password = $2, updated_at = now()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(credential.as_stored())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgSessionRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> SessionResult<Option<RefreshRecord>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT user_id, token, expires_at, updated_at
            FROM refresh_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RefreshTokenRow::into_record))
    }

    async fn upsert(&self, record: &RefreshRecord) -> SessionResult<()> {
        // Single-statement conditional write: the per-user uniqueness
        // invariant holds under concurrent logins, later write wins
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token, expires_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET token = EXCLUDED.token,
                expires_at = EXCLUDED.expires_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(record.user_id.as_uuid())
        .bind(&record.token)
        .bind(record.expires_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_by_user_id(&self, user_id: &UserId) -> SessionResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}
