//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use nid::Nanoid;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::entity::{credentials::Credentials, session::AuthSession, user::User};
use crate::domain::repository::{CredentialsRepository, SessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, public_id::PublicId, user_password::UserPassword,
    user_role::UserRole, user_status::UserStatus,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clean up expired sessions
    pub async fn cleanup_expired_sessions(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

impl UserRepository for PgAuthRepository {
    async fn create_with_credentials(
        &self,
        user: &User,
        credentials: &Credentials,
    ) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id, public_id, name, email, role, status,
                last_login_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.public_id.as_str())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.role.id())
        .bind(user.status.id())
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO auth_credentials (
                user_id, password_hash, login_failed_count,
                last_failed_at, locked_until, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(credentials.user_id.as_uuid())
        .bind(credentials.password_hash.as_phc_string())
        .bind(credentials.login_failed_count)
        .bind(credentials.last_failed_at)
        .bind(credentials.locked_until)
        .bind(credentials.created_at)
        .bind(credentials.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, public_id, name, email, role, status,
                   last_login_at, created_at, updated_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_public_id(&self, public_id: &PublicId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, public_id, name, email, role, status,
                   last_login_at, created_at, updated_at
            FROM users
            WHERE public_id = $1
            "#,
        )
        .bind(public_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, public_id, name, email, role, status,
                   last_login_at, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                role = $4,
                status = $5,
                last_login_at = $6,
                updated_at = $7
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(user.role.id())
        .bind(user.status.id())
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl CredentialsRepository for PgAuthRepository {
    async fn find_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<Credentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            r#"
            SELECT user_id, password_hash, login_failed_count,
                   last_failed_at, locked_until, created_at, updated_at
            FROM auth_credentials
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_credentials()).transpose()
    }

    async fn update(&self, credentials: &Credentials) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE auth_credentials SET
                password_hash = $2,
                login_failed_count = $3,
                last_failed_at = $4,
                locked_until = $5,
                updated_at = $6
            WHERE user_id = $1
            "#,
        )
        .bind(credentials.user_id.as_uuid())
        .bind(credentials.password_hash.as_phc_string())
        .bind(credentials.login_failed_count)
        .bind(credentials.last_failed_at)
        .bind(credentials.locked_until)
        .bind(credentials.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id, user_id, public_id, role, expires_at_ms,
                remember_me, client_fingerprint_hash, client_ip,
                created_at, last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.as_uuid())
        .bind(session.public_id.as_str())
        .bind(session.role.id())
        .bind(session.expires_at_ms)
        .bind(session.remember_me)
        .bind(&session.client_fingerprint_hash)
        .bind(&session.client_ip)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        session_id: Uuid,
        fingerprint_hash: &[u8],
    ) -> AuthResult<Option<AuthSession>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT session_id, user_id, public_id, role, expires_at_ms,
                   remember_me, client_fingerprint_hash, client_ip,
                   created_at, last_activity_at
            FROM auth_sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => {
                if r.client_fingerprint_hash != fingerprint_hash {
                    tracing::warn!(
                        session_id = %session_id,
                        "Auth session fingerprint mismatch"
                    );
                    return Err(AuthError::SessionFingerprintMismatch);
                }
                Ok(Some(r.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn update(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE auth_sessions SET
                expires_at_ms = $2,
                last_activity_at = $3
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(session.expires_at_ms)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> AuthResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: &UserId, except: Option<Uuid>) -> AuthResult<u64> {
        let deleted = match except {
            Some(except_id) => {
                sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1 AND session_id != $2")
                    .bind(user_id.as_uuid())
                    .bind(except_id)
                    .execute(&self.pool)
                    .await?
                    .rows_affected()
            }
            None => {
                sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1")
                    .bind(user_id.as_uuid())
                    .execute(&self.pool)
                    .await?
                    .rows_affected()
            }
        };

        Ok(deleted)
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.cleanup_expired_sessions().await
    }
}

// Row types for sqlx mapping

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    public_id: String,
    name: String,
    email: String,
    role: i16,
    status: i16,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let public_id = PublicId::from_nanoid(
            Nanoid::from_str(&self.public_id)
                .map_err(|e| AuthError::Internal(format!("Invalid public_id: {}", e)))?,
        );

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            public_id,
            name: PersonName::from_db(self.name),
            email: Email::from_db(self.email),
            role: UserRole::from_id(self.role)
                .map_err(|e| AuthError::Internal(e.to_string()))?,
            status: UserStatus::from_id(self.status)
                .map_err(|e| AuthError::Internal(e.to_string()))?,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    user_id: Uuid,
    password_hash: String,
    login_failed_count: i16,
    last_failed_at: Option<DateTime<Utc>>,
    locked_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialsRow {
    fn into_credentials(self) -> AuthResult<Credentials> {
        Ok(Credentials {
            user_id: UserId::from_uuid(self.user_id),
            password_hash: UserPassword::from_phc_string(self.password_hash)
                .map_err(|e| AuthError::Internal(e.to_string()))?,
            login_failed_count: self.login_failed_count,
            last_failed_at: self.last_failed_at,
            locked_until: self.locked_until,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: Uuid,
    public_id: String,
    role: i16,
    expires_at_ms: i64,
    remember_me: bool,
    client_fingerprint_hash: Vec<u8>,
    client_ip: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> AuthResult<AuthSession> {
        let public_id = PublicId::from_nanoid(
            Nanoid::from_str(&self.public_id)
                .map_err(|e| AuthError::Internal(format!("Invalid public_id: {}", e)))?,
        );

        Ok(AuthSession {
            session_id: self.session_id,
            user_id: UserId::from_uuid(self.user_id),
            public_id,
            role: UserRole::from_id(self.role)
                .map_err(|e| AuthError::Internal(e.to_string()))?,
            expires_at_ms: self.expires_at_ms,
            remember_me: self.remember_me,
            client_fingerprint_hash: self.client_fingerprint_hash,
            client_ip: self.client_ip,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        })
    }
}
