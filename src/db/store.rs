use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{RefreshTokenRecord, User};
use crate::error::{AppError, DatabaseError, UserError};

/// Repository over the connection pool.
///
/// Guarantees the storage contract the auth core relies on: username and
/// email uniqueness (PostgreSQL constraints) and atomic single-record
/// inserts for refresh-token records.
#[derive(Clone)]
pub struct UserStore {
    pool: PgPool,
}

impl UserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, role,
                   created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, first_name, last_name, password_hash, role,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a new user. Unique-constraint violations surface as
    /// `UserError::AlreadyExists` with the offending field.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, first_name, last_name, password_hash,
                               role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match AppError::from(e) {
            // The violation message names the constraint, e.g.
            // `unique constraint "users_email_key"`
            AppError::Database(DatabaseError::UniqueConstraintViolation(detail)) => {
                let field = if detail.contains("email") {
                    "email"
                } else {
                    "username"
                };
                AppError::User(UserError::AlreadyExists(field.to_string()))
            }
            other => other,
        })?;

        Ok(())
    }

    /// Persists one refresh-token record as a single atomic insert.
    ///
    /// Concurrent issuances for the same user land as separate rows under
    /// distinct `jti` values; there is nothing to contend on.
    pub async fn create_refresh_token(
        &self,
        record: &RefreshTokenRecord,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (jti, token, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.jti)
        .bind(&record.token)
        .bind(record.user_id)
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
