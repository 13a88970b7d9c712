use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A user row as stored, including the password hash.
///
/// Deliberately not `Serialize`: the hash must never end up in a response
/// body. Convert to `SanitizedUser` before anything leaves the service.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: String,
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            first_name,
            last_name,
            password_hash,
            role: "user".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Strips the password hash off the record
    pub fn sanitize(self) -> SanitizedUser {
        SanitizedUser {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User projection safe to hand to callers and serialize into responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One row per issued refresh token, keyed by the token's `jti` claim.
///
/// Rows are never updated in place. Rotation inserts a new row under a new
/// `jti`; superseded and expired rows are reaped by external cleanup.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub jti: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(jti: Uuid, token: String, user_id: Uuid, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            jti,
            token,
            user_id,
            expires_at: now + Duration::seconds(ttl_seconds),
            created_at: now,
        }
    }
}
