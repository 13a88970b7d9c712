/// JWT Claims structure
///
/// The payload signed into both access and refresh tokens. An access token
/// and the refresh token issued alongside it share one payload (same `sub`,
/// `role`, `jti`); only the expiry window and the signing secret differ.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Role copied from the user record at issuance time
    pub role: String,
    /// Unique token identifier, primary key of the refresh-token record
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create new claims with user information
    ///
    /// # Arguments
    /// * `user_id` - User's UUID
    /// * `role` - User's role
    /// * `jti` - Token identifier shared by the access/refresh pair
    /// * `expiry_seconds` - Token expiration in seconds from now
    /// * `issuer` - Issuer identifier
    pub fn new(
        user_id: Uuid,
        role: String,
        jti: Uuid,
        expiry_seconds: i64,
        issuer: String,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            role,
            jti: jti.to_string(),
            exp: now + expiry_seconds,
            iat: now,
            iss: issuer,
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns error if the subject is not a valid UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Internal("Invalid user ID in token".to_string()))
    }

    /// Extract the token identifier from claims
    pub fn token_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.jti)
            .map_err(|_| AppError::Internal("Invalid token ID in token".to_string()))
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.exp < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let jti = Uuid::new_v4();
        let claims = Claims::new(user_id, "admin".to_string(), jti, 900, "test".to_string());

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.jti, jti.to_string());
        assert_eq!(claims.iss, "test");
        assert_eq!(claims.exp - claims.iat, 900);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_user_id_extraction() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            "user".to_string(),
            Uuid::new_v4(),
            900,
            "test".to_string(),
        );

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_token_id_extraction() {
        let jti = Uuid::new_v4();
        let claims = Claims::new(
            Uuid::new_v4(),
            "user".to_string(),
            jti,
            900,
            "test".to_string(),
        );

        assert_eq!(claims.token_id().unwrap(), jti);
    }

    #[test]
    fn test_invalid_subject() {
        let mut claims = Claims::new(
            Uuid::new_v4(),
            "user".to_string(),
            Uuid::new_v4(),
            900,
            "test".to_string(),
        );
        claims.sub = "invalid-uuid".to_string();

        assert!(claims.user_id().is_err());
    }
}
