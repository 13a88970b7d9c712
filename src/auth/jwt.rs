/// JWT Token Generation and Validation
///
/// Two token kinds are signed from the same claims shape: the short-lived
/// access token with the access secret, the long-lived refresh token with
/// the refresh secret. A token signed with one secret never validates
/// against the other.

use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

/// Generate an access token for a user
///
/// # Errors
/// Returns `Internal` if signing fails
pub fn generate_access_token(
    user_id: Uuid,
    role: &str,
    jti: Uuid,
    config: &JwtSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(
        user_id,
        role.to_string(),
        jti,
        config.access_token_expiry,
        config.issuer.clone(),
    );
    sign(&claims, &config.access_secret)
}

/// Generate a refresh token carrying the same `sub`, `role`, and `jti` as
/// the access token issued alongside it
///
/// # Errors
/// Returns `Internal` if signing fails
pub fn generate_refresh_token(
    user_id: Uuid,
    role: &str,
    jti: Uuid,
    config: &JwtSettings,
) -> Result<String, AppError> {
    let claims = Claims::new(
        user_id,
        role.to_string(),
        jti,
        config.refresh_token_expiry,
        config.issuer.clone(),
    );
    sign(&claims, &config.refresh_secret)
}

/// Validate an access token and extract its claims
pub fn validate_access_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    verify(token, &config.access_secret, &config.issuer)
}

/// Validate a refresh token and extract its claims
pub fn validate_refresh_token(token: &str, config: &JwtSettings) -> Result<Claims, AppError> {
    verify(token, &config.refresh_secret, &config.issuer)
}

fn sign(claims: &Claims, secret: &str) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

fn verify(token: &str, secret: &str, issuer: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[issuer]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::warn!("JWT validation error: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::Auth(AuthError::TokenExpired),
            _ => AppError::Auth(AuthError::TokenInvalid),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            access_secret: "access-secret-key-at-least-32-chars-long".to_string(),
            refresh_secret: "refresh-secret-key-at-least-32-chars-lg".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 2_592_000,
            issuer: "test".to_string(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();
        let jti = Uuid::new_v4();

        let token = generate_access_token(user_id, "admin", jti, &config)
            .expect("Failed to generate token");
        let claims = validate_access_token(&token, &config).expect("Failed to validate token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.jti, jti.to_string());
        assert_eq!(claims.iss, "test");
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();
        let jti = Uuid::new_v4();

        let token = generate_refresh_token(user_id, "user", jti, &config)
            .expect("Failed to generate token");
        let claims = validate_refresh_token(&token, &config).expect("Failed to validate token");

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.jti, jti.to_string());
        assert_eq!(claims.exp - claims.iat, config.refresh_token_expiry);
    }

    #[test]
    fn test_secrets_are_not_interchangeable() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();
        let jti = Uuid::new_v4();

        let access = generate_access_token(user_id, "user", jti, &config).unwrap();
        let refresh = generate_refresh_token(user_id, "user", jti, &config).unwrap();

        assert!(validate_refresh_token(&access, &config).is_err());
        assert!(validate_access_token(&refresh, &config).is_err());
    }

    #[test]
    fn test_pair_shares_payload_but_not_signature() {
        let config = get_test_config();
        let user_id = Uuid::new_v4();
        let jti = Uuid::new_v4();

        let access = generate_access_token(user_id, "admin", jti, &config).unwrap();
        let refresh = generate_refresh_token(user_id, "admin", jti, &config).unwrap();

        assert_ne!(access, refresh);

        let access_claims = validate_access_token(&access, &config).unwrap();
        let refresh_claims = validate_refresh_token(&refresh, &config).unwrap();
        assert_eq!(access_claims.sub, refresh_claims.sub);
        assert_eq!(access_claims.role, refresh_claims.role);
        assert_eq!(access_claims.jti, refresh_claims.jti);
    }

    #[test]
    fn test_tampered_token() {
        let config = get_test_config();
        let token =
            generate_access_token(Uuid::new_v4(), "user", Uuid::new_v4(), &config).unwrap();

        let tampered = format!("{}X", token);
        assert!(validate_access_token(&tampered, &config).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let mut config = get_test_config();
        let token =
            generate_access_token(Uuid::new_v4(), "user", Uuid::new_v4(), &config).unwrap();

        config.issuer = "wrong-issuer".to_string();
        assert!(validate_access_token(&token, &config).is_err());
    }

    #[test]
    fn test_invalid_token() {
        let config = get_test_config();
        let result = validate_access_token("invalid.token.here", &config);

        assert!(result.is_err());
    }
}
