/// Authentication service
///
/// Owns the credential-validation and token-issuance flows. Wired
/// explicitly: a `UserStore` for persistence plus the JWT settings, no
/// globals. Each issuance mints a fresh `jti`, signs the access/refresh
/// pair from one payload, and persists the refresh-token record before any
/// token is handed back.

use serde::Serialize;
use uuid::Uuid;

use crate::auth::jwt::{generate_access_token, generate_refresh_token};
use crate::auth::password::verify_password;
use crate::configuration::JwtSettings;
use crate::db::{RefreshTokenRecord, SanitizedUser, UserStore};
use crate::error::{AppError, AuthError, UserError};

/// Access/refresh pair returned to the caller in plaintext
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: UserStore,
    jwt: JwtSettings,
}

impl AuthService {
    pub fn new(store: UserStore, jwt: JwtSettings) -> Self {
        Self { store, jwt }
    }

    /// Validate a username/password pair against the stored hash.
    ///
    /// The returned projection carries no password hash; the hash does not
    /// leave this method. Unknown usernames and wrong passwords produce
    /// `InvalidCredentials` with distinct field pointers that render
    /// identically at the HTTP boundary.
    pub async fn validate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SanitizedUser, AppError> {
        let user = self
            .store
            .find_user_by_username(username)
            .await
            .map_err(internal("user lookup failed during credential validation"))?
            .ok_or(AppError::Auth(AuthError::InvalidCredentials {
                field: "username",
            }))?;

        let password_valid = verify_password(password, &user.password_hash)?;
        if !password_valid {
            return Err(AppError::Auth(AuthError::InvalidCredentials {
                field: "password",
            }));
        }

        Ok(user.sanitize())
    }

    /// Issue an access/refresh token pair for an already-authenticated user.
    ///
    /// Looks the user up again for the role claim; the user may have been
    /// deleted between authentication and issuance, which surfaces as
    /// `UserNotFound` with no record written. The refresh-token record is
    /// persisted before the pair is returned: if the insert fails, the
    /// whole issuance fails and no tokens escape.
    pub async fn issue_tokens(&self, user_id: Uuid) -> Result<TokenPair, AppError> {
        let user = self
            .store
            .find_user_by_id(user_id)
            .await
            .map_err(internal("user lookup failed during token issuance"))?
            .ok_or(AppError::User(UserError::NotFound))?;

        let jti = Uuid::new_v4();

        let access_token = generate_access_token(user_id, &user.role, jti, &self.jwt)?;
        let refresh_token = generate_refresh_token(user_id, &user.role, jti, &self.jwt)?;

        let record = RefreshTokenRecord::new(
            jti,
            refresh_token.clone(),
            user_id,
            self.jwt.refresh_token_expiry,
        );
        self.store
            .create_refresh_token(&record)
            .await
            .map_err(internal("failed to persist refresh token record"))?;

        tracing::info!(user_id = %user_id, jti = %jti, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Login: full credential validation, then issuance. No token exists
    /// until validation has succeeded.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(SanitizedUser, TokenPair), AppError> {
        let user = self.validate_user(username, password).await?;
        let tokens = self.issue_tokens(user.id).await?;

        Ok((user, tokens))
    }
}

/// Wraps unexpected storage failures so driver detail never crosses the
/// service boundary. Domain errors pass through untouched.
fn internal(context: &'static str) -> impl Fn(AppError) -> AppError {
    move |err| match err {
        domain @ (AppError::Auth(_) | AppError::User(_) | AppError::Validation(_)) => domain,
        other => {
            tracing::error!(error = %other, "{}", context);
            AppError::Internal(context.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_wrapper_passes_domain_errors_through() {
        let wrap = internal("ctx");
        let err = wrap(AppError::User(UserError::NotFound));
        match err {
            AppError::User(UserError::NotFound) => (),
            other => panic!("Expected UserNotFound, got {:?}", other),
        }
    }

    #[test]
    fn internal_wrapper_hides_storage_detail() {
        let wrap = internal("ctx");
        let err = wrap(AppError::from(sqlx::Error::PoolClosed));
        match err {
            AppError::Internal(msg) => assert_eq!(msg, "ctx"),
            other => panic!("Expected Internal, got {:?}", other),
        }
    }
}
