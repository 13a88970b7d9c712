/// Authentication Routes
///
/// Handles user registration, login, token refresh, and current user
/// information.

use actix_web::{web, HttpResponse};

use crate::auth::{hash_password, AuthService, Claims, TokenPair};
use crate::configuration::JwtSettings;
use crate::db::{SanitizedUser, User, UserStore};
use crate::error::{AppError, UserError};
use crate::validators::{is_valid_email, is_valid_name, is_valid_username};
use serde::{Deserialize, Serialize};

/// User registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: the sanitized account plus the token pair
#[derive(Serialize)]
pub struct LoginResponse {
    pub user: SanitizedUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Token response for the refresh endpoint
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponse {
    fn new(tokens: TokenPair, expires_in: i64) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// POST /auth/register
///
/// Create a new account. Returns the sanitized user; tokens are only
/// issued through login.
///
/// # Errors
/// - 400: invalid username/email/name or weak password
/// - 409: username or email already registered
/// - 500: internal server error
pub async fn register(
    form: web::Json<RegisterRequest>,
    store: web::Data<UserStore>,
) -> Result<HttpResponse, AppError> {
    let username = is_valid_username(&form.username)?;
    let email = is_valid_email(&form.email)?;
    let first_name = is_valid_name(&form.first_name, "first_name")?;
    let last_name = is_valid_name(&form.last_name, "last_name")?;
    let password_hash = hash_password(&form.password)?;

    let user = User::new(username, email, first_name, last_name, password_hash);
    store.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(user.sanitize()))
}

/// POST /auth/login
///
/// Authenticate with username and password; returns the sanitized user and
/// an access/refresh token pair.
///
/// # Security Notes
/// - Unknown username and wrong password produce the same response body,
///   so accounts cannot be enumerated.
///
/// # Errors
/// - 401: invalid credentials
/// - 500: internal server error
pub async fn login(
    form: web::Json<LoginRequest>,
    service: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let (user, tokens) = service.login(&form.username, &form.password).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        user,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// POST /auth/refresh
///
/// Re-issues a token pair for the subject of the presented refresh token.
/// The refresh guard has already verified the token against the refresh
/// secret and injected its claims; this handler trusts the subject claim.
/// Every rotation mints a brand-new `jti` and persists a new record; the
/// superseded record is left for external cleanup.
///
/// # Errors
/// - 401: missing/invalid refresh token (handled by the guard)
/// - 404: account no longer exists
/// - 500: internal server error
pub async fn refresh(
    claims: web::ReqData<Claims>,
    service: web::Data<AuthService>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let tokens = service.issue_tokens(user_id).await?;

    tracing::info!(user_id = %user_id, "Token pair rotated");

    Ok(HttpResponse::Ok().json(TokenResponse::new(tokens, jwt_config.access_token_expiry)))
}

/// GET /auth/me
///
/// Current authenticated user's information. Requires a valid access token
/// in the Authorization header; claims are injected by the access guard.
///
/// # Errors
/// - 401: missing or invalid token (handled by the guard)
/// - 404: account no longer exists
pub async fn get_current_user(
    claims: web::ReqData<Claims>,
    store: web::Data<UserStore>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let user = store
        .find_user_by_id(user_id)
        .await?
        .ok_or(AppError::User(UserError::NotFound))?;

    Ok(HttpResponse::Ok().json(user.sanitize()))
}
