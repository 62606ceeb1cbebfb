/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Create account, open a session, return tokens
/// - `POST /v1/auth/login` - Open a session and return tokens
/// - `POST /v1/auth/refresh` - Exchange a refresh token for a new access token
///
/// Both register and login open a session row; the returned tokens carry its
/// id and die with it.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::HeaderMap, Json};
use crewdeck_shared::{
    auth::{jwt, password},
    models::{
        session::{CreateSession, Session},
        user::{CreateUser, User},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (also validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Optional avatar URL
    #[validate(url(message = "Invalid image URL"))]
    pub image_url: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Token response shared by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// User ID
    pub user_id: Uuid,

    /// Session the tokens are bound to
    pub session_id: Uuid,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Opens a session for the user and mints its token pair
async fn open_session(
    state: &AppState,
    user_id: Uuid,
    headers: &HeaderMap,
) -> ApiResult<TokenResponse> {
    let user_agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.chars().take(512).collect());
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string());

    let session = Session::create(
        &state.db,
        CreateSession {
            user_id,
            user_agent,
            ip_address,
        },
    )
    .await?;

    let secret = &state.config.jwt.secret;
    let access_claims = jwt::Claims::new(user_id, session.id, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user_id, session.id, jwt::TokenType::Refresh);

    Ok(TokenResponse {
        user_id,
        session_id: session.id,
        access_token: jwt::create_token(&access_claims, secret)?,
        refresh_token: jwt::create_token(&refresh_claims, secret)?,
    })
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123",
///   "name": "Sam Doe"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `400 Bad Request`: Password too weak
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;
    password::validate_password_strength(&req.password).map_err(ApiError::BadRequest)?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email.to_lowercase(),
            password_hash,
            name: req.name,
            image_url: req.image_url,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    let tokens = open_session(&state, user.id, &headers).await?;
    Ok(Json(tokens))
}

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (indistinguishable
///   on purpose)
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let verified = password::verify_password(&req.password, &user.password_hash)?;
    if !verified {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    tracing::info!(user_id = %user.id, "User logged in");

    let tokens = open_session(&state, user.id, &headers).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new access token
///
/// The refresh token's session must still be active; signing out kills
/// refresh as well.
///
/// # Errors
///
/// - `401 Unauthorized`: Refresh token invalid, expired, or its session
///   revoked
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let secret = &state.config.jwt.secret;

    let claims = jwt::validate_refresh_token(&req.refresh_token, secret)?;

    let session = Session::find_active(&state.db, claims.sid)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Session is no longer active".to_string()))?;

    if session.user_id != claims.sub {
        return Err(ApiError::Unauthorized(
            "Session is no longer active".to_string(),
        ));
    }

    let access_token = jwt::refresh_access_token(&req.refresh_token, secret)?;

    Ok(Json(RefreshResponse { access_token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            name: "".to_string(),
            image_url: None,
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn test_valid_register_request() {
        let req = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "SecureP@ss123".to_string(),
            name: "Sam".to_string(),
            image_url: Some("https://img.example/sam.png".to_string()),
        };

        assert!(req.validate().is_ok());
    }
}
