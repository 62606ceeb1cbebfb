/// Request authentication for Axum
///
/// [`AuthContext`] is an extractor: a handler that needs the caller's
/// identity takes it as a parameter, and extraction validates the Bearer
/// token and checks the token's backing session row is still active.
/// Handlers without the parameter stay public, so a router can mix
/// authenticated mutations and public reads on the same paths.
///
/// The database check is what makes revocation bite: a signed, unexpired
/// token whose session was revoked is rejected with 401.
///
/// # Example
///
/// ```no_run
/// use crewdeck_shared::auth::middleware::AuthContext;
///
/// async fn create_something(auth: AuthContext) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::models::session::Session;

/// State an application must expose for authentication to run
pub trait AuthState {
    /// Database pool for the session liveness check
    fn pool(&self) -> &PgPool;

    /// Secret the tokens were signed with
    fn jwt_secret(&self) -> &str;
}

/// The authenticated caller
///
/// Extracted from the `Authorization: Bearer <token>` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Login session the request authenticated through
    pub session_id: Uuid,
}

/// Error type for authentication
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Invalid authorization header format
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),

    /// Session revoked or unknown
    SessionRevoked,

    /// Database error
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::SessionRevoked => {
                (StatusCode::UNAUTHORIZED, "Session is no longer active").into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// Fails if:
/// - the Authorization header is missing or not a Bearer token
/// - token validation fails or the token has expired
/// - the session in the `sid` claim is revoked, unknown, or belongs to a
///   different user
pub async fn authenticate(
    pool: &PgPool,
    secret: &str,
    headers: &HeaderMap,
) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    // Revocation check: the token is only as alive as its session
    let session = Session::find_active(pool, claims.sid)
        .await
        .map_err(|e| AuthError::DatabaseError(format!("Database error: {}", e)))?
        .ok_or(AuthError::SessionRevoked)?;

    if session.user_id != claims.sub {
        return Err(AuthError::SessionRevoked);
    }

    // Best effort; an authenticated request should not fail on bookkeeping
    if let Err(e) = Session::touch(pool, session.id).await {
        tracing::warn!(session_id = %session.id, error = %e, "Failed to touch session");
    }

    Ok(AuthContext {
        user_id: claims.sub,
        session_id: claims.sid,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: AuthState + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        authenticate(state.pool(), state.jwt_secret(), &parts.headers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AuthError::SessionRevoked.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::DatabaseError("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let headers = HeaderMap::new();
        // No Authorization header fails before any database access, so a
        // lazy pool that never connects is fine here
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/unused")
            .unwrap();
        let result = authenticate(&pool, "secret", &headers).await;

        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }
}
