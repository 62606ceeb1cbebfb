/// Session management endpoints
///
/// # Endpoints
///
/// - `GET /v1/sessions` - List the caller's active sessions
/// - `DELETE /v1/sessions/:id` - Revoke one session
/// - `POST /v1/sessions/revoke-all` - Sign out everywhere
///
/// Revocation takes effect on the next request through the revoked session;
/// its access tokens fail the middleware's liveness check from then on.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use crewdeck_shared::{auth::middleware::AuthContext, models::session::Session};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One session in the list response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    /// Session ID
    pub id: Uuid,

    /// Client user agent captured at login
    pub user_agent: Option<String>,

    /// Client address captured at login
    pub ip_address: Option<String>,

    /// When the session was opened
    pub created_at: DateTime<Utc>,

    /// Last authenticated request through this session
    pub last_seen_at: DateTime<Utc>,

    /// True for the session the caller is using right now
    pub is_current: bool,
}

/// List response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    /// Active sessions, newest first
    pub sessions: Vec<SessionView>,
}

/// Revoke-all response
#[derive(Debug, Serialize, Deserialize)]
pub struct RevokeAllResponse {
    /// Number of sessions revoked, including the current one
    pub revoked: u64,
}

/// GET /v1/sessions
///
/// Lists the caller's active sessions, flagging the one behind this request.
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<SessionListResponse>> {
    let sessions = Session::list_active_by_user(&state.db, auth.user_id).await?;

    let sessions = sessions
        .into_iter()
        .map(|s| SessionView {
            is_current: s.id == auth.session_id,
            id: s.id,
            user_agent: s.user_agent,
            ip_address: s.ip_address,
            created_at: s.created_at,
            last_seen_at: s.last_seen_at,
        })
        .collect();

    Ok(Json(SessionListResponse { sessions }))
}

/// DELETE /v1/sessions/:id
///
/// Revokes one of the caller's sessions. Revoking the current session signs
/// the caller out.
///
/// # Errors
///
/// - `404 Not Found`: Session unknown, already revoked, or owned by someone
///   else
pub async fn revoke_session(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let revoked = Session::revoke(&state.db, id, auth.user_id).await?;

    if !revoked {
        return Err(ApiError::NotFound("Session not found".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, session_id = %id, "Session revoked");

    Ok(Json(serde_json::json!({ "revoked": true })))
}

/// POST /v1/sessions/revoke-all
///
/// Signs the caller out everywhere: other sessions are revoked first, the
/// current session last, so a failure partway leaves the caller still able
/// to retry.
pub async fn revoke_all_sessions(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<RevokeAllResponse>> {
    let others = Session::revoke_all_except(&state.db, auth.user_id, auth.session_id).await?;

    let current =
        Session::revoke(&state.db, auth.session_id, auth.user_id).await? as u64;

    tracing::info!(
        user_id = %auth.user_id,
        revoked = others + current,
        "All sessions revoked"
    );

    Ok(Json(RevokeAllResponse {
        revoked: others + current,
    }))
}
