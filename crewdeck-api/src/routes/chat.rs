/// Project chat endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects/:id/chat` - Chat history, oldest first
/// - `POST /v1/projects/:id/chat` - Post a message
///
/// Posting a message that mentions `@crew` makes the assistant reply. The
/// reply is stored with a NULL author and returned alongside the posted
/// message; a failing completion backend never fails the post itself.

use crate::{
    app::AppState,
    assistant::{mentions_assistant, persona::PERSONA_PROMPT, ChatTurn, Role},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use crewdeck_shared::{
    auth::middleware::AuthContext,
    models::{message::ChatMessage, project::Project},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// How many recent messages the assistant sees
const CONVERSATION_WINDOW: i64 = 20;

/// Post message request
#[derive(Debug, Deserialize, Validate)]
pub struct PostMessageRequest {
    /// Message text
    #[validate(length(min = 1, max = 4000, message = "Body must be 1-4000 characters"))]
    pub body: String,
}

/// Post message response
#[derive(Debug, Serialize, Deserialize)]
pub struct PostMessageResponse {
    /// The stored message
    pub message: ChatMessage,

    /// The assistant's reply, when the message mentioned it and the
    /// completion succeeded
    pub reply: Option<ChatMessage>,
}

/// GET /v1/projects/:id/chat
pub async fn list_messages(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let messages = ChatMessage::list_by_project(&state.db, project_id).await?;
    Ok(Json(messages))
}

/// POST /v1/projects/:id/chat
///
/// # Errors
///
/// - `401 Unauthorized`: Not signed in
/// - `404 Not Found`: Project unknown
/// - `422 Unprocessable Entity`: Empty or oversized body
pub async fn post_message(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Json(req): Json<PostMessageRequest>,
) -> ApiResult<Json<PostMessageResponse>> {
    req.validate()?;

    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let message =
        ChatMessage::create(&state.db, project_id, Some(auth.user_id), &req.body).await?;

    let reply = if mentions_assistant(&req.body) {
        match assistant_reply(&state, project_id).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                // The post succeeded; the assistant just stays quiet
                tracing::warn!(project_id = %project_id, error = %e, "Assistant reply failed");
                None
            }
        }
    } else {
        None
    };

    Ok(Json(PostMessageResponse { message, reply }))
}

/// Runs the completion backend over the recent conversation and stores the
/// reply as an assistant message
async fn assistant_reply(state: &AppState, project_id: Uuid) -> ApiResult<ChatMessage> {
    let recent = ChatMessage::list_recent(&state.db, project_id, CONVERSATION_WINDOW).await?;

    let mut turns = Vec::with_capacity(recent.len() + 1);
    turns.push(ChatTurn::new(Role::System, PERSONA_PROMPT));
    for message in &recent {
        let role = if message.is_from_assistant() {
            Role::Assistant
        } else {
            Role::User
        };
        turns.push(ChatTurn::new(role, message.body.clone()));
    }

    let reply_text = state.assistant.complete(&turns).await?;

    let reply = ChatMessage::create(&state.db, project_id, None, &reply_text).await?;

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_message_request_validation() {
        let req = PostMessageRequest {
            body: "".to_string(),
        };
        assert!(req.validate().is_err());

        let req = PostMessageRequest {
            body: "@crew status on the deploy?".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
