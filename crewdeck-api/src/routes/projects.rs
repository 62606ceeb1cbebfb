/// Project and membership endpoints
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create a project owned by the caller
/// - `GET /v1/projects` - List the caller's projects
/// - `GET /v1/projects/:id` - Get one project
/// - `GET /v1/projects/:id/members` - List members
/// - `POST /v1/projects/:id/members` - Add a member (owner only)
/// - `DELETE /v1/projects/:id/members/:user_id` - Remove a member (owner only)
///
/// Membership is informational: it drives who shows up in pickers, not who
/// may mutate tasks. Task mutation is gated on ownership alone.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Json,
};
use crewdeck_shared::{
    auth::middleware::AuthContext,
    models::{
        member::ProjectMember,
        project::{CreateProject, Project},
        user::User,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: Uuid,
}

/// Loads a project and requires the caller to own it
///
/// Missing project is 404; existing project owned by someone else is 403.
pub(crate) async fn require_owner(
    state: &AppState,
    project_id: Uuid,
    user_id: Uuid,
) -> ApiResult<Project> {
    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if project.owner_id != user_id {
        return Err(ApiError::Forbidden(
            "Only the project owner can do this".to_string(),
        ));
    }

    Ok(project)
}

/// POST /v1/projects
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate()?;

    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name,
            owner_id: auth.user_id,
        },
    )
    .await?;

    // The owner is also a member so they appear in assignee pickers
    ProjectMember::add(&state.db, project.id, auth.user_id).await?;

    tracing::info!(project_id = %project.id, owner_id = %auth.user_id, "Project created");

    Ok(Json(project))
}

/// GET /v1/projects
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list_by_owner(&state.db, auth.user_id).await?;
    Ok(Json(projects))
}

/// GET /v1/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// GET /v1/projects/:id/members
///
/// Returns member users without password hashes (never serialized).
pub async fn list_members(
    State(state): State<AppState>,
    _auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<User>>> {
    // 404 for unknown projects rather than an empty list
    Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let members = ProjectMember::list_by_project(&state.db, id).await?;

    let mut users = Vec::with_capacity(members.len());
    for member in members {
        if let Some(user) = User::find_by_id(&state.db, member.user_id).await? {
            users.push(user);
        }
    }

    Ok(Json(users))
}

/// POST /v1/projects/:id/members
///
/// # Errors
///
/// - `403 Forbidden`: Caller does not own the project
/// - `404 Not Found`: Project or user unknown
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<ProjectMember>> {
    require_owner(&state, id, auth.user_id).await?;

    User::find_by_id(&state.db, req.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let member = ProjectMember::add(&state.db, id, req.user_id).await?;

    Ok(Json(member))
}

/// DELETE /v1/projects/:id/members/:user_id
///
/// # Errors
///
/// - `403 Forbidden`: Caller does not own the project
/// - `404 Not Found`: Project unknown or user not a member
pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    require_owner(&state, id, auth.user_id).await?;

    let removed = ProjectMember::remove(&state.db, id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "removed": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_request_validation() {
        let req = CreateProjectRequest {
            name: "".to_string(),
        };
        assert!(req.validate().is_err());

        let req = CreateProjectRequest {
            name: "Apollo".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
