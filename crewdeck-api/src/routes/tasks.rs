/// Task endpoints: CRUD, board projections, and the change stream
///
/// # Endpoints
///
/// - `POST /v1/projects/:id/tasks` - Create a task (owner only)
/// - `PATCH /v1/projects/:id/tasks/:task_id` - Edit a task (owner only)
/// - `DELETE /v1/projects/:id/tasks/:task_id` - Delete a task (owner only)
/// - `PATCH /v1/tasks/:id/status` - Move a task (any signed-in user)
/// - `GET /v1/projects/:id/tasks` - List tasks with assignees (public)
/// - `GET /v1/projects/:id/board` - Status columns (public)
/// - `GET /v1/projects/:id/timeline` - Deadline groups (public)
/// - `GET /v1/projects/:id/tasks/events` - SSE change stream (public)
///
/// # Authorization
///
/// Create, edit, and delete are gated on project ownership. Edit and delete
/// resolve the project from the task row itself, never from the path: a
/// task id paired with a project it does not belong to is a 404, so the
/// path project id can't be used to route the ownership check to a project
/// the caller controls.
///
/// Status moves only require a signed-in user; any account can drag any
/// card. Reads are public.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::projects::require_owner,
};
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::{DateTime, Utc};
use crewdeck_shared::{
    auth::middleware::AuthContext,
    board::{group_by_deadline, group_by_status, DeadlineGroups, StatusColumns},
    events::{TaskEvent, TaskEventKind},
    models::{
        project::Project,
        task::{CreateTask, Task, TaskPriority, TaskStatus, TaskWithAssignee, UpdateTask},
    },
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::{wrappers::errors::BroadcastStreamRecvError, wrappers::BroadcastStream};
use tokio_stream::StreamExt;
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Assignee
    pub assignee_id: Uuid,

    /// Priority
    pub priority: TaskPriority,

    /// Initial board column (defaults to todo)
    pub status: Option<TaskStatus>,

    /// Due date
    pub deadline: DateTime<Utc>,

    /// Optional labels
    pub tags: Option<Vec<String>>,
}

/// Edit task request; absent fields stay unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New assignee
    pub assignee_id: Option<Uuid>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date
    pub deadline: Option<DateTime<Utc>>,

    /// New labels
    pub tags: Option<Vec<String>>,
}

/// Status move request
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    /// Column to move the task to
    pub status: TaskStatus,
}

/// Loads a task, checks it belongs to the project in the path, and requires
/// the caller to own that project
///
/// The ownership check runs against the task's stored project, so the path
/// project id only ever narrows access. A mismatch is reported as 404,
/// identical to a missing task.
async fn require_task_owner(
    state: &AppState,
    project_id: Uuid,
    task_id: Uuid,
    user_id: Uuid,
) -> ApiResult<Task> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .filter(|t| t.project_id == project_id)
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let project = Project::find_by_id(&state.db, task.project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    if project.owner_id != user_id {
        return Err(ApiError::Forbidden(
            "Only the project owner can modify tasks".to_string(),
        ));
    }

    Ok(task)
}

/// POST /v1/projects/:id/tasks
///
/// # Errors
///
/// - `401 Unauthorized`: Not signed in
/// - `404 Not Found`: Project unknown
/// - `403 Forbidden`: Caller does not own the project
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;
    require_owner(&state, project_id, auth.user_id).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            project_id,
            name: req.name,
            description: req.description,
            assignee_id: req.assignee_id,
            created_by: auth.user_id,
            priority: req.priority,
            status: req.status.unwrap_or(TaskStatus::Todo),
            deadline: req.deadline,
            tags: req.tags,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, project_id = %project_id, "Task created");

    state.events.publish(TaskEvent::new(
        project_id,
        task.id,
        TaskEventKind::Created,
        Some(task.status),
    ));

    Ok(Json(task))
}

/// PATCH /v1/projects/:id/tasks/:task_id
///
/// Partial update: absent fields stay unchanged, `updated_at` always moves.
/// Status is not editable here; use the status endpoint.
///
/// # Errors
///
/// - `404 Not Found`: Task unknown, or not in the path's project
/// - `403 Forbidden`: Caller does not own the task's project
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;
    require_task_owner(&state, project_id, task_id, auth.user_id).await?;

    let task = Task::update(
        &state.db,
        task_id,
        UpdateTask {
            name: req.name,
            description: req.description,
            assignee_id: req.assignee_id,
            priority: req.priority,
            deadline: req.deadline,
            tags: req.tags,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    state.events.publish(TaskEvent::new(
        project_id,
        task.id,
        TaskEventKind::Updated,
        None,
    ));

    Ok(Json(task))
}

/// DELETE /v1/projects/:id/tasks/:task_id
///
/// Hard delete, no tombstone. Deleting twice is a 404 the second time.
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((project_id, task_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    require_task_owner(&state, project_id, task_id, auth.user_id).await?;

    let deleted = Task::delete(&state.db, task_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %task_id, project_id = %project_id, "Task deleted");

    state.events.publish(TaskEvent::new(
        project_id,
        task_id,
        TaskEventKind::Deleted,
        None,
    ));

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// PATCH /v1/tasks/:id/status
///
/// Moves a task to another column. Any signed-in user may move any card;
/// the board treats dragging as a shared, low-stakes operation. Concurrent
/// moves are last-write-wins.
///
/// # Errors
///
/// - `401 Unauthorized`: Not signed in
/// - `404 Not Found`: Task unknown
pub async fn set_task_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> ApiResult<Json<Task>> {
    let task = Task::set_status(&state.db, task_id, req.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::debug!(
        task_id = %task_id,
        status = %task.status,
        moved_by = %auth.user_id,
        "Task moved"
    );

    state.events.publish(TaskEvent::new(
        task.project_id,
        task.id,
        TaskEventKind::StatusChanged,
        Some(task.status),
    ));

    Ok(Json(task))
}

/// GET /v1/projects/:id/tasks
///
/// Public. Returns tasks in insertion order, each with a fresh assignee
/// snapshot.
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskWithAssignee>>> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let tasks = Task::list_with_assignees(&state.db, project_id).await?;
    Ok(Json(tasks))
}

/// GET /v1/projects/:id/board
///
/// Public. Tasks partitioned into the four status columns.
pub async fn get_board(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<StatusColumns<TaskWithAssignee>>> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let tasks = Task::list_with_assignees(&state.db, project_id).await?;
    Ok(Json(group_by_status(tasks)))
}

/// GET /v1/projects/:id/timeline
///
/// Public. Tasks partitioned into deadline groups relative to now.
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<DeadlineGroups<TaskWithAssignee>>> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let tasks = Task::list_with_assignees(&state.db, project_id).await?;
    Ok(Json(group_by_deadline(tasks, Utc::now())))
}

/// GET /v1/projects/:id/tasks/events
///
/// Public. Streams task change events for the project as SSE. The stream
/// starts at the current position: clients fetch the task list first, then
/// apply events. A client that falls behind loses the oldest events and
/// should refetch.
pub async fn stream_task_events(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let rx = state.events.subscribe(project_id);

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(event) => Event::default()
            .event("task")
            .json_data(&event)
            .ok()
            .map(Ok),
        // Lagged receivers skip what they missed and resume
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "SSE subscriber lagged");
            None
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_request_validation() {
        let req = CreateTaskRequest {
            name: "".to_string(),
            description: None,
            assignee_id: Uuid::new_v4(),
            priority: TaskPriority::Medium,
            status: None,
            deadline: Utc::now(),
            tags: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_task_request_absent_fields() {
        let req: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none());
        assert!(req.deadline.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_set_status_request_rejects_unknown_status() {
        let result = serde_json::from_str::<SetStatusRequest>(r#"{"status":"archived"}"#);
        assert!(result.is_err());

        let req: SetStatusRequest = serde_json::from_str(r#"{"status":"review"}"#).unwrap();
        assert_eq!(req.status, TaskStatus::Review);
    }
}
