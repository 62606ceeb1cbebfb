/// Task model and database operations
///
/// Tasks are the core entity of the board. Every task belongs to exactly one
/// project (`project_id` is never reassigned), carries a closed status and
/// priority, and records both its creator and its assignee by id.
///
/// # Columns
///
/// The four statuses are the four fixed Kanban columns:
///
/// ```text
/// todo | in_progress | review | done
/// ```
///
/// There is no transition rule between them: any status can move to any
/// other, the board columns are just buckets.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'review', 'done');
/// CREATE TYPE task_priority AS ENUM ('critical', 'high', 'medium', 'low');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     assignee_id UUID NOT NULL REFERENCES users(id),
///     created_by UUID NOT NULL REFERENCES users(id),
///     priority task_priority NOT NULL,
///     status task_status NOT NULL DEFAULT 'todo',
///     deadline TIMESTAMPTZ NOT NULL,
///     tags TEXT[],
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use crewdeck_shared::models::task::{Task, CreateTask, TaskPriority, TaskStatus};
/// use crewdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::{Duration, Utc};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     project_id: Uuid::new_v4(),
///     name: "Ship the landing page".to_string(),
///     description: None,
///     assignee_id: Uuid::new_v4(),
///     created_by: Uuid::new_v4(),
///     priority: TaskPriority::High,
///     status: TaskStatus::Todo,
///     deadline: Utc::now() + Duration::days(3),
///     tags: Some(vec!["frontend".to_string()]),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::user::{AssigneeSummary, User};

/// Task status — one of the four fixed board columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Waiting on review
    Review,

    /// Finished
    Done,
}

impl TaskStatus {
    /// All statuses in board-column order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Converts status to its column identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "review" => Ok(TaskStatus::Review),
            "done" => Ok(TaskStatus::Done),
            _ => Err(()),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Drop everything
    Critical,

    /// Needed soon
    High,

    /// Default urgency
    Medium,

    /// Whenever
    Low,
}

impl TaskPriority {
    /// Converts priority to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Critical => "critical",
            TaskPriority::High => "high",
            TaskPriority::Medium => "medium",
            TaskPriority::Low => "low",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task model representing a board card
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning project; immutable after creation
    pub project_id: Uuid,

    /// Task title
    pub name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// User the task is delegated to
    pub assignee_id: Uuid,

    /// User who created the task; fixed at creation
    pub created_by: Uuid,

    /// Priority
    pub priority: TaskPriority,

    /// Current board column
    pub status: TaskStatus,

    /// When the task is due
    pub deadline: DateTime<Utc>,

    /// Optional free-form labels
    pub tags: Option<Vec<String>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated (refreshed on every update)
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning project
    pub project_id: Uuid,

    /// Task title
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Assignee
    pub assignee_id: Uuid,

    /// Creator (the authenticated caller)
    pub created_by: Uuid,

    /// Priority
    pub priority: TaskPriority,

    /// Initial board column
    pub status: TaskStatus,

    /// Due date
    pub deadline: DateTime<Utc>,

    /// Optional labels
    pub tags: Option<Vec<String>>,
}

/// Partial update for a task
///
/// Merge rule: field present → overwrite, field absent → unchanged.
/// `project_id`, `created_by`, and `status` are deliberately absent —
/// the first two are immutable and status moves only through
/// [`Task::set_status`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
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

impl UpdateTask {
    /// True when no field is present (the update would only touch `updated_at`)
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.assignee_id.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
            && self.tags.is_none()
    }
}

/// A task annotated with a fresh assignee snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithAssignee {
    /// The task itself
    #[serde(flatten)]
    pub task: Task,

    /// Assignee details looked up at read time (None if the user vanished)
    pub assignee: Option<AssigneeSummary>,
}

const TASK_COLUMNS: &str = "id, project_id, name, description, assignee_id, created_by, \
                            priority, status, deadline, tags, created_at, updated_at";

impl Task {
    /// Creates a new task
    ///
    /// `created_at` and `updated_at` are both set to the current time.
    /// Task names are not unique within a project.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (project_id, name, description, assignee_id, created_by,
                               priority, status, deadline, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(data.project_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.assignee_id)
        .bind(data.created_by)
        .bind(data.priority)
        .bind(data.status)
        .bind(data.deadline)
        .bind(data.tags)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Applies a partial update to a task
    ///
    /// Only fields present in `data` are written; `updated_at` is always
    /// refreshed, even for an empty update.
    ///
    /// # Returns
    ///
    /// The updated task, or None if the task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.deadline.is_some() {
            bind_count += 1;
            query.push_str(&format!(", deadline = ${}", bind_count));
        }
        if data.tags.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tags = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(deadline) = data.deadline {
            q = q.bind(deadline);
        }
        if let Some(tags) = data.tags {
            q = q.bind(tags);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Moves a task to a new board column
    ///
    /// Always refreshes `updated_at`. Concurrent moves are last-write-wins;
    /// there is no lock between drag-start and drag-end.
    pub async fn set_status(
        pool: &PgPool,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET status = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task unconditionally (no tombstone)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a project's tasks in insertion order
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE project_id = $1
            ORDER BY created_at, id
            "#,
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists a project's tasks with assignee snapshots
    ///
    /// The assignee is looked up fresh at read time, one lookup per task,
    /// never denormalized at write time.
    pub async fn list_with_assignees(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
        let tasks = Self::list_by_project(pool, project_id).await?;

        let mut annotated = Vec::with_capacity(tasks.len());
        for task in tasks {
            let assignee = User::find_by_id(pool, task.assignee_id)
                .await?
                .map(|u| AssigneeSummary::from(&u));
            annotated.push(TaskWithAssignee { task, assignee });
        }

        Ok(annotated)
    }

    /// Counts tasks in a project
    pub async fn count_by_project(pool: &PgPool, project_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Review.as_str(), "review");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_task_status_from_str() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        assert!("doing".parse::<TaskStatus>().is_err());
        assert!("".parse::<TaskStatus>().is_err());
        // Column ids are exact; no case folding
        assert!("Todo".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_status_serde_round_trip() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: TaskStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TaskStatus::InProgress);

        // An out-of-set value must be unrepresentable
        assert!(serde_json::from_str::<TaskStatus>("\"blocked\"").is_err());
    }

    #[test]
    fn test_task_priority_serde() {
        assert_eq!(
            serde_json::to_string(&TaskPriority::Critical).unwrap(),
            "\"critical\""
        );
        assert!(serde_json::from_str::<TaskPriority>("\"urgent\"").is_err());
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());

        let update = UpdateTask {
            name: Some("renamed".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    // Integration tests for database operations are in tests/
}
