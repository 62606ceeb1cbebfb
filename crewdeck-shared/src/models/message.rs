/// Project chat message model
///
/// Chat is a flat per-project stream. Messages authored by the built-in
/// assistant have `author_id` NULL; human messages always carry the author's
/// user id. Messages are immutable once written.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE chat_messages (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     author_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     body TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A chat message in a project's stream
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,

    /// Project the message belongs to
    pub project_id: Uuid,

    /// Author; None marks a message from the assistant
    pub author_id: Option<Uuid>,

    /// Message text
    pub body: String,

    /// When the message was posted
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Posts a message to a project's chat
    pub async fn create(
        pool: &PgPool,
        project_id: Uuid,
        author_id: Option<Uuid>,
        body: &str,
    ) -> Result<Self, sqlx::Error> {
        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (project_id, author_id, body)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, author_id, body, created_at
            "#,
        )
        .bind(project_id)
        .bind(author_id)
        .bind(body)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// Lists a project's messages, oldest first
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, project_id, author_id, body, created_at
            FROM chat_messages
            WHERE project_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// Lists the most recent messages, oldest first
    ///
    /// Used to build the assistant's conversation window.
    pub async fn list_recent(
        pool: &PgPool,
        project_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, project_id, author_id, body, created_at
            FROM (
                SELECT id, project_id, author_id, body, created_at
                FROM chat_messages
                WHERE project_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
            ) recent
            ORDER BY created_at, id
            "#,
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }

    /// True when this message was written by the assistant
    pub fn is_from_assistant(&self) -> bool {
        self.author_id.is_none()
    }
}
