/// Login session model and database operations
///
/// A session row is opened at login and referenced from access tokens by id,
/// so revoking the row invalidates every token minted for it. Revocation is a
/// soft delete: `revoked_at` is set and the row kept for audit.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     user_agent VARCHAR(512),
///     ip_address VARCHAR(64),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_seen_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     revoked_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A login session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Unique session ID, carried in token claims
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Client user agent captured at login
    pub user_agent: Option<String>,

    /// Client address captured at login
    pub ip_address: Option<String>,

    /// When the session was opened
    pub created_at: DateTime<Utc>,

    /// Last authenticated request through this session
    pub last_seen_at: DateTime<Utc>,

    /// Set when the session is revoked; NULL while active
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Input for opening a new session
#[derive(Debug, Clone, Default)]
pub struct CreateSession {
    /// Owning user
    pub user_id: Uuid,

    /// Client user agent, if sent
    pub user_agent: Option<String>,

    /// Client address, if known
    pub ip_address: Option<String>,
}

const SESSION_COLUMNS: &str =
    "id, user_id, user_agent, ip_address, created_at, last_seen_at, revoked_at";

impl Session {
    /// Opens a new session for a user
    pub async fn create(pool: &PgPool, data: CreateSession) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            INSERT INTO sessions (user_id, user_agent, ip_address)
            VALUES ($1, $2, $3)
            RETURNING {SESSION_COLUMNS}
            "#,
        ))
        .bind(data.user_id)
        .bind(data.user_agent)
        .bind(data.ip_address)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a session that is still active (not revoked)
    ///
    /// Returns None for revoked and unknown ids alike; token validation
    /// treats both as a dead session.
    pub async fn find_active(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1 AND revoked_at IS NULL",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Bumps `last_seen_at` on an authenticated request
    pub async fn touch(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE sessions SET last_seen_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Lists a user's active sessions, newest first
    pub async fn list_active_by_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sessions = sqlx::query_as::<_, Session>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM sessions
            WHERE user_id = $1 AND revoked_at IS NULL
            ORDER BY created_at DESC
            "#,
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(sessions)
    }

    /// Revokes one session, scoped to its owner
    ///
    /// The `user_id` guard keeps callers from revoking sessions they do not
    /// own. Revoking an already-revoked session is a no-op and returns false.
    pub async fn revoke(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE id = $1 AND user_id = $2 AND revoked_at IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revokes every active session of a user except one
    ///
    /// Used by sign-out-everywhere, which kills the other devices first and
    /// the calling session last with a separate [`Session::revoke`].
    ///
    /// # Returns
    ///
    /// The number of sessions revoked
    pub async fn revoke_all_except(
        pool: &PgPool,
        user_id: Uuid,
        keep: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE user_id = $1 AND id <> $2 AND revoked_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(keep)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_serializes_revoked_at() {
        let session = Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_agent: Some("Mozilla/5.0".to_string()),
            ip_address: None,
            created_at: Utc::now(),
            last_seen_at: Utc::now(),
            revoked_at: None,
        };

        let json = serde_json::to_value(&session).unwrap();
        assert!(json["revoked_at"].is_null());
        assert_eq!(json["user_agent"], "Mozilla/5.0");
    }

    // Integration tests for database operations are in tests/
}
