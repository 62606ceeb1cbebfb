/// Database models for crewdeck
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts
/// - `session`: Login sessions (list/revoke)
/// - `project`: Projects and ownership
/// - `member`: Project membership
/// - `task`: Board tasks with status/priority enums
/// - `message`: Project chat messages
///
/// # Example
///
/// ```no_run
/// use crewdeck_shared::models::user::{User, CreateUser};
/// use crewdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: "Sam Doe".to_string(),
///     image_url: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod member;
pub mod message;
pub mod project;
pub mod session;
pub mod task;
pub mod user;
