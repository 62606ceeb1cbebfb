/// HTTP route handlers
///
/// # Modules
///
/// - `health`: Liveness check
/// - `auth`: Registration, login, token refresh
/// - `sessions`: Session listing and revocation
/// - `projects`: Projects and membership
/// - `tasks`: Task CRUD, board and timeline projections, SSE change stream
/// - `chat`: Project chat and the assistant

pub mod auth;
pub mod chat;
pub mod health;
pub mod projects;
pub mod sessions;
pub mod tasks;
