/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use crewdeck_api::{app::{AppState, build_router}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    assistant::{http::HttpCompletionModel, mock::MockCompletionModel, CompletionModel},
    config::Config,
    middleware::security::SecurityHeadersLayer,
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use crewdeck_shared::{auth::middleware::AuthState, events::EventHub};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; everything inside is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Task change broadcast hub
    pub events: EventHub,

    /// Chat completion backend for the assistant
    pub assistant: Arc<dyn CompletionModel>,
}

impl AppState {
    /// Creates application state, picking the assistant backend from config
    ///
    /// With `ASSISTANT_API_URL` set the assistant talks to the configured
    /// endpoint; otherwise it serves canned replies.
    pub fn new(db: PgPool, config: Config) -> Self {
        let assistant: Arc<dyn CompletionModel> = match &config.assistant.api_url {
            Some(url) => Arc::new(HttpCompletionModel::new(
                url.clone(),
                config.assistant.api_key.clone(),
                config.assistant.model.clone(),
            )),
            None => Arc::new(MockCompletionModel::new()),
        };

        Self::with_assistant(db, config, assistant)
    }

    /// Creates application state with an explicit assistant backend
    pub fn with_assistant(
        db: PgPool,
        config: Config,
        assistant: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            events: EventHub::new(),
            assistant,
        }
    }
}

impl AuthState for AppState {
    fn pool(&self) -> &PgPool {
        &self.db
    }

    fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                   # Health check (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register                    # Create account (public)
///     │   ├── POST /login                       # Open session (public)
///     │   └── POST /refresh                     # New access token (public)
///     ├── /sessions/
///     │   ├── GET    /                          # List active sessions
///     │   ├── DELETE /:id                       # Revoke one session
///     │   └── POST   /revoke-all                # Sign out everywhere
///     ├── /projects/
///     │   ├── POST   /                          # Create project
///     │   ├── GET    /                          # List own projects
///     │   ├── GET    /:id                       # Get project
///     │   ├── GET    /:id/members               # List members
///     │   ├── POST   /:id/members               # Add member (owner)
///     │   ├── DELETE /:id/members/:user_id      # Remove member (owner)
///     │   ├── GET    /:id/tasks                 # List tasks (public)
///     │   ├── POST   /:id/tasks                 # Create task (owner)
///     │   ├── PATCH  /:id/tasks/:task_id        # Edit task (owner)
///     │   ├── DELETE /:id/tasks/:task_id        # Delete task (owner)
///     │   ├── GET    /:id/board                 # Status columns (public)
///     │   ├── GET    /:id/timeline              # Deadline groups (public)
///     │   ├── GET    /:id/tasks/events          # SSE change stream (public)
///     │   ├── GET    /:id/chat                  # Chat history
///     │   └── POST   /:id/chat                  # Post message
///     └── /tasks/
///         └── PATCH  /:id/status                # Move task (any signed-in user)
/// ```
///
/// Authentication is per handler: handlers that take an `AuthContext`
/// parameter require a valid Bearer token, the rest are public.
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let session_routes = Router::new()
        .route("/", get(routes::sessions::list_sessions))
        .route("/:id", delete(routes::sessions::revoke_session))
        .route("/revoke-all", post(routes::sessions::revoke_all_sessions));

    let project_routes = Router::new()
        .route(
            "/",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route("/:id", get(routes::projects::get_project))
        .route(
            "/:id/members",
            get(routes::projects::list_members).post(routes::projects::add_member),
        )
        .route("/:id/members/:user_id", delete(routes::projects::remove_member))
        .route(
            "/:id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id/tasks/:task_id",
            patch(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/:id/board", get(routes::tasks::get_board))
        .route("/:id/timeline", get(routes::tasks::get_timeline))
        .route("/:id/tasks/events", get(routes::tasks::stream_task_events))
        .route(
            "/:id/chat",
            get(routes::chat::list_messages).post(routes::chat::post_message),
        );

    let task_routes = Router::new().route("/:id/status", patch(routes::tasks::set_task_status));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/sessions", session_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes);

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
