//! # Crewdeck API Server
//!
//! HTTP API for the crewdeck project board: task CRUD with per-project
//! ownership checks, board and timeline projections, live change streaming
//! over SSE, session management, and a chat assistant.
//!
//! ## Modules
//!
//! - [`app`]: Application state and router assembly
//! - [`config`]: Environment-based configuration
//! - [`error`]: Unified API error type
//! - [`routes`]: HTTP handlers
//! - [`assistant`]: Chat completion backends
//! - [`middleware`]: Security headers

pub mod app;
pub mod assistant;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
