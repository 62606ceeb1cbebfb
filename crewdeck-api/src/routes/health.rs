/// Health check endpoint

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde_json::json;

/// GET /health
///
/// Returns 200 with version info when the server and its database are
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    crewdeck_shared::db::pool::health_check(&state.db).await?;

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
