//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use super::AppState;

/// Always 200 while the process is serving. Reports uptime and how many
/// hooks the pipeline was started with.
pub async fn healthcheck_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "hooks": state.api.hooks().len(),
    }))
}
