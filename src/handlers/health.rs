use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use super::{AppState, blocking};

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store = state.store.clone();
    match blocking(move || store.list_devices()).await {
        Ok(devices) => (
            StatusCode::OK,
            Json(json!({
                "status": "im ready",
                "switches": devices.len(),
                "UTC_time": chrono::Utc::now().to_rfc2822(),
            })),
        ),
        Err((_, error)) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "storage unavailable",
                "error": error,
                "UTC_time": chrono::Utc::now().to_rfc2822(),
            })),
        ),
    }
}
