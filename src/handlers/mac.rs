use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use super::{ApiError, AppState, blocking};
use crate::models::MacSearchHit;

#[derive(Debug, Deserialize)]
pub struct MacQuery {
    #[serde(default)]
    pub q: String,
}

/// Поиск по подстроке MAC, без учёта регистра
pub async fn search_mac(
    State(state): State<AppState>,
    Query(query): Query<MacQuery>,
) -> Result<Json<Vec<MacSearchHit>>, ApiError> {
    let q = query.q.trim().to_string();
    if q.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "пустой запрос".to_string()));
    }

    let store = state.store.clone();
    let hits = blocking(move || store.search_macs(&q)).await?;
    Ok(Json(hits))
}
