use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::{ApiError, AppState, blocking};
use crate::models::{Device, NewDevice};

pub async fn list_switches_admin(State(state): State<AppState>) -> Result<Json<Vec<Device>>, ApiError> {
    let store = state.store.clone();
    Ok(Json(blocking(move || store.list_devices()).await?))
}

pub async fn create_switch(
    State(state): State<AppState>,
    Json(device): Json<NewDevice>,
) -> Result<(StatusCode, Json<Device>), ApiError> {
    if device.name.trim().is_empty() || device.address.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "name и address обязательны".to_string(),
        ));
    }

    let store = state.store.clone();
    let created = blocking(move || store.create_device(&device)).await?;
    tracing::info!(switch = %created.name, id = created.id, "коммутатор добавлен");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Удаление вместе с портами и MAC
pub async fn delete_switch(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.clone();
    if blocking(move || store.delete_device(id)).await? {
        tracing::info!(id, "коммутатор удалён");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, format!("коммутатор {} не найден", id)))
    }
}
