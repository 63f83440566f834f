use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{
    AppState, create_switch, delete_switch, handle_probe, health, list_switches,
    list_switches_admin, search_mac,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/switches", get(list_switches))
        .route("/mac", get(search_mac))
        .route("/probe", post(handle_probe))
        .route(
            "/admin/switches",
            get(list_switches_admin).post(create_switch),
        )
        .route("/admin/switches/{id}", delete(delete_switch))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
