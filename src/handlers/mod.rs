use axum::http::StatusCode;
use std::sync::Arc;

use crate::collector::SnmpCollector;
use crate::store::{Store, StoreError};

pub mod admin;
pub mod health;
pub mod mac;
pub mod snmp;
pub mod switches;

pub use admin::{create_switch, delete_switch, list_switches_admin};
pub use health::health;
pub use mac::search_mac;
pub use snmp::handle_probe;
pub use switches::list_switches;

/// Общее состояние для обработчиков
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub collector: SnmpCollector,
}

pub type ApiError = (StatusCode, String);

/// Запрос к SQLite вне async потока
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
