use axum::{Json, extract::State};

use super::{ApiError, AppState, blocking};
use crate::formatter::json::SwitchJson;
use crate::formatter::JsonFormatter;

/// Все коммутаторы с портами и найденными на них MAC
pub async fn list_switches(State(state): State<AppState>) -> Result<Json<Vec<SwitchJson>>, ApiError> {
    let store = state.store.clone();
    let switches = blocking(move || {
        let mut switches = Vec::new();
        for device in store.list_devices()? {
            let ports = store.list_ports(device.id)?;
            let macs = store.list_macs(device.id)?;
            switches.push(JsonFormatter::format_switch(&device, &ports, &macs));
        }
        Ok(switches)
    })
    .await?;

    Ok(Json(switches))
}
