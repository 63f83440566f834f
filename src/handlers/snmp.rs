use axum::{Json, extract::State, http::StatusCode};
use tokio::time::{Duration, timeout};

use super::{ApiError, AppState};
use crate::formatter::JsonFormatter;
use crate::formatter::json::ProbeJson;
use crate::models::ProbeRequest;
use crate::models::device::snmp_target;

const PROBE_TIMEOUT_SECS: u64 = 60;
const MAX_PROBE_PORTS: u32 = 1024;

/// Разовый опрос произвольного коммутатора, в базу ничего не пишется
pub async fn handle_probe(
    State(state): State<AppState>,
    Json(params): Json<ProbeRequest>,
) -> Result<Json<ProbeJson>, ApiError> {
    if params.port_count == 0 || params.port_count > MAX_PROBE_PORTS {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("port_count должен быть от 1 до {}", MAX_PROBE_PORTS),
        ));
    }

    let target = snmp_target(&params.ip);
    let work = state
        .collector
        .collect(&target, &params.community, params.system);

    let snapshot = match timeout(Duration::from_secs(PROBE_TIMEOUT_SECS), work).await {
        Ok(Ok(snapshot)) => snapshot,
        Ok(Err(e)) => return Err((StatusCode::BAD_GATEWAY, e.to_string())),
        Err(_) => {
            return Err((
                StatusCode::GATEWAY_TIMEOUT,
                "SNMP request timeout".to_string(),
            ));
        }
    };

    Ok(Json(JsonFormatter::format_probe(
        &params.ip,
        params.system,
        params.port_count,
        &snapshot,
    )))
}
