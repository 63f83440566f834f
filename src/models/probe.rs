use serde::Deserialize;

use super::System;

/// Разовый опрос коммутатора без сохранения результата
#[derive(Debug, Deserialize)]
pub struct ProbeRequest {
    pub ip: String,
    pub community: String,
    #[serde(default)]
    pub system: System,
    pub port_count: u32,
}
