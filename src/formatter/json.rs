use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::collector::DeviceSnapshot;
use crate::models::{Device, MacEntry, PortRecord, System};
use crate::portname;

/// Коммутатор со всеми портами для главной страницы
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchJson {
    pub id: i64,
    pub name: String,
    pub ip: String,
    pub system: System,
    pub site: String,
    pub summary: SwitchSummary,
    pub ports: Vec<PortJson>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchSummary {
    pub total_ports: usize,
    pub ports_up: usize,
    pub total_macs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortJson {
    pub index: u32,
    pub name: String,
    pub display_name: String,
    pub port_type: String,
    pub status: String,
    pub status_changes: u32,
    pub macs: Vec<MacJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacJson {
    pub mac: String,
    pub vlan: u16,
}

/// Ответ разового опроса
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeJson {
    pub ip: String,
    pub system: System,
    pub timestamp: String,
    pub ports: Vec<ProbePortJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbePortJson {
    pub index: u32,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub status: Option<String>,
    pub macs: Vec<MacJson>,
}

/// JSON форматтер для ответов API
pub struct JsonFormatter;

impl JsonFormatter {
    /// Собирает коммутатор с портами; MAC раскладываются по ifIndex
    pub fn format_switch(device: &Device, ports: &[PortRecord], macs: &[MacEntry]) -> SwitchJson {
        let mut by_port: BTreeMap<u32, Vec<MacJson>> = BTreeMap::new();
        for entry in macs {
            by_port.entry(entry.port_index).or_default().push(MacJson {
                mac: entry.mac.clone(),
                vlan: entry.vlan,
            });
        }

        let ports: Vec<PortJson> = ports
            .iter()
            .map(|port| PortJson {
                index: port.port_index,
                name: port.port_name.clone(),
                display_name: port.display_name(),
                port_type: port.port_type.clone(),
                status: port.status.clone(),
                status_changes: port.status_changes,
                macs: by_port.remove(&port.port_index).unwrap_or_default(),
            })
            .collect();

        let summary = SwitchSummary {
            total_ports: ports.len(),
            ports_up: ports.iter().filter(|p| p.status == "UP").count(),
            total_macs: macs.len(),
        };

        SwitchJson {
            id: device.id,
            name: device.name.clone(),
            ip: device.address.clone(),
            system: device.system,
            site: device.site.clone(),
            summary,
            ports,
        }
    }

    /// Порты 1..=port_count из снимка; MAC вне диапазона отбрасываются
    pub fn format_probe(
        ip: &str,
        system: System,
        port_count: u32,
        snapshot: &DeviceSnapshot,
    ) -> ProbeJson {
        let interfaces = &snapshot.interfaces;
        let mut ports: Vec<ProbePortJson> = (1..=port_count)
            .map(|index| {
                let name = interfaces.descriptions.get(&index).cloned();
                ProbePortJson {
                    index,
                    display_name: name.as_deref().map(portname::normalize),
                    name,
                    status: interfaces.statuses.get(&index).cloned(),
                    macs: Vec::new(),
                }
            })
            .collect();

        for entry in &snapshot.macs.entries {
            if entry.port_index >= 1 && entry.port_index <= port_count {
                ports[(entry.port_index - 1) as usize].macs.push(MacJson {
                    mac: entry.mac.clone(),
                    vlan: entry.vlan,
                });
            }
        }

        ProbeJson {
            ip: ip.to_string(),
            system,
            timestamp: chrono::Utc::now().to_rfc3339(),
            ports,
        }
    }
}
