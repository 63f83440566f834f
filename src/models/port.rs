use serde::{Deserialize, Serialize};

use crate::portname;

/// Состояние порта коммутатора, одна запись на (устройство, ifIndex)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    pub device_id: i64,
    pub port_index: u32,
    /// ifDescr как его отдал коммутатор
    pub port_name: String,
    pub port_type: String,
    pub status: String,
    pub status_changes: u32,
}

impl PortRecord {
    /// Короткое имя для отображения
    pub fn display_name(&self) -> String {
        portname::normalize(&self.port_name)
    }
}

/// Запись таблицы форвардинга в том виде, как она хранится
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MacEntry {
    pub device_id: i64,
    pub port_index: u32,
    pub vlan: u16,
    pub mac: String,
}

/// Декодированная строка MAC-таблицы, ещё не привязанная к устройству
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacObservation {
    pub port_index: u32,
    pub vlan: u16,
    pub mac: String,
}

impl MacObservation {
    pub fn into_entry(self, device_id: i64) -> MacEntry {
        MacEntry {
            device_id,
            port_index: self.port_index,
            vlan: self.vlan,
            mac: self.mac,
        }
    }
}

/// Результат поиска MAC вместе с данными коммутатора
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacSearchHit {
    pub mac: String,
    pub switch: String,
    pub ip: String,
    pub port_index: u32,
    pub vlan: u16,
}
