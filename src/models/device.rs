use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::snmp::oid::{MAC_TABLE_BRIDGE, MAC_TABLE_QBRIDGE};

/// Семейство OID таблицы MAC-адресов, выбирается по типу коммутатора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum System {
    /// Стандартный BRIDGE-MIB (dot1dTpFdbPort), VLAN не кодируется
    #[default]
    Generic,
    /// Q-BRIDGE-MIB с VLAN в OID (dot1qTpFdbPort), так отдают UniFi
    Unifi,
}

impl System {
    /// Корневой OID таблицы форвардинга для этого семейства
    pub fn mac_table_root(self) -> &'static str {
        match self {
            System::Generic => MAC_TABLE_BRIDGE,
            System::Unifi => MAC_TABLE_QBRIDGE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            System::Generic => "generic",
            System::Unifi => "unifi",
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for System {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "" => Ok(System::Generic),
            "unifi" => Ok(System::Unifi),
            other => Err(format!("неизвестный тип системы: {}", other)),
        }
    }
}

impl TryFrom<String> for System {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Коммутатор, который опрашивает поллер
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub name: String,
    /// Хост или host:port, порт по умолчанию 161
    pub address: String,
    pub community: String,
    pub system: System,
    pub site: String,
    pub port_count: u32,
}

impl Device {
    /// Адрес для UDP сессии, добавляет :161 если порт не указан
    pub fn snmp_target(&self) -> String {
        snmp_target(&self.address)
    }
}

pub(crate) fn snmp_target(address: &str) -> String {
    let address = address.trim();
    if address.parse::<std::net::SocketAddr>().is_ok() {
        return address.to_string();
    }
    if let Ok(ip) = address.parse::<std::net::IpAddr>() {
        return std::net::SocketAddr::new(ip, 161).to_string();
    }
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:161", address)
    }
}

/// Данные для создания коммутатора через админку
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDevice {
    pub name: String,
    pub address: String,
    pub community: String,
    #[serde(default)]
    pub system: System,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub port_count: u32,
}

impl NewDevice {
    /// Пустой site заменяется на "default"
    pub fn site_or_default(&self) -> &str {
        let site = self.site.trim();
        if site.is_empty() { "default" } else { site }
    }
}
