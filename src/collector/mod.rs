use std::sync::Arc;

pub mod interface_collector;
pub mod mac_collector;
pub mod types;

pub use types::{DeviceSnapshot, InterfaceTable, MacTable};

use crate::config::OidTables;
use crate::error::PollError;
use crate::models::{Device, System};
use crate::snmp::SnmpConnector;

use interface_collector::InterfaceCollector;
use mac_collector::MacCollector;

/// Коллектор для сбора SNMP данных с одного устройства
#[derive(Clone)]
pub struct SnmpCollector {
    connector: Arc<dyn SnmpConnector>,
    tables: Arc<OidTables>,
}

impl SnmpCollector {
    pub fn new(connector: Arc<dyn SnmpConnector>, tables: Arc<OidTables>) -> Self {
        Self { connector, tables }
    }

    /// Опрашивает сохранённое устройство
    pub async fn collect_device(&self, device: &Device) -> Result<DeviceSnapshot, PollError> {
        self.collect(&device.snmp_target(), &device.community, device.system)
            .await
    }

    /// Открывает сессию и делает оба обхода.
    ///
    /// Если любой walk упал, снимок не возвращается вовсе: частичные данные
    /// не должны попасть в базу.
    pub async fn collect(
        &self,
        target: &str,
        community: &str,
        system: System,
    ) -> Result<DeviceSnapshot, PollError> {
        let mut session = self
            .connector
            .connect(target, community)
            .await
            .map_err(|e| PollError::transport(target, e))?;

        let interfaces = InterfaceCollector::collect(session.as_mut(), &self.tables)
            .await
            .map_err(|e| PollError::transport(target, e))?;

        let rows = MacCollector::walk(session.as_mut(), system)
            .await
            .map_err(|e| PollError::transport(target, e))?;
        let macs = MacCollector::decode(&rows, system);

        if interfaces.skipped > 0 || macs.skipped > 0 {
            tracing::warn!(
                device = %target,
                interface_rows = interfaces.skipped,
                mac_rows = macs.skipped,
                "часть строк пропущена при декодировании"
            );
        }

        Ok(DeviceSnapshot { interfaces, macs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snmp::SnmpValue;
    use crate::snmp::oid::{IF_DESCR, IF_OPER_STATUS, IF_TYPE, MAC_TABLE_BRIDGE};
    use crate::snmp::testing::{FakeAgent, FakeConnector};

    fn collector(connector: Arc<FakeConnector>) -> SnmpCollector {
        SnmpCollector::new(connector, Arc::new(OidTables::default()))
    }

    #[tokio::test]
    async fn test_collect_end_to_end() {
        let connector = Arc::new(FakeConnector::new());
        connector.set_agent(
            "10.0.0.1:161",
            FakeAgent::new()
                .row(IF_DESCR, "3", SnmpValue::Text("GigabitEthernet0/9".to_string()))
                .row(IF_TYPE, "3", SnmpValue::Integer(6))
                .row(IF_OPER_STATUS, "3", SnmpValue::Integer(1))
                .row(MAC_TABLE_BRIDGE, "0.1.2.3.4.5", SnmpValue::Integer(7)),
        );

        let snapshot = collector(connector)
            .collect("10.0.0.1:161", "public", System::Generic)
            .await
            .unwrap();

        assert_eq!(
            snapshot.interfaces.descriptions.get(&3).map(String::as_str),
            Some("GigabitEthernet0/9")
        );
        assert_eq!(
            snapshot.interfaces.statuses.get(&3).map(String::as_str),
            Some("UP")
        );
        assert_eq!(
            snapshot.interfaces.types.get(&3).map(String::as_str),
            Some("ethernetCsmacd")
        );
        assert_eq!(snapshot.macs.entries.len(), 1);
        assert_eq!(snapshot.macs.entries[0].port_index, 7);
        assert_eq!(snapshot.macs.entries[0].vlan, 0);
        assert_eq!(snapshot.macs.entries[0].mac, "00:01:02:03:04:05");
    }

    #[tokio::test]
    async fn test_collect_connect_failure() {
        let connector = Arc::new(FakeConnector::new());
        let err = collector(connector)
            .collect("10.0.0.9:161", "public", System::Generic)
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_collect_mac_walk_failure_returns_nothing() {
        let connector = Arc::new(FakeConnector::new());
        connector.set_agent(
            "10.0.0.1:161",
            FakeAgent::new()
                .row(IF_DESCR, "1", SnmpValue::Text("Port 1".to_string()))
                .fail(MAC_TABLE_BRIDGE),
        );

        let result = collector(connector)
            .collect("10.0.0.1:161", "public", System::Generic)
            .await;
        assert!(matches!(result, Err(PollError::Transport { .. })));
    }
}
