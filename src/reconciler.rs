//! Слияние свежего снимка устройства с тем, что уже лежит в базе.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::collector::DeviceSnapshot;
use crate::models::PortRecord;
use crate::portname;
use crate::store::{ChangeSet, Result, Store};

/// Статус порта, если ifOperStatus для индекса не пришёл
const MISSING: &str = "UNKNOWN";

/// Итог одного применения
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub ports_created: usize,
    pub ports_updated: usize,
    pub status_changes: usize,
    pub macs_inserted: usize,
}

impl ReconcileReport {
    /// Были ли вообще записи в базу
    pub fn wrote_anything(&self) -> bool {
        self.ports_created + self.ports_updated + self.macs_inserted > 0
    }
}

pub struct Reconciler {
    store: Arc<dyn Store>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Считает минимальный набор изменений для устройства.
    ///
    /// Порты, которых нет в снимке, не трогаются.
    pub fn plan(&self, device_id: i64, snapshot: &DeviceSnapshot) -> Result<(ChangeSet, ReconcileReport)> {
        let interfaces = &snapshot.interfaces;
        let mut changes = ChangeSet::default();
        let mut report = ReconcileReport::default();

        for (&index, name) in &interfaces.descriptions {
            let status = interfaces
                .statuses
                .get(&index)
                .map(String::as_str)
                .unwrap_or(MISSING);
            let port_type = interfaces
                .types
                .get(&index)
                .map(String::as_str)
                .unwrap_or(MISSING);

            match self.store.get_port(device_id, index)? {
                None => {
                    tracing::debug!(
                        device_id,
                        port = %name,
                        rule = portname::matching_rule(name).unwrap_or("-"),
                        "новый порт"
                    );
                    changes.ports.push(PortRecord {
                        device_id,
                        port_index: index,
                        port_name: name.clone(),
                        port_type: port_type.to_string(),
                        status: status.to_string(),
                        status_changes: 0,
                    });
                    report.ports_created += 1;
                }
                Some(mut port) => {
                    let mut updated = false;
                    if port.status != status {
                        port.status = status.to_string();
                        port.status_changes += 1;
                        report.status_changes += 1;
                        updated = true;
                    }
                    if port.port_name != *name {
                        port.port_name = name.clone();
                        updated = true;
                    }
                    if port.port_type != port_type {
                        port.port_type = port_type.to_string();
                        updated = true;
                    }
                    if updated {
                        changes.ports.push(port);
                        report.ports_updated += 1;
                    }
                }
            }
        }

        let unique: BTreeSet<_> = snapshot.macs.entries.iter().cloned().collect();
        changes.macs = unique
            .into_iter()
            .map(|entry| entry.into_entry(device_id))
            .collect();

        Ok((changes, report))
    }

    /// План и применение одной транзакцией
    pub fn reconcile(&self, device_id: i64, snapshot: &DeviceSnapshot) -> Result<ReconcileReport> {
        let (changes, mut report) = self.plan(device_id, snapshot)?;
        if changes.is_empty() {
            return Ok(report);
        }

        let applied = self.store.apply(&changes)?;
        tracing::debug!(
            device_id,
            ports = applied.ports_written,
            macs = applied.macs_inserted,
            "изменения записаны"
        );
        report.macs_inserted = applied.macs_inserted;
        Ok(report)
    }
}
