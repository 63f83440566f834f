use anyhow::Result;

use super::types::MacTable;
use crate::models::System;
use crate::snmp::codec::decode_mac_row;
use crate::snmp::{BulkWalker, Varbind};

/// Модуль для сбора таблицы форвардинга
pub struct MacCollector;

impl MacCollector {
    /// Сырые строки таблицы; корень выбирается по типу системы
    pub async fn walk(session: &mut dyn BulkWalker, system: System) -> Result<Vec<Varbind>> {
        session.bulk_walk(system.mac_table_root()).await
    }

    /// Строки, которые не удалось разобрать, пропускаются и считаются
    pub fn decode(rows: &[Varbind], system: System) -> MacTable {
        let mut table = MacTable::default();

        for row in rows {
            match decode_mac_row(row, system) {
                Ok(entry) => table.entries.push(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "строка MAC-таблицы пропущена");
                    table.skipped += 1;
                }
            }
        }

        table
    }
}
