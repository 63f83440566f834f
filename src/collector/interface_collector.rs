use anyhow::Result;
use std::collections::BTreeMap;

use super::types::InterfaceTable;
use crate::config::OidTables;
use crate::error::DecodeError;
use crate::snmp::codec::parse_index;
use crate::snmp::oid::{IF_DESCR, IF_OPER_STATUS, IF_TYPE};
use crate::snmp::{BulkWalker, SnmpValue};

/// Модуль для обхода ifTable
pub struct InterfaceCollector;

impl InterfaceCollector {
    /// Обходит ifDescr, ifType и ifOperStatus
    pub async fn collect(session: &mut dyn BulkWalker, tables: &OidTables) -> Result<InterfaceTable> {
        let mut table = InterfaceTable::default();

        table.descriptions = Self::walk_column(session, IF_DESCR, &mut table.skipped, |_, value| {
            Ok(value.as_text())
        })
        .await?;

        table.types = Self::walk_column(session, IF_TYPE, &mut table.skipped, |oid, value| {
            integer(oid, value).map(|code| tables.interface_type(code))
        })
        .await?;

        table.statuses =
            Self::walk_column(session, IF_OPER_STATUS, &mut table.skipped, |oid, value| {
                integer(oid, value).map(|code| tables.oper_state(code))
            })
            .await?;

        Ok(table)
    }

    /// Один столбец ifTable в карту ifIndex -> значение.
    ///
    /// Строки с битым индексом или значением пропускаются, walk продолжается.
    async fn walk_column<F>(
        session: &mut dyn BulkWalker,
        root: &str,
        skipped: &mut usize,
        decode: F,
    ) -> Result<BTreeMap<u32, String>>
    where
        F: Fn(&str, &SnmpValue) -> Result<String, DecodeError>,
    {
        let rows = session.bulk_walk(root).await?;
        let mut column = BTreeMap::new();

        for row in rows {
            let decoded = parse_index(&row.oid, root)
                .and_then(|index| decode(&row.oid, &row.value).map(|value| (index, value)));

            match decoded {
                Ok((index, value)) => {
                    column.insert(index, value);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "строка пропущена");
                    *skipped += 1;
                }
            }
        }

        Ok(column)
    }
}

fn integer(oid: &str, value: &SnmpValue) -> Result<i64, DecodeError> {
    value.as_i64().ok_or_else(|| DecodeError::NotInteger {
        oid: oid.to_string(),
        value: value.to_string(),
    })
}
