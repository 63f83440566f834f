use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{Applied, ChangeSet, Result, Store, StoreError};
use crate::models::{Device, MacEntry, MacSearchHit, NewDevice, PortRecord, System};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS switches (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    ip_address  TEXT NOT NULL,
    community   TEXT NOT NULL,
    system      TEXT NOT NULL DEFAULT 'generic',
    site        TEXT NOT NULL DEFAULT 'default',
    port_count  INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS port_statuses (
    id              INTEGER PRIMARY KEY,
    switch_id       INTEGER NOT NULL REFERENCES switches(id) ON DELETE CASCADE,
    port_index      INTEGER NOT NULL,
    port_name       TEXT NOT NULL,
    port_type       TEXT NOT NULL,
    status          TEXT NOT NULL,
    status_changes  INTEGER NOT NULL DEFAULT 0,
    UNIQUE (switch_id, port_index)
);

CREATE TABLE IF NOT EXISTS mac_entries (
    id          INTEGER PRIMARY KEY,
    switch_id   INTEGER NOT NULL REFERENCES switches(id) ON DELETE CASCADE,
    port_index  INTEGER NOT NULL,
    vlan        INTEGER NOT NULL,
    mac         TEXT NOT NULL,
    UNIQUE (switch_id, port_index, vlan, mac)
);

CREATE INDEX IF NOT EXISTS idx_mac_entries_mac ON mac_entries (mac);
";

/// Store поверх rusqlite (bundled SQLite)
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Открывает или создаёт базу по пути и создаёт схему
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| StoreError::Connection(e.to_string()))?;

        // WAL: читатели видят строку до или после транзакции поллера
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Self::init(conn)
    }

    /// База в памяти (для тестов)
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Connection(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Execution(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}

fn upsert_port_on(conn: &Connection, port: &PortRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO port_statuses
             (switch_id, port_index, port_name, port_type, status, status_changes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (switch_id, port_index) DO UPDATE SET
             port_name = excluded.port_name,
             port_type = excluded.port_type,
             status = excluded.status,
             status_changes = excluded.status_changes",
        params![
            port.device_id,
            port.port_index,
            port.port_name,
            port.port_type,
            port.status,
            port.status_changes,
        ],
    )
    .map_err(|e| StoreError::Execution(e.to_string()))?;
    Ok(())
}

fn insert_mac_on(conn: &Connection, entry: &MacEntry) -> Result<bool> {
    let affected = conn
        .execute(
            "INSERT OR IGNORE INTO mac_entries (switch_id, port_index, vlan, mac)
             VALUES (?1, ?2, ?3, ?4)",
            params![entry.device_id, entry.port_index, entry.vlan, entry.mac],
        )
        .map_err(|e| StoreError::Execution(e.to_string()))?;
    Ok(affected > 0)
}

fn device_from_row(row: &Row<'_>) -> rusqlite::Result<Device> {
    let system: String = row.get(4)?;
    Ok(Device {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        community: row.get(3)?,
        system: system.parse::<System>().unwrap_or_default(),
        site: row.get(5)?,
        port_count: row.get(6)?,
    })
}

fn port_from_row(row: &Row<'_>) -> rusqlite::Result<PortRecord> {
    Ok(PortRecord {
        device_id: row.get(0)?,
        port_index: row.get(1)?,
        port_name: row.get(2)?,
        port_type: row.get(3)?,
        status: row.get(4)?,
        status_changes: row.get(5)?,
    })
}

fn mac_from_row(row: &Row<'_>) -> rusqlite::Result<MacEntry> {
    Ok(MacEntry {
        device_id: row.get(0)?,
        port_index: row.get(1)?,
        vlan: row.get(2)?,
        mac: row.get(3)?,
    })
}

/// Экранирует спецсимволы LIKE
fn like_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl Store for SqliteStore {
    fn list_devices(&self) -> Result<Vec<Device>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, ip_address, community, system, site, port_count
                 FROM switches ORDER BY id",
            )
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = stmt
            .query_map([], device_from_row)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    fn create_device(&self, device: &NewDevice) -> Result<Device> {
        let conn = self.lock()?;
        let site = device.site_or_default();
        conn.execute(
            "INSERT INTO switches (name, ip_address, community, system, site, port_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                device.name,
                device.address,
                device.community,
                device.system.as_str(),
                site,
                device.port_count,
            ],
        )
        .map_err(|e| StoreError::Execution(e.to_string()))?;

        Ok(Device {
            id: conn.last_insert_rowid(),
            name: device.name.clone(),
            address: device.address.clone(),
            community: device.community.clone(),
            system: device.system,
            site: site.to_string(),
            port_count: device.port_count,
        })
    }

    fn delete_device(&self, id: i64) -> Result<bool> {
        let conn = self.lock()?;
        let affected = conn
            .execute("DELETE FROM switches WHERE id = ?1", params![id])
            .map_err(|e| StoreError::Execution(e.to_string()))?;
        Ok(affected > 0)
    }

    fn get_port(&self, device_id: i64, port_index: u32) -> Result<Option<PortRecord>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT switch_id, port_index, port_name, port_type, status, status_changes
             FROM port_statuses WHERE switch_id = ?1 AND port_index = ?2",
            params![device_id, port_index],
            port_from_row,
        )
        .optional()
        .map_err(|e| StoreError::Query(e.to_string()))
    }

    fn upsert_port(&self, port: &PortRecord) -> Result<()> {
        let conn = self.lock()?;
        upsert_port_on(&conn, port)
    }

    fn insert_mac_if_absent(&self, entry: &MacEntry) -> Result<bool> {
        let conn = self.lock()?;
        insert_mac_on(&conn, entry)
    }

    fn apply(&self, changes: &ChangeSet) -> Result<Applied> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| StoreError::Execution(e.to_string()))?;

        let mut applied = Applied::default();
        for port in &changes.ports {
            upsert_port_on(&tx, port)?;
            applied.ports_written += 1;
        }
        for entry in &changes.macs {
            if insert_mac_on(&tx, entry)? {
                applied.macs_inserted += 1;
            }
        }

        tx.commit()
            .map_err(|e| StoreError::Execution(e.to_string()))?;
        Ok(applied)
    }

    fn list_ports(&self, device_id: i64) -> Result<Vec<PortRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT switch_id, port_index, port_name, port_type, status, status_changes
                 FROM port_statuses WHERE switch_id = ?1 ORDER BY port_index",
            )
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = stmt
            .query_map(params![device_id], port_from_row)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    fn list_macs(&self, device_id: i64) -> Result<Vec<MacEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT switch_id, port_index, vlan, mac
                 FROM mac_entries WHERE switch_id = ?1 ORDER BY port_index, vlan, mac",
            )
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = stmt
            .query_map(params![device_id], mac_from_row)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    fn search_macs(&self, query: &str) -> Result<Vec<MacSearchHit>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT m.mac, s.name, s.ip_address, m.port_index, m.vlan
                 FROM mac_entries m
                 JOIN switches s ON s.id = m.switch_id
                 WHERE m.mac LIKE ?1 ESCAPE '\\'
                 ORDER BY s.name, m.port_index, m.mac",
            )
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let rows = stmt
            .query_map(params![like_pattern(query)], |row| {
                Ok(MacSearchHit {
                    mac: row.get(0)?,
                    switch: row.get(1)?,
                    ip: row.get(2)?,
                    port_index: row.get(3)?,
                    vlan: row.get(4)?,
                })
            })
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}
