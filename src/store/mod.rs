//! Граница хранилища: всё, что поллер и веб-часть делают с базой.

use thiserror::Error;

use crate::models::{Device, MacEntry, MacSearchHit, NewDevice, PortRecord};

pub mod sqlite;

pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("connection error: {0}")]
    Connection(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Изменения для одного устройства за один цикл опроса
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Новые и изменившиеся порты, целиком
    pub ports: Vec<PortRecord>,
    /// Кандидаты на вставку; уже существующие пропускаются
    pub macs: Vec<MacEntry>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty() && self.macs.is_empty()
    }
}

/// Что реально записано при применении [`ChangeSet`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub ports_written: usize,
    pub macs_inserted: usize,
}

pub trait Store: Send + Sync {
    fn list_devices(&self) -> Result<Vec<Device>>;

    fn create_device(&self, device: &NewDevice) -> Result<Device>;

    /// Удаляет устройство вместе с его портами и MAC; false если не было
    fn delete_device(&self, id: i64) -> Result<bool>;

    fn get_port(&self, device_id: i64, port_index: u32) -> Result<Option<PortRecord>>;

    /// Вставка или замена записи по (устройство, ifIndex)
    fn upsert_port(&self, port: &PortRecord) -> Result<()>;

    /// Проверка и вставка одной операцией; true если строка добавлена
    fn insert_mac_if_absent(&self, entry: &MacEntry) -> Result<bool>;

    /// Применяет все изменения в одной транзакции: либо всё, либо ничего
    fn apply(&self, changes: &ChangeSet) -> Result<Applied>;

    fn list_ports(&self, device_id: i64) -> Result<Vec<PortRecord>>;

    fn list_macs(&self, device_id: i64) -> Result<Vec<MacEntry>>;

    /// Подстрочный поиск по сохранённым MAC
    fn search_macs(&self, query: &str) -> Result<Vec<MacSearchHit>>;
}
