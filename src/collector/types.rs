use std::collections::BTreeMap;

use crate::models::MacObservation;

/// Результат обхода ifTable: три карты по ifIndex
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceTable {
    /// ifDescr
    pub descriptions: BTreeMap<u32, String>,
    /// ifType, уже переведённый в метку
    pub types: BTreeMap<u32, String>,
    /// ifOperStatus, уже переведённый в метку
    pub statuses: BTreeMap<u32, String>,
    /// Пропущенные строки (битый индекс или значение)
    pub skipped: usize,
}

/// Декодированная таблица форвардинга
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacTable {
    pub entries: Vec<MacObservation>,
    pub skipped: usize,
}

/// Всё, что собрано с устройства за один опрос
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSnapshot {
    pub interfaces: InterfaceTable,
    pub macs: MacTable,
}
