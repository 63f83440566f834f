use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

pub mod codec;
pub mod oid;
pub mod v2c;
pub mod walk;

#[cfg(test)]
pub mod testing;

/// Значение varbind без привязки к буферу ответа
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnmpValue {
    Integer(i64),
    Unsigned(u64),
    Text(String),
    Other(String),
}

impl SnmpValue {
    /// Целое значение, если varbind числовой
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SnmpValue::Integer(i) => Some(*i),
            SnmpValue::Unsigned(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Строковое представление (для ifDescr и подобных)
    pub fn as_text(&self) -> String {
        match self {
            SnmpValue::Text(s) | SnmpValue::Other(s) => s.trim().to_string(),
            SnmpValue::Integer(i) => i.to_string(),
            SnmpValue::Unsigned(u) => u.to_string(),
        }
    }
}

impl fmt::Display for SnmpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnmpValue::Integer(i) => write!(f, "INTEGER: {}", i),
            SnmpValue::Unsigned(u) => write!(f, "UNSIGNED: {}", u),
            SnmpValue::Text(s) => write!(f, "STRING: {}", s),
            SnmpValue::Other(s) => f.write_str(s),
        }
    }
}

/// Одна пара (OID, значение) из ответа
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Varbind {
    pub oid: String,
    pub value: SnmpValue,
}

impl Varbind {
    pub fn new(oid: impl Into<String>, value: SnmpValue) -> Self {
        Self {
            oid: oid.into(),
            value,
        }
    }
}

/// Параметры SNMP сессии
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Таймаут одного GETBULK запроса
    pub timeout: Duration,
    /// Сколько раз повторять запрос после таймаута или ошибки
    pub retries: u32,
    pub max_repetitions: u32,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            retries: 2,
            max_repetitions: 50,
        }
    }
}

/// Открытая сессия, умеющая обходить поддерево
#[async_trait]
pub trait BulkWalker: Send {
    /// Все varbind'ы под `root`, в порядке ответа агента
    async fn bulk_walk(&mut self, root: &str) -> Result<Vec<Varbind>>;
}

/// Фабрика сессий: одна сессия на устройство на цикл опроса
#[async_trait]
pub trait SnmpConnector: Send + Sync {
    async fn connect(&self, target: &str, community: &str) -> Result<Box<dyn BulkWalker>>;
}
