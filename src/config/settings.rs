use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::snmp::SessionOptions;

/// Базовые настройки приложения
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Настройки веб-сервера
    pub web: WebSettings,
    /// Настройки опроса
    pub poll: PollSettings,
    /// Настройки подключения
    pub connection: ConnectionSettings,
    /// Путь к SQLite базе
    pub db_path: PathBuf,
    /// Файл с таблицами ifOperStatus/ifType (необязательный)
    pub oid_tables_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    /// Пауза между циклами опроса (секунды)
    pub interval: u64,
    /// Сколько устройств опрашивать одновременно
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Таймаут для SNMP операций (секунды)
    pub timeout: u64,
    /// Количество повторов при ошибках
    pub retries: u32,
    /// max-repetitions для GETBULK
    pub max_repetitions: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            web: WebSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            poll: PollSettings {
                interval: 600,
                workers: 1,
            },
            connection: ConnectionSettings {
                timeout: 5,
                retries: 2,
                max_repetitions: 50,
            },
            db_path: PathBuf::from("macwatch.db"),
            oid_tables_path: None,
        }
    }
}

impl Settings {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.web.host, self.web.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            timeout: Duration::from_secs(self.connection.timeout),
            retries: self.connection.retries,
            max_repetitions: self.connection.max_repetitions,
        }
    }
}
