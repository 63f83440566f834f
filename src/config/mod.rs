use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

pub mod oid_tables;
pub mod settings;

pub use oid_tables::OidTables;
pub use settings::Settings;

/// Главная конфигурация приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Базовые настройки
    pub settings: Settings,
    /// Справочники кодов, общие для всех опросов
    pub oid_tables: Arc<OidTables>,
}

impl AppConfig {
    /// Собирает настройки из переменных окружения и загружает таблицы OID
    pub fn load() -> Result<Self> {
        let settings = Self::settings_from_env(|key| env::var(key).ok())?;
        let oid_tables = match &settings.oid_tables_path {
            Some(path) => OidTables::load(path)?,
            None => OidTables::default(),
        };

        Ok(Self {
            settings,
            oid_tables: Arc::new(oid_tables),
        })
    }

    /// Переменные окружения поверх значений по умолчанию
    pub fn settings_from_env(get: impl Fn(&str) -> Option<String>) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(host) = get("WEB_HOST") {
            settings.web.host = host;
        }
        override_parsed(&get, "WEB_PORT", &mut settings.web.port)?;
        override_parsed(&get, "POLL_INTERVAL", &mut settings.poll.interval)?;
        override_parsed(&get, "POLL_WORKERS", &mut settings.poll.workers)?;
        override_parsed(&get, "SNMP_TIMEOUT", &mut settings.connection.timeout)?;
        override_parsed(&get, "SNMP_RETRIES", &mut settings.connection.retries)?;
        override_parsed(
            &get,
            "SNMP_MAX_REPETITIONS",
            &mut settings.connection.max_repetitions,
        )?;
        if let Some(path) = get("DB_PATH") {
            settings.db_path = PathBuf::from(path);
        }
        settings.oid_tables_path = get("MACWATCH_OID_TABLES").map(PathBuf::from);

        if settings.poll.workers == 0 {
            anyhow::bail!("POLL_WORKERS должен быть больше нуля");
        }
        if settings.poll.interval == 0 {
            anyhow::bail!("POLL_INTERVAL должен быть больше нуля");
        }
        if settings.connection.timeout == 0 {
            anyhow::bail!("SNMP_TIMEOUT должен быть больше нуля");
        }

        Ok(settings)
    }

    pub fn debug_config(&self) {
        tracing::info!(
            listen = %self.settings.listen_addr(),
            db = %self.settings.db_path.display(),
            interval_secs = self.settings.poll.interval,
            workers = self.settings.poll.workers,
            snmp_timeout_secs = self.settings.connection.timeout,
            snmp_retries = self.settings.connection.retries,
            "конфигурация загружена"
        );
    }
}

fn override_parsed<T>(get: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = get(key) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("Невалидное значение {}={}", key, raw))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = AppConfig::settings_from_env(env_of(&[])).unwrap();
        assert_eq!(settings.listen_addr(), "0.0.0.0:8080");
        assert_eq!(settings.poll.interval, 600);
        assert_eq!(settings.poll.workers, 1);
        assert_eq!(settings.connection.retries, 2);
        assert!(settings.oid_tables_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let settings = AppConfig::settings_from_env(env_of(&[
            ("WEB_PORT", "9000"),
            ("POLL_INTERVAL", "30"),
            ("POLL_WORKERS", "4"),
            ("DB_PATH", "/var/lib/macwatch.db"),
            ("MACWATCH_OID_TABLES", "/etc/macwatch/oid.json"),
        ]))
        .unwrap();
        assert_eq!(settings.web.port, 9000);
        assert_eq!(settings.poll_interval().as_secs(), 30);
        assert_eq!(settings.poll.workers, 4);
        assert_eq!(settings.db_path, PathBuf::from("/var/lib/macwatch.db"));
        assert_eq!(
            settings.oid_tables_path,
            Some(PathBuf::from("/etc/macwatch/oid.json"))
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(AppConfig::settings_from_env(env_of(&[("WEB_PORT", "http")])).is_err());
        assert!(AppConfig::settings_from_env(env_of(&[("POLL_WORKERS", "0")])).is_err());
        assert!(AppConfig::settings_from_env(env_of(&[("POLL_INTERVAL", "0")])).is_err());
        assert!(AppConfig::settings_from_env(env_of(&[("SNMP_TIMEOUT", "0")])).is_err());
        assert!(AppConfig::settings_from_env(env_of(&[("POLL_INTERVAL", "1")])).is_ok());
    }
}
