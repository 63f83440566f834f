//! Ошибки поллера.
//!
//! `DecodeError` относится к одной строке walk'а: вызывающий код пропускает
//! строку и идёт дальше. `PollError` относится к устройству целиком: цикл
//! для этого устройства прерывается, остальные устройства опрашиваются.

use thiserror::Error;

use crate::store::StoreError;

/// Мягкая ошибка декодирования одной строки
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("OID {oid} не начинается с {prefix}")]
    PrefixMismatch { oid: String, prefix: String },

    #[error("не удалось распарсить индекс в OID {oid}")]
    BadIndex { oid: String },

    #[error("ожидалось 6 октетов MAC, получено {parts}: {raw}")]
    MacLength { raw: String, parts: usize },

    #[error("невалидный октет MAC '{octet}' в {raw}")]
    MacOctet { raw: String, octet: String },

    #[error("ожидалось целое значение для {oid}, получено {value}")]
    NotInteger { oid: String, value: String },
}

/// Ошибка опроса одного устройства
#[derive(Error, Debug)]
pub enum PollError {
    #[error("SNMP ошибка для {target}: {message}")]
    Transport { target: String, message: String },

    #[error("Ошибка хранилища: {0}")]
    Storage(#[from] StoreError),
}

impl PollError {
    pub fn transport(target: impl Into<String>, err: impl std::fmt::Display) -> Self {
        PollError::Transport {
            target: target.into(),
            message: format!("{:#}", err),
        }
    }
}
