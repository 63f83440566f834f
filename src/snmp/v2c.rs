use anyhow::{Context, Result};
use async_trait::async_trait;
use snmp2::{AsyncSession, Value};
use tokio::time::timeout;

use super::oid::{oid_components, to_snmp_oid};
use super::walk::{PageSource, RawRow, walk_subtree};
use super::{BulkWalker, SessionOptions, SnmpConnector, SnmpValue, Varbind};

pub struct SnmpClientV2c {
    session: AsyncSession,
    target: String,
    community: Vec<u8>,
    options: SessionOptions,
}

impl SnmpClientV2c {
    pub async fn new(target: &str, community: &[u8], options: SessionOptions) -> Result<Self> {
        let session = open_session(target, community, &options).await?;

        Ok(Self {
            session,
            target: target.to_string(),
            community: community.to_vec(),
            options,
        })
    }
}

async fn open_session(target: &str, community: &[u8], options: &SessionOptions) -> Result<AsyncSession> {
    timeout(options.timeout, AsyncSession::new_v2c(target, community, 2))
        .await
        .map_err(|_| anyhow::anyhow!("Таймаут при создании SNMP сессии"))?
        .context("Не удалось создать SNMP сессию")
}

#[async_trait]
impl PageSource for SnmpClientV2c {
    async fn fetch(&mut self, from: &[u64]) -> Result<Vec<RawRow>> {
        let oid = to_snmp_oid(from)?;
        let resp = self
            .session
            .getbulk(&[&oid], 0, self.options.max_repetitions)
            .await?;

        resp.varbinds
            .into_iter()
            .map(|(name, value)| -> Result<RawRow> {
                Ok((oid_components(&name.to_string())?, owned_value(&value)))
            })
            .collect()
    }

    async fn reset(&mut self) -> Result<()> {
        tracing::debug!(addr = %self.target, "новая SNMP сессия перед повтором");
        self.session = open_session(&self.target, &self.community, &self.options).await?;
        Ok(())
    }
}

/// Копирует значение из буфера ответа; `None` означает конец поддерева
fn owned_value(value: &Value<'_>) -> Option<SnmpValue> {
    match value {
        Value::Integer(i) => Some(SnmpValue::Integer(*i)),
        Value::OctetString(bytes) => {
            Some(SnmpValue::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
        Value::Counter32(n) | Value::Unsigned32(n) | Value::Timeticks(n) => {
            Some(SnmpValue::Unsigned(u64::from(*n)))
        }
        Value::Counter64(n) => Some(SnmpValue::Unsigned(*n)),
        Value::EndOfMibView | Value::NoSuchObject | Value::NoSuchInstance => None,
        other => Some(SnmpValue::Other(format!("{:?}", other))),
    }
}

#[async_trait]
impl BulkWalker for SnmpClientV2c {
    async fn bulk_walk(&mut self, root: &str) -> Result<Vec<Varbind>> {
        let start = oid_components(root)?;
        let options = self.options.clone();
        walk_subtree(&mut *self, &start, &options)
            .await
            .with_context(|| format!("walk {} для {} не удался", root, self.target))
    }
}

/// Открывает SNMPv2c сессии через snmp2
#[derive(Debug, Clone, Default)]
pub struct V2cConnector {
    options: SessionOptions,
}

impl V2cConnector {
    pub fn new(options: SessionOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl SnmpConnector for V2cConnector {
    async fn connect(&self, target: &str, community: &str) -> Result<Box<dyn BulkWalker>> {
        let client = SnmpClientV2c::new(target, community.as_bytes(), self.options.clone()).await?;
        Ok(Box::new(client))
    }
}
