//! Поддельный SNMP агент для тестов коллектора и поллера.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BulkWalker, SnmpConnector, SnmpValue, Varbind};

/// Ответы одного агента: корень walk'а -> строки
#[derive(Debug, Clone, Default)]
pub struct FakeAgent {
    walks: HashMap<String, Vec<Varbind>>,
    failing: HashSet<String>,
}

impl FakeAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, root: &str, suffix: &str, value: SnmpValue) -> Self {
        self.walks
            .entry(root.to_string())
            .or_default()
            .push(Varbind::new(format!("{}.{}", root, suffix), value));
        self
    }

    pub fn fail(mut self, root: &str) -> Self {
        self.failing.insert(root.to_string());
        self
    }
}

struct FakeSession {
    agent: FakeAgent,
}

#[async_trait]
impl BulkWalker for FakeSession {
    async fn bulk_walk(&mut self, root: &str) -> Result<Vec<Varbind>> {
        if self.agent.failing.contains(root) {
            anyhow::bail!("Таймаут SNMP GETBULK (5s)");
        }
        Ok(self.agent.walks.get(root).cloned().unwrap_or_default())
    }
}

/// Коннектор, отдающий заранее заданные ответы по адресу
#[derive(Default)]
pub struct FakeConnector {
    agents: Mutex<HashMap<String, FakeAgent>>,
    connects: AtomicUsize,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_agent(&self, target: &str, agent: FakeAgent) {
        self.agents
            .lock()
            .unwrap()
            .insert(target.to_string(), agent);
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnmpConnector for FakeConnector {
    async fn connect(&self, target: &str, _community: &str) -> Result<Box<dyn BulkWalker>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let agent = self
            .agents
            .lock()
            .unwrap()
            .get(target)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Не удалось создать SNMP сессию"))?;
        Ok(Box::new(FakeSession { agent }))
    }
}
