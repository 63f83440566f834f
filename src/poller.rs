//! Фоновый опрос всех коммутаторов по расписанию.
//!
//! Цикл: список устройств -> опрос каждого -> пауза -> снова. Устройства
//! обрабатываются не более чем по `workers` штук одновременно; два прохода
//! по одному и тому же устройству никогда не пересекаются.

use futures::StreamExt;
use futures::stream;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use crate::collector::SnmpCollector;
use crate::error::PollError;
use crate::models::Device;
use crate::reconciler::{ReconcileReport, Reconciler};
use crate::store::{Store, StoreError};

/// Замки по id устройства
#[derive(Debug, Clone, Default)]
pub struct DeviceLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>>,
}

impl DeviceLocks {
    pub fn lock_for(&self, device_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        locks.entry(device_id).or_default().clone()
    }

    /// Убирает замки, которые никто не держит; возвращает сколько осталось
    pub fn prune(&self) -> usize {
        let mut locks = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.len()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}

/// Итог одного цикла опроса
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub devices: usize,
    pub polled: usize,
    pub failed: usize,
    pub ports_created: usize,
    pub ports_updated: usize,
    pub macs_inserted: usize,
}

impl CycleReport {
    fn record(&mut self, report: &ReconcileReport) {
        self.polled += 1;
        self.ports_created += report.ports_created;
        self.ports_updated += report.ports_updated;
        self.macs_inserted += report.macs_inserted;
    }
}

pub struct Poller {
    store: Arc<dyn Store>,
    collector: SnmpCollector,
    reconciler: Arc<Reconciler>,
    locks: DeviceLocks,
    interval: Duration,
    workers: usize,
}

impl Poller {
    pub fn new(
        store: Arc<dyn Store>,
        collector: SnmpCollector,
        interval: Duration,
        workers: usize,
    ) -> Self {
        Self {
            reconciler: Arc::new(Reconciler::new(store.clone())),
            store,
            collector,
            locks: DeviceLocks::default(),
            interval,
            workers: workers.max(1),
        }
    }

    #[cfg(test)]
    pub fn locks(&self) -> &DeviceLocks {
        &self.locks
    }

    /// Опрос и сохранение одного устройства.
    ///
    /// Оба walk'а должны пройти до того, как что-либо будет записано.
    pub async fn poll_device(&self, device: &Device) -> Result<ReconcileReport, PollError> {
        let lock = self.locks.lock_for(device.id);
        let _guard = lock.lock().await;

        tracing::debug!(switch = %device.name, addr = %device.address, "опрос коммутатора");
        let snapshot = self.collector.collect_device(device).await?;

        if snapshot.interfaces.descriptions.is_empty() {
            tracing::warn!(switch = %device.name, "интерфейсы не найдены");
        }

        let reconciler = self.reconciler.clone();
        let device_id = device.id;
        let report = tokio::task::spawn_blocking(move || reconciler.reconcile(device_id, &snapshot))
            .await
            .map_err(|e| StoreError::Execution(e.to_string()))??;

        if !report.wrote_anything() {
            tracing::debug!(switch = %device.name, "изменений нет");
        }
        Ok(report)
    }

    /// Один проход по всем устройствам; ошибки устройств не прерывают цикл
    pub async fn run_cycle(&self) -> CycleReport {
        let store = self.store.clone();
        let devices = match tokio::task::spawn_blocking(move || store.list_devices()).await {
            Ok(Ok(devices)) => devices,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "не удалось получить список коммутаторов");
                return CycleReport::default();
            }
            Err(e) => {
                tracing::error!(error = %e, "не удалось получить список коммутаторов");
                return CycleReport::default();
            }
        };

        let mut cycle = CycleReport {
            devices: devices.len(),
            ..CycleReport::default()
        };
        if devices.is_empty() {
            tracing::info!("в базе нет коммутаторов");
            self.locks.prune();
            return cycle;
        }

        let results: Vec<(Device, Result<ReconcileReport, PollError>)> = stream::iter(devices)
            .map(|device| async move {
                let result = self.poll_device(&device).await;
                (device, result)
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        for (device, result) in results {
            match result {
                Ok(report) => {
                    tracing::debug!(
                        switch = %device.name,
                        created = report.ports_created,
                        updated = report.ports_updated,
                        status_changes = report.status_changes,
                        macs = report.macs_inserted,
                        "коммутатор опрошен"
                    );
                    cycle.record(&report);
                }
                Err(e) => {
                    tracing::warn!(switch = %device.name, error = %e, "коммутатор пропущен в этом цикле");
                    cycle.failed += 1;
                }
            }
        }

        // Замки удалённых устройств больше не понадобятся
        self.locks.prune();
        cycle
    }

    /// Крутится до сигнала остановки; текущий цикл доводится до конца
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            workers = self.workers,
            "фоновый опрос запущен"
        );

        loop {
            let cycle = self.run_cycle().await;
            tracing::info!(
                devices = cycle.devices,
                polled = cycle.polled,
                failed = cycle.failed,
                macs = cycle.macs_inserted,
                "цикл опроса завершён"
            );

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    tracing::info!("фоновый опрос остановлен");
                    return;
                }
            }
        }
    }
}
