use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

mod collector;
mod config;
mod error;
mod formatter;
mod handlers;
mod models;
mod poller;
mod portname;
mod reconciler;
mod routes;
mod snmp;
mod store;

use collector::SnmpCollector;
use handlers::AppState;
use poller::Poller;
use snmp::v2c::V2cConnector;
use store::{SqliteStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::AppConfig::load()?;
    config.debug_config();
    let settings = &config.settings;

    let store: Arc<dyn Store> = Arc::new(
        SqliteStore::open(&settings.db_path)
            .with_context(|| format!("Не удалось открыть базу {}", settings.db_path.display()))?,
    );

    let connector = Arc::new(V2cConnector::new(settings.session_options()));
    let collector = SnmpCollector::new(connector, config.oid_tables.clone());

    // Фоновый опрос живёт рядом с веб-сервером и останавливается вместе с ним
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = Poller::new(
        store.clone(),
        collector.clone(),
        settings.poll_interval(),
        settings.poll.workers,
    );
    let poller_task = tokio::spawn(poller.run(shutdown_rx));

    let app = routes::create_router(AppState { store, collector });

    let addr = settings.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Не удалось занять адрес {}", addr))?;
    tracing::info!(%addr, "веб-сервер запущен");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("получен сигнал остановки");
        })
        .await
        .context("Ошибка веб-сервера")?;

    let _ = shutdown_tx.send(true);
    poller_task.await.context("Фоновый опрос завершился с паникой")?;

    Ok(())
}
