use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::app::{router, AppState};
use crate::config::{AppConfig, StorageBackend};
use crate::database::{DatabaseManager, MemoryAccountStore, MemoryTodoStore, PgAccountStore, PgTodoStore};
use crate::notification;

/// Wire stores, notifier and services for the configured backend, then seed
/// the bootstrap administrator when one is configured.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let notifier = notification::from_config(&config.notification).context("invalid notification config")?;
    let allow_list = config.server.allow_list.clone();

    let state = match config.database.backend {
        StorageBackend::Memory => {
            info!("Using in-memory stores, data is lost on restart");
            AppState::new(
                Arc::new(MemoryAccountStore::new()),
                Arc::new(MemoryTodoStore::new()),
                notifier,
                allow_list,
            )
        }
        StorageBackend::Postgres => {
            let database = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            database.migrate().await.context("failed to bootstrap schema")?;

            let pool = database.pool().clone();
            AppState::new(
                Arc::new(PgAccountStore::new(pool.clone())),
                Arc::new(PgTodoStore::new(pool)),
                notifier,
                allow_list,
            )
            .with_database(database)
        }
    };

    if let Some((name, password)) = config.bootstrap_admin() {
        if state.accounts.ensure_admin(name, password).await? {
            info!(name = %name, "Bootstrap administrator created");
        }
    }

    Ok(state)
}

/// Bind, serve until Ctrl-C or SIGTERM, then close the pool
pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let state = build_state(config).await?;
    let database = state.database.clone();
    let app = router(state, config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    let local: SocketAddr = listener.local_addr()?;

    info!(address = %local, environment = ?config.environment, "tasktrack-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(database) = database {
        database.close().await;
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
