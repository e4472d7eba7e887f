use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_server::config::{Config, StoreKind};
use todo_server::{Db, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    let db: Db = match &config.store {
        StoreKind::Postgres {
            url,
            max_connections,
        } => {
            let store = PgStore::connect(url, *max_connections).await?;
            store.init_schema().await?;
            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("TODO_STORE=memory, running without persistence");
            Arc::new(MemoryStore::default())
        }
    };

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("server is running on http://{addr}");

    todo_server::run(listener, db, shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
