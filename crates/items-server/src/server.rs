use std::sync::Arc;

use items_store::{ItemStore, JsonFileStore};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_app;
use crate::state::AppState;

/// Item collection server.
pub struct ItemsServer {
    config: ServerConfig,
}

impl ItemsServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the data file (seeding it if absent) and build the full app.
    pub async fn app(&self) -> ServerResult<axum::Router> {
        let file = JsonFileStore::open(&self.config.data_path).await?;
        let store = ItemStore::new(Arc::new(file));
        let state = if self.config.serialize_writes {
            AppState::serialized(store)
        } else {
            AppState::new(store)
        };
        build_app(state, &self.config)
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.app().await?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            data = %self.config.data_path.display(),
            serialize_writes = self.config.serialize_writes,
            "items server listening on http://{}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
