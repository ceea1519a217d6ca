//! Claims server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use claims_store::{ClaimLog, ClaimStore};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::routes::create_router;
use crate::state::AppState;

/// HTTP server for the claims API.
#[derive(Debug, Clone)]
pub struct ClaimsServer {
    state: Arc<AppState>,
}

impl ClaimsServer {
    /// Create a server backed by the file store described in `config.store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store configuration is invalid.
    pub fn new(config: ServerConfig) -> ApiResult<Self> {
        let store = ClaimStore::new(config.store.clone())?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Create a server around an existing claim backend.
    #[must_use]
    pub fn with_store(config: ServerConfig, store: Arc<dyn ClaimLog>) -> Self {
        let state = Arc::new(AppState::new(config, store));
        Self { state }
    }

    /// Get the server state for external access.
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Start the server on the configured bind address.
    ///
    /// Runs until the server encounters a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve(&self) -> ApiResult<()> {
        self.serve_with_shutdown(std::future::pending::<()>()).await
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided future completes.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve_with_shutdown<F>(&self, shutdown: F) -> ApiResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.state.config().bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::BindFailed(addr, e))?;

        self.run(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails while serving.
    pub async fn run<F>(&self, listener: TcpListener, shutdown: F) -> ApiResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: Option<SocketAddr> = listener.local_addr().ok();
        info!(
            addr = ?addr,
            store = %self.state.config().store.path.display(),
            "Claims server listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        info!("Claims server shut down");
        Ok(())
    }

    /// Create the router without starting the server.
    ///
    /// Useful for testing or embedding in another server.
    pub fn router(&self) -> axum::Router {
        create_router(self.state.clone())
    }
}
