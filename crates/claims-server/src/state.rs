//! Shared state for the claims server.

use std::sync::Arc;
use std::time::Instant;

use claims_store::ClaimLog;

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};

/// State shared by every request handler.
pub struct AppState {
    config: Arc<ServerConfig>,
    store: Arc<dyn ClaimLog>,
    start_time: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create state around an already opened claim backend.
    pub fn new(config: ServerConfig, store: Arc<dyn ClaimLog>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            start_time: Instant::now(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get a handle to the claim backend.
    pub fn store(&self) -> Arc<dyn ClaimLog> {
        Arc::clone(&self.store)
    }

    /// Seconds since the server state was created.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Run a store operation on the blocking thread pool.
    ///
    /// Store calls do whole-file I/O, so they stay off the async workers.
    pub async fn with_store<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&dyn ClaimLog) -> claims_store::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store();
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
            .map_err(ApiError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_store::{ClaimFields, ClaimStore, StoreConfig};

    fn make_state(dir: &tempfile::TempDir) -> AppState {
        let store = ClaimStore::new(StoreConfig::new(dir.path().join("claims.log"))).unwrap();
        AppState::new(ServerConfig::default(), Arc::new(store))
    }

    #[tokio::test]
    async fn test_with_store_runs_operation() {
        let dir = tempfile::tempdir().unwrap();
        let state = make_state(&dir);

        let created = state
            .with_store(|store| store.append(ClaimFields::new("d", "c", "x")))
            .await
            .unwrap();
        let listed = state.with_store(|store| store.list()).await.unwrap();

        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_with_store_maps_errors() {
        let dir = tempfile::tempdir().unwrap();
        let state = make_state(&dir);

        let result = state
            .with_store(|store| store.delete_by_id(claims_store::ClaimId(1)))
            .await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_uptime_starts_near_zero() {
        let dir = tempfile::tempdir().unwrap();
        assert!(make_state(&dir).uptime_secs() < 5);
    }
}
