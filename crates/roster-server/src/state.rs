use std::sync::{Arc, Mutex};

use roster_store::error::Result as StoreResult;
use roster_store::Store;

use crate::error::ApiError;

/// Shared handle to the single store connection. Every request goes through
/// the same mutex, so store writes are serialized within the process.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `op` against the store on the blocking pool.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Store) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store
                .lock()
                .map_err(|_| ApiError::Internal("store lock poisoned".to_string()))?;
            op(&guard).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}
