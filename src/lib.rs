pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod storage;

use std::sync::Arc;

use crate::db::Store;
use crate::storage::StorageClient;

/// Shared handles injected into every handler: the document store and the
/// object store. No other state lives between requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub storage: StorageClient,
}
