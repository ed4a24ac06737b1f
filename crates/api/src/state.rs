use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::DocumentStore;

/// Handed to every handler through `State<AppState>`. Clones share the pool,
/// the config and the document directory.
#[derive(Clone)]
pub struct AppState {
    pub pool: sitebook_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub documents: DocumentStore,
}
