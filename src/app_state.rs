//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use crate::store::TransactionStore;

/// The state of the REST server.
///
/// Created once at startup and cloned into each handler; the store handle is
/// shared and never replaced.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store that transactions are persisted in.
    pub store: Arc<dyn TransactionStore>,
}

impl AppState {
    /// Create a new [AppState] around `store`.
    pub fn new(store: impl TransactionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
