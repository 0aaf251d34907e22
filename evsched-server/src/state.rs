use std::sync::Arc;

use evsched_core::{EventStore, Gateway};

/// Shared application state: one store, one gateway over it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub gateway: Gateway,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        let gateway = Gateway::new(store.clone());
        Self { store, gateway }
    }
}
