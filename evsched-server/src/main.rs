mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use evsched_core::{EventStore, MemoryStore, SqliteStore};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

use crate::state::AppState;

const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let port = match std::env::var("EVSCHED_PORT") {
        Ok(value) => value.parse()?,
        Err(_) => DEFAULT_PORT,
    };

    // EVSCHED_DB selects the SQLite backend; without it the store is
    // in-memory and volatile.
    let store: Arc<dyn EventStore> = match std::env::var("EVSCHED_DB") {
        Ok(path) => {
            info!(db = %path, "using sqlite store");
            Arc::new(SqliteStore::open(&path)?)
        }
        Err(_) => {
            info!("using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::events::router())
        .merge(routes::envelope::router())
        .with_state(state)
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("evsched-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
