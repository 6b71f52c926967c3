//! Stub of the discussion/comments backend
//!
//! Acceptance tests point the web application at this service instead of the
//! real comments backend. Responses are canned JSON driven by a fixture
//! store: the binary seeds it from a JSON file, and tests reconfigure it
//! over HTTP with `PUT /set_config` between scenarios.
//!
//! ## Modules
//!
//! - `config` - The fixture store and pagination helpers
//! - `comments` - One handler per mimicked endpoint

pub mod comments;
pub mod config;

pub use config::{ConfigUpdate, StubConfig};

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, RwLock};

use axum::Router;
use axum::routing::{get, put};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Fixture store shared across handlers.
pub type SharedConfig = Arc<RwLock<StubConfig>>;

#[derive(Debug, Error)]
pub enum StubError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),

    #[error("cannot read fixture file '{path}': {source}")]
    ReadConfig {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid fixture file '{path}': {source}")]
    ParseConfig {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Build the stub router over a fresh store seeded with `config`.
///
/// Resource routes answer GET from fixtures; DELETE and PUT acknowledge the
/// write calls the application makes during teardown flows. Unknown paths
/// fall through to the same write handling, then 404.
pub fn router(config: StubConfig) -> Router {
    let state: SharedConfig = Arc::new(RwLock::new(config));

    Router::new()
        .route(
            "/api/v1/users/{user_id}/active_threads",
            get(comments::user_active_threads)
                .put(comments::put_passthrough)
                .delete(comments::delete_resource),
        )
        .route(
            "/api/v1/users/{user_id}",
            get(comments::user)
                .put(comments::put_passthrough)
                .delete(comments::delete_resource),
        )
        .route(
            "/api/v1/threads",
            get(comments::threads)
                .put(comments::put_passthrough)
                .delete(comments::delete_resource),
        )
        .route(
            "/api/v1/threads/{thread_id}",
            get(comments::thread)
                .put(comments::put_passthrough)
                .delete(comments::delete_resource),
        )
        .route(
            "/api/v1/comments/{comment_id}",
            get(comments::comment)
                .put(comments::put_passthrough)
                .delete(comments::delete_resource),
        )
        .route(
            "/api/v1/{commentable_id}/threads",
            get(comments::commentable_threads)
                .put(comments::put_passthrough)
                .delete(comments::delete_resource),
        )
        .route("/set_config", put(comments::set_config))
        .route("/get_config", get(comments::get_config))
        .fallback(comments::fallback)
        .with_state(state)
}

/// A stub service running on a background task.
///
/// Dropping the handle stops the server; tests bind port 0 and read the
/// chosen address from `local_addr`.
pub struct StubService {
    local_addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl StubService {
    pub async fn bind(addr: SocketAddr, config: StubConfig) -> Result<Self, StubError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| StubError::Bind { addr, source })?;
        let local_addr = listener.local_addr().map_err(StubError::Serve)?;

        let app = router(config);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "stub comments service stopped");
            }
        });

        tracing::info!(%local_addr, "stub comments service listening");
        Ok(Self { local_addr, handle })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

impl Drop for StubService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve on the current task until the process is stopped.
pub async fn serve(addr: SocketAddr, config: StubConfig) -> Result<(), StubError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StubError::Bind { addr, source })?;
    let local_addr = listener.local_addr().map_err(StubError::Serve)?;
    tracing::info!(%local_addr, "stub comments service listening");

    axum::serve(listener, router(config))
        .await
        .map_err(StubError::Serve)
}

/// Load a fixture store from a JSON file.
pub fn load_config(path: &Path) -> Result<StubConfig, StubError> {
    let raw = std::fs::read_to_string(path).map_err(|source| StubError::ReadConfig {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StubError::ParseConfig {
        path: path.display().to_string(),
        source,
    })
}
