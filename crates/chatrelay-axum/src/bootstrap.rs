//! Server bootstrap - the composition root.
//!
//! This module is the ONLY place where the relay service object is
//! constructed and wired to listeners. Everything downstream receives it
//! through [`AppState`](crate::state::AppState).

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chatrelay_core::{ModelCatalog, Relay, RelayConfig};

use crate::dto::ModelList;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port for the HTTP API server.
    pub port: u16,
    /// Dedicated backend WebSocket intake port. The `/ws` route is also
    /// mounted on the API port; this extra listener exists for backends
    /// that dial a fixed port with no HTTP path awareness.
    pub backend_port: Option<u16>,
    /// Bound on forwarding a prompt to the backend.
    pub send_timeout: Duration,
    /// Bound on each channel pop while draining a turn.
    pub recv_timeout: Duration,
    /// CORS configuration.
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Config with default ports and timeouts.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            port: 8000,
            backend_port: Some(8765),
            send_timeout: Duration::from_secs(10),
            recv_timeout: Duration::from_secs(10),
            cors: CorsConfig::default(),
        }
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }
}

/// Application context for the Axum adapter.
pub struct RelayContext {
    /// The relay service object: registry, channel hub, catalog, timeouts.
    pub relay: Relay,
    /// Catalog snapshot built once at startup; `created` stamps are stable
    /// across requests.
    pub model_list: ModelList,
}

/// Build the relay context from server configuration.
#[must_use]
pub fn bootstrap(config: &ServerConfig) -> Arc<RelayContext> {
    let relay = Relay::new(
        ModelCatalog::with_defaults(),
        RelayConfig {
            send_timeout: config.send_timeout,
            recv_timeout: config.recv_timeout,
        },
    );
    let model_list = ModelList::new(relay.catalog().ids());
    Arc::new(RelayContext { relay, model_list })
}

/// Start the API server (and the dedicated backend intake listener, when
/// configured) and serve until shutdown.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(&config);

    if let Some(backend_port) = config.backend_port {
        let backend_app = crate::routes::create_backend_router(ctx.clone());
        let backend_addr = format!("0.0.0.0:{backend_port}");
        let backend_listener = TcpListener::bind(&backend_addr).await?;
        info!("backend intake listening on ws://{}/ws", backend_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(backend_listener, backend_app).await {
                tracing::error!("backend intake listener failed: {e}");
            }
        });
    }

    let app = crate::routes::create_router(ctx, &config.cors);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("chatrelay API listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
