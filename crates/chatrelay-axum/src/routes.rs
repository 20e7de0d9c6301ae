//! Route definitions and router construction.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::bootstrap::CorsConfig;
use crate::gateway;
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Health check.
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Create the main Axum router with all API routes.
///
/// The backend intake (`/ws`) is mounted here as well as on the dedicated
/// backend listener, so a backend may dial either port.
pub fn create_router(ctx: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/models", get(handlers::models::list))
        .route("/v1/chat/completions", post(handlers::completions::create))
        .route("/ws", get(gateway::backend_ws))
        .layer(build_cors_layer(cors))
        .with_state(ctx)
}

/// Create the minimal router served on the dedicated backend port.
pub fn create_backend_router(ctx: AppState) -> Router {
    Router::new()
        .route("/ws", get(gateway::backend_ws))
        .with_state(ctx)
}
