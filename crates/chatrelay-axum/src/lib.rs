//! Axum web adapter for the chatrelay bridge.
//!
//! Exposes the OpenAI-style completion API (`/v1/chat/completions`,
//! `/v1/models`, `/health`) and the backend WebSocket intake (`/ws`).
//! All relay semantics live in `chatrelay-core`; this crate maps wire
//! shapes to core calls and back.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings for integration-test-only crates
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tokio_test as _;
#[cfg(test)]
use tokio_tungstenite as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod dto;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export primary types
pub use bootstrap::{CorsConfig, RelayContext, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::{create_backend_router, create_router};
pub use state::AppState;
