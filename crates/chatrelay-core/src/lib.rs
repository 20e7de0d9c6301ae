//! Core token-relay logic for the chatrelay bridge.
//!
//! This crate is transport-agnostic: it knows nothing about HTTP or
//! WebSockets. It owns the domain types, the shared token channel with its
//! sentinel protocol, the backend connection registry, and the completion
//! orchestrator that drains a turn into either an aggregated string or a
//! sequence of incremental deltas.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod relay;

// Re-export commonly used types for convenience
pub use domain::{ChatMessage, FunctionCall, MessageRole, ModelCatalog};
pub use error::RelayError;
pub use relay::{
    ChannelHub, ConnectionRegistry, Relay, RelayConfig, TokenChannel, TokenItem, Turn, TurnEvent,
};

// Silence unused dev-dependency warnings until we add timing-based tests
#[cfg(test)]
use tokio_test as _;
