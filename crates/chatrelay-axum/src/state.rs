//! Shared application state type.
//!
//! Defines the `AppState` type used across all handlers and routers.

use crate::bootstrap::RelayContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// An Arc-wrapped [`RelayContext`] holding the relay service object
/// (registry, channel hub, catalog, timeouts).
pub type AppState = Arc<RelayContext>;
