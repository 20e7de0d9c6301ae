//! HTTP request handlers for the completion API.
//!
//! Handlers are thin wrappers that delegate to the relay core and map
//! results into the wire DTOs.

pub mod completions;
pub mod models;
