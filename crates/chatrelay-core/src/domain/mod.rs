//! Domain types for the bridge, independent of any transport concerns.

pub mod chat;
pub mod model;

pub use chat::{ChatMessage, FunctionCall, MessageRole};
pub use model::ModelCatalog;
