//! The shared token channel and its sentinel protocol.
//!
//! The backend gateway is the sole pusher; the orchestrator is the sole
//! popper at any instant. Items ride the channel as a tagged union so the
//! consuming state machine stays exhaustive: generated text, end-of-turn,
//! and backend-not-ready all share one FIFO.
//!
//! A [`TokenChannel`] instance lives for at most one turn after a
//! `NotReady` sentinel: [`ChannelHub::replace`] installs a fresh instance
//! so tokens still in flight from the aborted turn are dropped rather than
//! delivered to a subsequent request. A reader still polling the stale
//! instance simply observes it staying empty until its own timeout fires.

mod channel;
mod orchestrator;
mod registry;

pub use channel::{ChannelHub, TokenChannel, TokenItem};
pub use orchestrator::{Relay, RelayConfig, Turn, TurnEvent};
pub use registry::ConnectionRegistry;
