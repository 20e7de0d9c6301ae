//! The completion orchestrator: validation, prompt forwarding, and the two
//! turn-draining strategies.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{ChatMessage, MessageRole, ModelCatalog};
use crate::error::RelayError;
use crate::relay::channel::{ChannelHub, TokenChannel, TokenItem};
use crate::relay::registry::ConnectionRegistry;

/// Timeouts governing one turn.
#[derive(Debug, Clone, Copy)]
pub struct RelayConfig {
    /// Bound on forwarding the prompt envelope to the backend.
    pub send_timeout: Duration,
    /// Bound on each individual channel pop while draining.
    pub recv_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(10),
            recv_timeout: Duration::from_secs(10),
        }
    }
}

/// The bridge's shared service object, constructed once at startup.
///
/// Holds the only shared mutable state in the system: the connection
/// registry (gateway-written) and the active token channel (hub-held).
/// The turn gate serialises turns, since the wire protocol carries no
/// request correlation identifiers.
#[derive(Debug)]
pub struct Relay {
    registry: Arc<ConnectionRegistry>,
    hub: Arc<ChannelHub>,
    catalog: ModelCatalog,
    config: RelayConfig,
    turn_gate: Arc<Mutex<()>>,
}

/// An incremental event from a streaming turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    /// One token of generated text, in arrival order.
    Delta(String),
    /// The turn completed normally; no more deltas follow.
    Finished,
}

impl Relay {
    #[must_use]
    pub fn new(catalog: ModelCatalog, config: RelayConfig) -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
            hub: Arc::new(ChannelHub::new()),
            catalog,
            config,
            turn_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Registry handle for the gateway side.
    #[must_use]
    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        self.registry.clone()
    }

    /// Channel hub handle for the gateway side.
    #[must_use]
    pub fn hub(&self) -> Arc<ChannelHub> {
        self.hub.clone()
    }

    #[must_use]
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// Validate a request, forward its prompt, and open the turn.
    ///
    /// Validation fails fast, before any backend interaction, in this
    /// order: backend availability, message-sequence shape, model
    /// membership. The prompt envelope is a two-field JSON object
    /// `{"model": ..., "message": ...}` carrying the last message's
    /// content; a timed-out send is fatal for the request, with no retry.
    pub async fn begin_turn(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<Turn, RelayError> {
        if self.registry.is_empty() {
            return Err(RelayError::NoBackendAvailable);
        }

        let last = messages
            .last()
            .ok_or_else(|| RelayError::InvalidRequest("message sequence is empty".into()))?;
        if last.role == MessageRole::Assistant {
            return Err(RelayError::InvalidRequest(
                "last message must not have role assistant".into(),
            ));
        }

        if !self.catalog.contains(model) {
            return Err(RelayError::UnknownModel(model.to_string()));
        }

        // Only one turn in flight: tokens on the shared channel carry no
        // correlation ids, so a second request must wait here.
        let permit = self.turn_gate.clone().lock_owned().await;

        // The connection may have dropped while waiting on the gate.
        let outbound = self.registry.first().ok_or(RelayError::NoBackendAvailable)?;

        let envelope =
            serde_json::json!({ "model": model, "message": last.content }).to_string();
        match tokio::time::timeout(self.config.send_timeout, outbound.send(envelope)).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                // Egress task gone: the connection closed under us.
                return Err(RelayError::NoBackendAvailable);
            }
            Err(_) => {
                tracing::warn!(model, "prompt forward timed out");
                return Err(RelayError::SendTimeout);
            }
        }

        tracing::debug!(model, "turn opened, prompt forwarded");
        Ok(Turn {
            channel: self.hub.active(),
            hub: self.hub.clone(),
            recv_timeout: self.config.recv_timeout,
            _permit: permit,
        })
    }
}

/// One request/response cycle, from prompt forward to terminal sentinel.
///
/// Holds the turn gate for its lifetime and the channel instance that was
/// active when the turn opened. Both draining strategies share the same
/// sentinel handling: `EndOfTurn` finishes the turn only once the channel
/// is empty immediately after it, and `NotReady` replaces the channel and
/// aborts.
#[derive(Debug)]
pub struct Turn {
    channel: Arc<TokenChannel>,
    hub: Arc<ChannelHub>,
    recv_timeout: Duration,
    _permit: OwnedMutexGuard<()>,
}

impl Turn {
    /// Pop the next streaming event.
    pub async fn next_event(&mut self) -> Result<TurnEvent, RelayError> {
        loop {
            match self.channel.pop(self.recv_timeout).await? {
                TokenItem::Token(text) => return Ok(TurnEvent::Delta(text)),
                TokenItem::EndOfTurn => {
                    if self.channel.is_empty().await {
                        return Ok(TurnEvent::Finished);
                    }
                    // Tokens queued behind the sentinel still belong to
                    // this turn; keep draining.
                }
                TokenItem::NotReady => {
                    self.hub.replace();
                    return Err(RelayError::BackendNotReady);
                }
            }
        }
    }

    /// Aggregate strategy: drain the whole turn into one string.
    pub async fn aggregate(mut self) -> Result<String, RelayError> {
        let mut text = String::new();
        loop {
            match self.next_event().await? {
                TurnEvent::Delta(token) => text.push_str(&token),
                TurnEvent::Finished => return Ok(text),
            }
        }
    }
}
