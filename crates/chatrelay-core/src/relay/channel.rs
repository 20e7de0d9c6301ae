//! Unbounded FIFO channel carrying tokens and control sentinels.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::RelayError;

/// One item on the token channel.
///
/// `Token` carries a unit of generated text; the other two variants are
/// out-of-band control sentinels riding the same FIFO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenItem {
    /// A unit of generated text, order-significant.
    Token(String),
    /// Generation for the current turn is complete.
    EndOfTurn,
    /// The backend cannot service the request; the turn must be aborted.
    NotReady,
}

/// Unbounded single-producer-group, single-consumer token FIFO.
///
/// `push` is non-blocking and never fails; backpressure is explicitly a
/// non-goal since the backend is trusted and single-source. The struct
/// keeps its own sender half alive, so a consumer polling a stale instance
/// after channel replacement sees it as empty (and eventually times out)
/// rather than as closed.
#[derive(Debug)]
pub struct TokenChannel {
    tx: mpsc::UnboundedSender<TokenItem>,
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<TokenItem>>,
}

impl TokenChannel {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: tokio::sync::Mutex::new(rx),
        }
    }

    /// Push an item onto the channel. Never blocks, never fails.
    pub fn push(&self, item: TokenItem) {
        // The receiver half lives in `self`, so send cannot fail.
        let _ = self.tx.send(item);
    }

    /// Pop the next item, waiting at most `timeout`.
    pub async fn pop(&self, timeout: Duration) -> Result<TokenItem, RelayError> {
        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(item)) => Ok(item),
            // `self` owns the sender half, so recv() cannot observe closure
            // while this instance is alive; treat it like an empty wait.
            Ok(None) | Err(_) => Err(RelayError::ReceiveTimeout),
        }
    }

    /// Whether the channel holds no queued items right now.
    ///
    /// Used for the end-of-turn double-check: `EndOfTurn` finishes a turn
    /// only when the channel is empty immediately after it is observed.
    pub async fn is_empty(&self) -> bool {
        self.rx.lock().await.is_empty()
    }
}

impl Default for TokenChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Holder of the active [`TokenChannel`] instance.
///
/// The gateway resolves the active channel on every push; the orchestrator
/// snapshots it at the start of a turn. Replacement (the only structural
/// mutation) swaps the `Arc` atomically, so a reader still holding the old
/// instance keeps polling a channel nobody writes to any more.
#[derive(Debug)]
pub struct ChannelHub {
    active: RwLock<Arc<TokenChannel>>,
}

impl ChannelHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: RwLock::new(Arc::new(TokenChannel::new())),
        }
    }

    /// The currently active channel instance.
    #[must_use]
    pub fn active(&self) -> Arc<TokenChannel> {
        self.active.read().unwrap().clone()
    }

    /// Install a fresh empty channel, discarding whatever the old instance
    /// still holds. Called when a `NotReady` sentinel aborts a turn.
    pub fn replace(&self) -> Arc<TokenChannel> {
        let fresh = Arc::new(TokenChannel::new());
        *self.active.write().unwrap() = fresh.clone();
        tracing::debug!("token channel replaced after backend-not-ready");
        fresh
    }
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new()
    }
}
