//! Registry of live backend connections.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

/// A registered backend connection's outbound side.
///
/// The gateway spawns an egress task per connection that drains the paired
/// receiver and writes each payload to the socket; dropping the last
/// sender clone shuts that task down.
#[derive(Debug, Clone)]
struct Entry {
    id: u64,
    outbound: mpsc::Sender<String>,
}

/// Set of currently-open backend connections.
///
/// The gateway is the sole writer (insert on connect, remove on
/// disconnect). The orchestrator only reads, to pick a destination for an
/// outgoing prompt; selection policy is first-available, not balanced.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
}

impl ConnectionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection; returns the id to pass to [`deregister`] later.
    ///
    /// [`deregister`]: ConnectionRegistry::deregister
    pub fn register(&self, outbound: mpsc::Sender<String>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().unwrap().push(Entry { id, outbound });
        tracing::info!(connection_id = id, "backend connection registered");
        id
    }

    /// Remove a connection after its receive loop ends.
    pub fn deregister(&self, id: u64) {
        self.entries.lock().unwrap().retain(|e| e.id != id);
        tracing::info!(connection_id = id, "backend connection deregistered");
    }

    /// First available connection's outbound sender, if any.
    #[must_use]
    pub fn first(&self) -> Option<mpsc::Sender<String>> {
        self.entries
            .lock()
            .unwrap()
            .first()
            .map(|e| e.outbound.clone())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_and_deregister_track_membership() {
        let registry = ConnectionRegistry::new();
        assert!(registry.is_empty());

        let (tx_a, _rx_a) = mpsc::channel(4);
        let (tx_b, _rx_b) = mpsc::channel(4);
        let a = registry.register(tx_a);
        let b = registry.register(tx_b);
        assert_eq!(registry.len(), 2);
        assert_ne!(a, b);

        registry.deregister(a);
        assert_eq!(registry.len(), 1);
        registry.deregister(b);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn first_returns_the_earliest_registered_connection() {
        let registry = ConnectionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, _rx_b) = mpsc::channel(4);
        registry.register(tx_a);
        registry.register(tx_b);

        let chosen = registry.first().unwrap();
        chosen.send("prompt".to_string()).await.unwrap();
        assert_eq!(rx_a.recv().await.unwrap(), "prompt");
    }
}
