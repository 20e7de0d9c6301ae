//! WebSocket gateway for backend connections.
//!
//! `GET /ws` upgrades to a WebSocket carrying the backend's generation
//! stream. Text frames are generated tokens; binary frames are control
//! frames classified by their first byte:
//!
//! | first byte | meaning | action |
//! |---|---|---|
//! | `0xFF` | keep-alive | discarded |
//! | `0x00` | end of turn | push `EndOfTurn` |
//! | `0x01` | backend not ready | push `NotReady` |
//! | other | reserved | discarded |
//!
//! ## Lifecycle
//!
//! 1. Backend dials `/ws` (on the API port or the dedicated intake port).
//! 2. The handler registers an outbound channel in the connection
//!    registry, making the connection eligible for prompt forwarding.
//! 3. Two tasks run until either side closes:
//!    * **Ingest**: classifies inbound frames and pushes tokens and
//!      sentinels onto the active token channel.
//!    * **Egress**: drains the outbound channel (prompt envelopes from
//!      the orchestrator) and writes each as a text frame.
//! 4. On exit the connection is deregistered, so the orchestrator's
//!    no-backend guard sees the disconnect immediately.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::info;

use chatrelay_core::TokenItem;

use crate::state::AppState;

/// Buffered prompt envelopes per connection; the orchestrator's send
/// timeout bounds the wait when this fills.
const OUTBOUND_CAPACITY: usize = 8;

/// Classify a binary control frame by its first byte.
///
/// Returns `None` for keep-alives, empty frames, and unrecognised
/// prefixes, all of which are deliberate no-ops.
pub(crate) fn classify_control(data: &[u8]) -> Option<TokenItem> {
    match data.first() {
        Some(0x00) => Some(TokenItem::EndOfTurn),
        Some(0x01) => Some(TokenItem::NotReady),
        _ => None,
    }
}

/// `GET /ws` WebSocket upgrade endpoint for backend connections.
pub async fn backend_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_backend_ws(socket, state))
}

async fn handle_backend_ws(socket: WebSocket, state: AppState) {
    let registry = state.relay.registry();
    let hub = state.relay.hub();

    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_CAPACITY);
    let id = registry.register(outbound_tx);

    // Split the socket so the two tasks can use it concurrently.
    let (ws_sender, ws_receiver) = socket.split();

    // ── Ingest: backend frames → token channel ───────────────────────────

    let mut ingest = tokio::spawn(async move {
        let mut ws_receiver = ws_receiver;

        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    // The hub is resolved per push so a channel replaced
                    // after NotReady is picked up immediately.
                    hub.active().push(TokenItem::Token(text.to_string()));
                }
                Ok(Message::Binary(data)) => {
                    if let Some(item) = classify_control(&data) {
                        hub.active().push(item);
                    }
                }
                // Graceful close or protocol error ends the ingest loop.
                Ok(Message::Close(_)) | Err(_) => break,
                // Ping/pong frames are answered by axum itself.
                Ok(_) => {}
            }
        }
    });

    // ── Egress: prompt envelopes → backend text frames ───────────────────

    let mut egress = tokio::spawn(async move {
        let mut ws_sender = ws_sender;

        while let Some(payload) = outbound_rx.recv().await {
            if ws_sender.send(Message::Text(payload.into())).await.is_err() {
                // Backend disconnected; nothing left to deliver.
                break;
            }
        }
    });

    // Wait for whichever task finishes first, then abort the other.
    // This covers both graceful close and abrupt network drops.
    tokio::select! {
        _ = &mut ingest => { egress.abort(); }
        _ = &mut egress => { ingest.abort(); }
    }

    // Always deregister so prompt selection never picks a dead connection.
    registry.deregister(id);
    info!(connection_id = id, "backend websocket session closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_bytes_map_to_sentinels() {
        assert_eq!(classify_control(&[0x00]), Some(TokenItem::EndOfTurn));
        assert_eq!(classify_control(&[0x01, 0xAA]), Some(TokenItem::NotReady));
    }

    #[test]
    fn keep_alive_and_unknown_prefixes_are_no_ops() {
        assert_eq!(classify_control(&[0xFF]), None);
        assert_eq!(classify_control(&[0x7C, 0x00]), None);
        assert_eq!(classify_control(&[]), None);
    }
}
