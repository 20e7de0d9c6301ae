//! Chat completion handler: aggregate and streaming strategies.
//!
//! Both strategies open a turn through the relay core; this module only
//! decides how the drained turn is shaped on the wire. The streaming
//! variant emits one SSE chunk per token, a terminal chunk with
//! `finish_reason: "stop"`, and a literal `[DONE]` event.

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use chatrelay_core::{ChatMessage, MessageRole, Turn, TurnEvent};

use crate::dto::{ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse};
use crate::error::HttpError;
use crate::state::AppState;

/// SSE keep-alive ping interval.
const SSE_PING_INTERVAL: Duration = Duration::from_secs(100);

fn completion_id() -> String {
    format!("chatcmpl-{}", Uuid::new_v4())
}

/// `POST /v1/chat/completions`.
///
/// Validation and prompt forwarding happen in `begin_turn`; failures there
/// surface as HTTP errors before any response bytes are committed.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<Response, HttpError> {
    let turn = state
        .relay
        .begin_turn(&request.model, &request.messages)
        .await?;

    if request.stream {
        stream_completion(request.model, turn).await
    } else {
        aggregate_completion(&request.model, turn).await
    }
}

/// Aggregate strategy: one JSON response with the whole turn's text.
async fn aggregate_completion(model: &str, turn: Turn) -> Result<Response, HttpError> {
    let content = turn.aggregate().await?;
    let message = ChatMessage::new(MessageRole::Assistant, content);
    let response = ChatCompletionResponse::aggregated(model, completion_id(), message);
    Ok(Json(response).into_response())
}

/// Streaming strategy: SSE chunks terminated by `[DONE]`.
async fn stream_completion(model: String, mut turn: Turn) -> Result<Response, HttpError> {
    // The first pop happens before the response is committed, so a backend
    // abort or timeout before any output still surfaces as a proper HTTP
    // error instead of an empty stream.
    let first = turn.next_event().await?;

    let id = completion_id();
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(16);

    tokio::spawn(async move {
        let mut event = first;
        loop {
            let chunk = match &event {
                TurnEvent::Delta(token) => ChatCompletionChunk::delta(&model, &id, token.clone()),
                TurnEvent::Finished => ChatCompletionChunk::finished(&model, &id),
            };
            send_chunk(&tx, &chunk).await;

            if event == TurnEvent::Finished {
                // Terminal marker, distinct from any JSON chunk payload.
                let _ = tx.send(Ok(Event::default().data("[DONE]"))).await;
                break;
            }

            event = match turn.next_event().await {
                Ok(ev) => ev,
                Err(err) => {
                    // Chunks were already committed; the stream just ends
                    // abnormally. The channel was already replaced if this
                    // was a backend abort.
                    tracing::warn!(error = %err, "stream ended abnormally mid-turn");
                    break;
                }
            };
        }
        // A disconnected caller makes the sends above no-ops, but the loop
        // keeps draining until a sentinel or timeout: caller disconnects do
        // not propagate cancellation to the backend.
    });

    let stream = ReceiverStream::new(rx);
    Ok(Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(SSE_PING_INTERVAL).text("ping"))
        .into_response())
}

async fn send_chunk(
    tx: &mpsc::Sender<Result<Event, Infallible>>,
    chunk: &ChatCompletionChunk,
) {
    match serde_json::to_string(chunk) {
        Ok(json) => {
            let _ = tx.send(Ok(Event::default().data(json))).await;
        }
        Err(e) => {
            tracing::warn!("failed to serialize stream chunk: {e}");
        }
    }
}
