//! Wire DTOs for the OpenAI-style completion API.
//!
//! Optional fields are omitted from JSON when unset so clients that treat
//! the schema strictly (and the `[DONE]`-terminated SSE stream) see
//! exactly the shapes they expect.

use chatrelay_core::{ChatMessage, FunctionCall};
use serde::{Deserialize, Serialize};

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

// ─────────────────────────────────────────────────────────────────────────────
// Model listing
// ─────────────────────────────────────────────────────────────────────────────

/// One advertised model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCard {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<Vec<serde_json::Value>>,
}

impl ModelCard {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: "model".to_string(),
            created: now_unix(),
            owned_by: "owner".to_string(),
            root: None,
            parent: None,
            permission: None,
        }
    }
}

/// The `GET /v1/models` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelCard>,
}

impl ModelList {
    #[must_use]
    pub fn new(ids: &[String]) -> Self {
        Self {
            object: "list".to_string(),
            data: ids.iter().map(ModelCard::new).collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Completion request/response
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for `POST /v1/chat/completions`.
///
/// Sampling parameters are accepted for schema compatibility and passed
/// through uninterpreted; the backend applies its own sampling.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub stream: bool,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub repetition_penalty: Option<f32>,
    #[serde(default)]
    pub tools: Option<serde_json::Value>,
}

/// Incremental message delta inside a stream chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeltaMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

/// Token usage accounting. The bridge has no tokenizer, so counts are
/// reported as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One choice of an aggregated completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

/// One choice of a stream chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    pub index: u32,
    pub delta: DeltaMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The aggregated (non-streaming) completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub model: String,
    pub id: String,
    pub object: String,
    pub created: i64,
    pub choices: Vec<ChatChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageInfo>,
}

impl ChatCompletionResponse {
    /// Build the single-choice aggregate response for `content`.
    #[must_use]
    pub fn aggregated(model: &str, id: String, message: ChatMessage) -> Self {
        Self {
            model: model.to_string(),
            id,
            object: "chat.completion".to_string(),
            created: now_unix(),
            choices: vec![ChatChoice {
                index: 0,
                message,
                finish_reason: "stop".to_string(),
            }],
            usage: Some(UsageInfo::default()),
        }
    }
}

/// One SSE chunk of a streamed completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub model: String,
    pub id: String,
    pub object: String,
    pub created: i64,
    pub choices: Vec<StreamChoice>,
}

impl ChatCompletionChunk {
    /// Chunk carrying one token of generated text.
    #[must_use]
    pub fn delta(model: &str, id: &str, content: String) -> Self {
        Self::build(model, id, Some(content), None)
    }

    /// Terminal chunk: empty content, `finish_reason: "stop"`.
    #[must_use]
    pub fn finished(model: &str, id: &str) -> Self {
        Self::build(model, id, Some(String::new()), Some("stop".to_string()))
    }

    fn build(model: &str, id: &str, content: Option<String>, finish_reason: Option<String>) -> Self {
        Self {
            model: model.to_string(),
            id: id.to_string(),
            object: "chat.completion.chunk".to_string(),
            created: now_unix(),
            choices: vec![StreamChoice {
                index: 0,
                delta: DeltaMessage {
                    role: Some("assistant".to_string()),
                    content,
                    function_call: None,
                },
                finish_reason,
            }],
        }
    }
}
