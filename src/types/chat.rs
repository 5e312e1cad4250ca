use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Envelope;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question.
    pub query: String,

    /// Sampling temperature forwarded to the backend model.
    pub temperature: f32,
}

impl ChatRequest {
    /// Create a new `ChatRequest`.
    pub fn new(query: impl Into<String>, temperature: f32) -> Self {
        Self {
            query: query.into(),
            temperature,
        }
    }
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Whether the backend produced an answer.
    pub success: bool,

    /// The answer: usually a string, occasionally a structured object.
    /// Absent and `null` answers are both `Value::Null`.
    #[serde(default)]
    pub response: Value,

    /// Error text on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope for ChatResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// A successful answer from the chat endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    payload: Value,
}

impl ChatReply {
    /// Wrap an answer payload.
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Wrap a plain-text answer.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: Value::String(text.into()),
        }
    }

    /// The text to display: strings verbatim, anything else as indented JSON.
    pub fn into_text(self) -> String {
        match self.payload {
            Value::String(text) => text,
            other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
        }
    }
}
