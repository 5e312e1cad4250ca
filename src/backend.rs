//! The seam between the chat components and the HTTP backend.
//!
//! [`ChatSession`](crate::chat::ChatSession) and
//! [`ModelSelector`](crate::chat::ModelSelector) only talk to a `Backend`, so
//! they can be driven by [`ChatClient`] in production and by an in-memory
//! script in tests.

use crate::client::ChatClient;
use crate::error::Result;
use crate::types::{ChatReply, ChatRequest, ModelCatalog, ModelState, SelectModelRequest};

/// Operations the chat client needs from the server.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Ask a question and return the answer.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// List available models and the current selection.
    async fn list_models(&self) -> Result<ModelCatalog>;

    /// Switch the active model and return the authoritative selection.
    async fn select_model(&self, request: &SelectModelRequest) -> Result<ModelState>;
}

#[async_trait::async_trait]
impl Backend for ChatClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        ChatClient::chat(self, request).await
    }

    async fn list_models(&self) -> Result<ModelCatalog> {
        ChatClient::list_models(self).await
    }

    async fn select_model(&self, request: &SelectModelRequest) -> Result<ModelState> {
        ChatClient::select_model(self, request).await
    }
}
