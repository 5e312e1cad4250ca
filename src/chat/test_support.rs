//! A scripted backend for exercising the chat components without a server.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::Backend;
use crate::chat::view::{MemoryView, lock};
use crate::error::{Error, Result};
use crate::types::{ChatReply, ChatRequest, ModelCatalog, ModelState, SelectModelRequest};

/// What the view looked like while a chat request was in flight.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Observation {
    pub placeholders: usize,
    pub input_enabled: bool,
}

/// Replays queued responses and records the requests it receives.
///
/// An exhausted queue answers with a connection error.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    chats: Mutex<VecDeque<Result<ChatReply>>>,
    catalogs: Mutex<VecDeque<Result<ModelCatalog>>>,
    selections: Mutex<VecDeque<Result<ModelState>>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    select_requests: Mutex<Vec<SelectModelRequest>>,
    list_calls: AtomicUsize,
    observed: Option<Arc<Mutex<MemoryView>>>,
    observations: Mutex<Vec<Observation>>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state of `view` whenever a chat request arrives.
    pub fn observing(mut self, view: Arc<Mutex<MemoryView>>) -> Self {
        self.observed = Some(view);
        self
    }

    /// Sleep before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn observed(&self) -> Option<Arc<Mutex<MemoryView>>> {
        self.observed.clone()
    }

    pub fn push_chat(&self, reply: Result<ChatReply>) {
        lock(&self.chats).push_back(reply);
    }

    pub fn push_catalog(&self, catalog: Result<ModelCatalog>) {
        lock(&self.catalogs).push_back(catalog);
    }

    pub fn push_selection(&self, state: Result<ModelState>) {
        lock(&self.selections).push_back(state);
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        lock(&self.chat_requests).clone()
    }

    pub fn select_requests(&self) -> Vec<SelectModelRequest> {
        lock(&self.select_requests).clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    pub fn observations(&self) -> Vec<Observation> {
        lock(&self.observations).clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn exhausted(what: &str) -> Error {
    Error::connection(format!("no scripted {what}"), None)
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        lock(&self.chat_requests).push(request.clone());
        if let Some(view) = &self.observed {
            let view = lock(view);
            lock(&self.observations).push(Observation {
                placeholders: view.placeholder_count(),
                input_enabled: view.input_enabled(),
            });
        }
        self.pause().await;
        let next = lock(&self.chats).pop_front();
        next.unwrap_or_else(|| Err(exhausted("chat reply")))
    }

    async fn list_models(&self) -> Result<ModelCatalog> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        self.pause().await;
        let next = lock(&self.catalogs).pop_front();
        next.unwrap_or_else(|| Err(exhausted("catalog")))
    }

    async fn select_model(&self, request: &SelectModelRequest) -> Result<ModelState> {
        lock(&self.select_requests).push(request.clone());
        self.pause().await;
        let next = lock(&self.selections).pop_front();
        next.unwrap_or_else(|| Err(exhausted("selection")))
    }
}
