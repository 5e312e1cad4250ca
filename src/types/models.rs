use serde::{Deserialize, Serialize};

use crate::types::Envelope;

/// The backend's record of which model answers chat requests.
///
/// Older backends report a single `llm_model`; newer ones report a list in
/// `llm_models`. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelState {
    /// The single active model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,

    /// The active models, primary first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_models: Option<Vec<String>>,
}

impl ModelState {
    /// A state naming exactly one model.
    pub fn single(model: impl Into<String>) -> Self {
        Self {
            llm_model: Some(model.into()),
            llm_models: None,
        }
    }

    /// The server's current selection: `llm_models` when non-empty, else `llm_model`.
    pub fn selections(&self) -> Vec<&str> {
        match &self.llm_models {
            Some(models) if !models.is_empty() => models.iter().map(String::as_str).collect(),
            _ => self.llm_model.iter().map(String::as_str).collect(),
        }
    }
}

/// Response of `GET /models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Whether the listing succeeded.
    pub success: bool,

    /// Available model names in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,

    /// The current server-side selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ModelState>,

    /// Error text on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope for ModelsResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// The models the server offers together with its current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelCatalog {
    /// Available model names in display order.
    pub models: Vec<String>,

    /// The current server-side selection.
    pub state: ModelState,
}

impl ModelCatalog {
    /// Create a new `ModelCatalog`.
    pub fn new(models: Vec<String>, state: ModelState) -> Self {
        Self { models, state }
    }
}

impl From<ModelsResponse> for ModelCatalog {
    fn from(response: ModelsResponse) -> Self {
        Self {
            models: response.models.unwrap_or_default(),
            state: response.state.unwrap_or_default(),
        }
    }
}

/// Body of `POST /models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectModelRequest {
    /// The model the backend should switch to.
    pub llm_model: String,
}

impl SelectModelRequest {
    /// Create a new `SelectModelRequest`.
    pub fn new(llm_model: impl Into<String>) -> Self {
        Self {
            llm_model: llm_model.into(),
        }
    }
}

/// Response of `POST /models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectModelResponse {
    /// Whether the backend applied the model.
    pub success: bool,

    /// The authoritative selection after the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ModelState>,

    /// Error text on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope for SelectModelResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
