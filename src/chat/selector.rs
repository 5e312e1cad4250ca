use std::sync::Arc;

use crate::backend::Backend;
use crate::chat::config::ChatConfig;
use crate::chat::selection::{ModelSelectionState, PanelEvent};
use crate::chat::status::StatusBar;
use crate::chat::view::{SharedSelectorView, lock};
use crate::error::Error;
use crate::observability::{
    MODEL_FETCH_ERRORS, MODEL_FETCHES, MODEL_SELECTION_ERRORS, MODEL_SELECTIONS,
};
use crate::types::SelectModelRequest;

/// Lets the user see and switch the model that answers questions.
///
/// Owns the selection state; every change is pushed to the selector view.
pub struct ModelSelector {
    backend: Arc<dyn Backend>,
    view: SharedSelectorView,
    status: StatusBar,
    state: ModelSelectionState,
}

impl ModelSelector {
    pub fn new(backend: Arc<dyn Backend>, view: SharedSelectorView, config: &ChatConfig) -> Self {
        let status = StatusBar::new(Arc::clone(&view), config.status_clear_after);
        Self {
            backend,
            view,
            status,
            state: ModelSelectionState::new(),
        }
    }

    pub fn state(&self) -> &ModelSelectionState {
        &self.state
    }

    pub fn status(&self) -> &StatusBar {
        &self.status
    }

    /// Load the catalog from the server and rebuild the panel.
    ///
    /// On failure the catalog is left empty and an error status is shown.
    pub async fn fetch_models(&mut self) -> bool {
        MODEL_FETCHES.click();
        match self.backend.list_models().await {
            Ok(catalog) => {
                tracing::debug!(count = catalog.models.len(), "model catalog loaded");
                self.state.apply_catalog(catalog);
                self.render();
                self.status.clear_errors();
                true
            }
            Err(err) => {
                MODEL_FETCH_ERRORS.click();
                tracing::warn!(error = %err, "failed to load models");
                self.state.fail_catalog();
                self.render();
                self.status.error(failure_text("Failed to load models", &err));
                false
            }
        }
    }

    /// Switch the backend to `name`.
    ///
    /// The panel shows `name` as selected right away. If the server accepts
    /// the change the selection is reconciled with its answer, the panel
    /// closes and the catalog is reloaded. If it refuses, the previous
    /// selection comes back and an error status explains why.
    pub async fn select_model(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        MODEL_SELECTIONS.click();
        let previous = self.state.select_optimistic(name);
        self.render();

        match self
            .backend
            .select_model(&SelectModelRequest::new(name))
            .await
        {
            Ok(state) => {
                self.state.reconcile(&state);
                self.state.apply_event(PanelEvent::Selected);
                self.render();
                let active = self.state.selected().unwrap_or(name).to_string();
                tracing::info!(model = %active, "model switched");
                self.status.info(format!("Model switched to {active}"));
                self.fetch_models().await;
                true
            }
            Err(err) => {
                MODEL_SELECTION_ERRORS.click();
                tracing::warn!(error = %err, model = %name, "failed to switch model");
                self.state.restore_selection(previous);
                self.render();
                self.status.error(failure_text("Failed to switch model", &err));
                false
            }
        }
    }

    /// Switch to the `position`-th visible entry, counting from one.
    pub async fn select_position(&mut self, position: usize) -> bool {
        match self.state.visible_at(position).map(str::to_string) {
            Some(name) => self.select_model(&name).await,
            None => {
                self.status
                    .error(format!("There is no model number {position} in the list"));
                false
            }
        }
    }

    pub fn toggle_panel(&mut self) {
        self.handle_event(PanelEvent::Toggle);
    }

    pub fn open_panel(&mut self) {
        self.handle_event(PanelEvent::Open);
    }

    /// Close the panel as if Escape was pressed.
    pub fn close_panel(&mut self) {
        self.handle_event(PanelEvent::Escape);
    }

    pub fn handle_event(&mut self, event: PanelEvent) {
        let before = self.state.panel();
        self.state.apply_event(event);
        if self.state.panel() != before {
            self.render();
        }
    }

    /// Filter the visible entries; an empty query shows everything.
    pub fn search(&mut self, query: &str) {
        self.state.set_filter(query.trim());
        self.render();
    }

    fn render(&self) {
        let snapshot = self.state.snapshot();
        lock(&self.view).render_selector(&snapshot);
    }
}

fn failure_text(prefix: &str, err: &Error) -> String {
    match err.server_message() {
        Some(message) => format!("{prefix}: {message}"),
        None => format!("{prefix}: the server could not be reached"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::selection::{CatalogStatus, PanelState};
    use crate::chat::status::StatusKind;
    use crate::chat::test_support::ScriptedBackend;
    use crate::chat::view::MemoryView;
    use crate::types::{ModelCatalog, ModelState};

    fn catalog(models: &[&str], selected: &str) -> ModelCatalog {
        ModelCatalog::new(
            models.iter().map(|s| s.to_string()).collect(),
            ModelState::single(selected),
        )
    }

    fn selector(
        backend: &Arc<ScriptedBackend>,
        memory: &Arc<std::sync::Mutex<MemoryView>>,
    ) -> ModelSelector {
        ModelSelector::new(backend.clone(), memory.clone(), &ChatConfig::default())
    }

    #[tokio::test]
    async fn fetch_renders_catalog() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_catalog(Ok(catalog(&["m1", "m2"], "m2")));
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);

        assert!(selector.fetch_models().await);
        let view = memory.lock().unwrap();
        let snapshot = view.selector().unwrap();
        let names: Vec<&str> = snapshot.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["m1", "m2"]);
        assert_eq!(snapshot.selected(), Some("m2"));
        assert_eq!(snapshot.label, "m2");
        assert!(view.status().is_none());
    }

    #[tokio::test]
    async fn empty_catalog_is_not_an_error() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_catalog(Ok(ModelCatalog::default()));
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);

        assert!(selector.fetch_models().await);
        let view = memory.lock().unwrap();
        assert_eq!(view.selector().unwrap().label, "No models available");
        assert!(view.status().is_none());
    }

    #[tokio::test]
    async fn fetch_failure_shows_error() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_catalog(Err(Error::server(Some(500), "ollama is down")));
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);

        assert!(!selector.fetch_models().await);
        assert_eq!(selector.state().catalog_status(), CatalogStatus::Failed);
        let view = memory.lock().unwrap();
        let status = view.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Failed to load models: ollama is down");
        assert!(view.selector().unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn fetch_recovery_clears_error() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_catalog(Err(Error::connection("connection refused", None)));
        backend.push_catalog(Ok(ModelCatalog::default()));
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);

        assert!(!selector.fetch_models().await);
        assert!(memory.lock().unwrap().status().unwrap().is_error());

        assert!(selector.fetch_models().await);
        assert!(selector.status().current().is_none());
        let view = memory.lock().unwrap();
        assert!(view.status().is_none());
        assert_eq!(view.selector().unwrap().label, "No models available");
    }

    #[tokio::test(start_paused = true)]
    async fn successful_switch_closes_and_refreshes() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_catalog(Ok(catalog(&["m1", "m2"], "m2")));
        backend.push_selection(Ok(ModelState::single("m1")));
        backend.push_catalog(Ok(catalog(&["m1", "m2"], "m1")));
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);

        selector.fetch_models().await;
        selector.toggle_panel();
        assert_eq!(selector.state().panel(), PanelState::Open);

        assert!(selector.select_model("m1").await);
        assert_eq!(backend.select_requests()[0].llm_model, "m1");
        assert_eq!(backend.list_calls(), 2);
        assert_eq!(selector.state().selected(), Some("m1"));
        assert_eq!(selector.state().panel(), PanelState::Closed);

        let status = selector.status().current().unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        assert_eq!(status.text, "Model switched to m1");

        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        assert!(memory.lock().unwrap().status().is_none());
    }

    #[tokio::test]
    async fn failed_switch_reverts_selection() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_catalog(Ok(catalog(&["m1", "m2"], "m2")));
        backend.push_selection(Err(Error::connection("connection refused", None)));
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);

        selector.fetch_models().await;
        selector.toggle_panel();
        assert!(!selector.select_model("m1").await);

        assert_eq!(selector.state().selected(), Some("m2"));
        assert_eq!(selector.state().panel(), PanelState::Open);
        assert_eq!(backend.list_calls(), 1);
        let view = memory.lock().unwrap();
        assert_eq!(view.selector().unwrap().selected(), Some("m2"));
        let status = view.status().unwrap();
        assert!(status.is_error());
        assert_eq!(
            status.text,
            "Failed to switch model: the server could not be reached"
        );
    }

    #[tokio::test]
    async fn server_refusal_uses_its_message() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_catalog(Ok(catalog(&["m1"], "m1")));
        backend.push_selection(Err(Error::server(Some(400), "llm_model must be a string")));
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);

        selector.fetch_models().await;
        assert!(!selector.select_model("m1").await);
        assert_eq!(
            selector.status().current().map(|s| s.text),
            Some("Failed to switch model: llm_model must be a string".to_string())
        );
    }

    #[tokio::test]
    async fn select_by_position_uses_visible_entries() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_catalog(Ok(catalog(&["llama3", "mistral", "llama2"], "llama3")));
        backend.push_selection(Ok(ModelState::single("llama2")));
        backend.push_catalog(Ok(catalog(&["llama3", "mistral", "llama2"], "llama2")));
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);

        selector.fetch_models().await;
        selector.search("llama");
        assert!(selector.select_position(2).await);
        assert_eq!(backend.select_requests()[0].llm_model, "llama2");

        assert!(!selector.select_position(9).await);
        assert_eq!(backend.select_requests().len(), 1);
    }

    #[tokio::test]
    async fn blank_names_are_ignored() {
        let backend = Arc::new(ScriptedBackend::new());
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);
        assert!(!selector.select_model("  ").await);
        assert!(backend.select_requests().is_empty());
    }

    #[tokio::test]
    async fn panel_events_render() {
        let backend = Arc::new(ScriptedBackend::new());
        let memory = MemoryView::shared();
        let mut selector = selector(&backend, &memory);

        selector.open_panel();
        assert_eq!(memory.lock().unwrap().selector().unwrap().panel, PanelState::Open);
        selector.handle_event(PanelEvent::OutsideClick);
        assert_eq!(memory.lock().unwrap().selector().unwrap().panel, PanelState::Closed);
        selector.toggle_panel();
        selector.close_panel();
        assert_eq!(selector.state().panel(), PanelState::Closed);
    }
}
