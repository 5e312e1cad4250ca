//! Model selection state, kept free of I/O.
//!
//! [`ModelSelectionState`] is what the selector panel shows: the catalog the
//! server reported, which entry is selected, whether the panel is open and
//! the current search filter. It only changes in response to server replies,
//! panel events and the provisional selection made while a switch is in flight.

use crate::types::{ModelCatalog, ModelState};

/// Whether two model names refer to the same model.
///
/// Names match when one is a prefix of the other, so `llama3` matches
/// `llama3:latest`. An empty name never matches.
pub fn is_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.starts_with(b) || b.starts_with(a)
}

/// Pick the entry of `models` that reflects the server's selection.
///
/// The first model in list order matching any selected name wins. Without a
/// match the first model is used; an empty list yields `None`.
pub fn reconcile_selection<'a>(models: &'a [String], state: &ModelState) -> Option<&'a str> {
    let wanted = state.selections();
    models
        .iter()
        .find(|model| wanted.iter().any(|name| is_match(model, name)))
        .or_else(|| models.first())
        .map(String::as_str)
}

/// Whether the model list is visible.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Things that happen to the panel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// The toggle control was activated.
    Toggle,
    /// The panel was opened programmatically.
    Open,
    /// The user interacted with something outside the panel.
    OutsideClick,
    /// The user pressed Escape.
    Escape,
    /// A model switch succeeded.
    Selected,
}

impl PanelState {
    /// The state after `event`.
    pub fn next(self, event: PanelEvent) -> PanelState {
        match (self, event) {
            (PanelState::Closed, PanelEvent::Toggle) => PanelState::Open,
            (PanelState::Open, PanelEvent::Toggle) => PanelState::Closed,
            (_, PanelEvent::Open) => PanelState::Open,
            (_, PanelEvent::OutsideClick | PanelEvent::Escape | PanelEvent::Selected) => {
                PanelState::Closed
            }
        }
    }

    pub fn is_open(self) -> bool {
        self == PanelState::Open
    }
}

/// Where the catalog stands relative to the server.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum CatalogStatus {
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// One row of the model list as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorEntry {
    /// Model name.
    pub name: String,
    /// Whether this row is the active selection.
    pub selected: bool,
    /// Whether this row passes the search filter.
    pub visible: bool,
}

/// Everything a selector view needs to draw the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorSnapshot {
    /// Text of the toggle control.
    pub label: String,
    /// Whether the panel is open.
    pub panel: PanelState,
    /// Catalog status.
    pub catalog: CatalogStatus,
    /// Current search text.
    pub filter: String,
    /// All models in server order.
    pub entries: Vec<SelectorEntry>,
}

impl SelectorSnapshot {
    /// Rows that pass the search filter.
    pub fn visible(&self) -> impl Iterator<Item = &SelectorEntry> {
        self.entries.iter().filter(|entry| entry.visible)
    }

    /// Name of the selected row.
    pub fn selected(&self) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.selected)
            .map(|entry| entry.name.as_str())
    }
}

/// The model selector's state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelectionState {
    available: Vec<String>,
    selected: Vec<String>,
    panel: PanelState,
    catalog: CatalogStatus,
    filter: String,
}

impl ModelSelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Models in server order.
    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// The active selection, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.first().map(String::as_str)
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn catalog_status(&self) -> CatalogStatus {
        self.catalog
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Replace the catalog wholesale and reconcile the selection against it.
    pub fn apply_catalog(&mut self, catalog: ModelCatalog) {
        self.selected = reconcile_selection(&catalog.models, &catalog.state)
            .map(|name| vec![name.to_string()])
            .unwrap_or_default();
        self.available = catalog.models;
        self.catalog = CatalogStatus::Loaded;
    }

    /// Empty the catalog after the server could not provide one.
    pub fn fail_catalog(&mut self) {
        self.available.clear();
        self.selected.clear();
        self.catalog = CatalogStatus::Failed;
    }

    /// Reconcile the selection against the current catalog using `state`.
    pub fn reconcile(&mut self, state: &ModelState) {
        self.selected = reconcile_selection(&self.available, state)
            .map(|name| vec![name.to_string()])
            .unwrap_or_default();
    }

    /// Mark `name` as the sole selection while a switch is pending.
    ///
    /// Returns the previous selection so it can be restored if the switch fails.
    pub fn select_optimistic(&mut self, name: &str) -> Vec<String> {
        std::mem::replace(&mut self.selected, vec![name.to_string()])
    }

    /// Put back a selection returned by [`select_optimistic`](Self::select_optimistic).
    pub fn restore_selection(&mut self, previous: Vec<String>) {
        self.selected = previous;
    }

    pub fn apply_event(&mut self, event: PanelEvent) {
        self.panel = self.panel.next(event);
    }

    /// Set the search text. The catalog itself is untouched.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    fn passes_filter(&self, name: &str) -> bool {
        let needle = self.filter.trim().to_lowercase();
        needle.is_empty() || name.to_lowercase().contains(&needle)
    }

    /// Models that pass the search filter, in server order.
    pub fn visible_models(&self) -> Vec<&str> {
        self.available
            .iter()
            .map(String::as_str)
            .filter(|name| self.passes_filter(name))
            .collect()
    }

    /// The `position`-th visible model, counting from one.
    pub fn visible_at(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.visible_models().get(index).copied())
    }

    /// Text shown on the toggle control.
    pub fn label(&self) -> String {
        if let Some(selected) = self.selected() {
            return selected.to_string();
        }
        match self.catalog {
            CatalogStatus::Loading => "Loading models...".to_string(),
            CatalogStatus::Failed => "Models unavailable".to_string(),
            CatalogStatus::Loaded if self.available.is_empty() => {
                "No models available".to_string()
            }
            CatalogStatus::Loaded => "Select a model".to_string(),
        }
    }

    pub fn snapshot(&self) -> SelectorSnapshot {
        let entries = self
            .available
            .iter()
            .map(|name| SelectorEntry {
                name: name.clone(),
                selected: self.selected.iter().any(|s| s == name),
                visible: self.passes_filter(name),
            })
            .collect();
        SelectorSnapshot {
            label: self.label(),
            panel: self.panel,
            catalog: self.catalog,
            filter: self.filter.clone(),
            entries,
        }
    }
}
