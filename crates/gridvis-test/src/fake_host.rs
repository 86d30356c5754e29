//! In-memory host for driving a visual in tests.

use gridvis::{HostError, HostServices, PersistRequest, SelectFuture, SelectionId};
use gridvis::yaml::Manifest;
use gridvis_core::{DataView, HierarchyLevels, MatrixNode, SettingsOverride};
use serde_json::{Map, Value};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct FakeHostState {
    persisted: Vec<PersistRequest>,
    selections: Vec<SelectionId>,
    fail_identity: bool,
    reject_selects: bool,
    declared: Option<Option<SettingsOverride>>,
}

/// Host that records every call.
///
/// Identities are the node's `identity` token when present, else
/// `row:<label>`. Selections resolve immediately.
#[derive(Debug, Default)]
pub struct FakeHost {
    state: Mutex<FakeHostState>,
}

impl FakeHost {
    /// Create a host that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make identity resolution fail.
    #[must_use]
    pub fn failing_identity(self) -> Self {
        self.state.lock().unwrap().fail_identity = true;
        self
    }

    /// Make the selection manager reject every selection.
    #[must_use]
    pub fn rejecting_selects(self) -> Self {
        self.state.lock().unwrap().reject_selects = true;
        self
    }

    /// Declare a fixed settings override instead of reading metadata.
    ///
    /// `None` declares that the host has no override at all.
    #[must_use]
    pub fn declaring(self, patch: Option<SettingsOverride>) -> Self {
        self.state.lock().unwrap().declared = Some(patch);
        self
    }

    /// Every persistence request so far.
    pub fn persisted(&self) -> Vec<PersistRequest> {
        self.state.lock().unwrap().persisted.clone()
    }

    /// Number of persistence requests.
    pub fn persist_count(&self) -> usize {
        self.state.lock().unwrap().persisted.len()
    }

    /// Properties of the latest request touching an object.
    pub fn last_persisted(&self, object: &str) -> Option<Map<String, Value>> {
        self.state
            .lock()
            .unwrap()
            .persisted
            .iter()
            .rev()
            .find_map(|request| request.object(object).cloned())
    }

    /// Identities handed to the selection manager.
    pub fn selections(&self) -> Vec<SelectionId> {
        self.state.lock().unwrap().selections.clone()
    }

    /// Copy the latest persisted properties into a data view's metadata,
    /// as the host does on its next update.
    pub fn round_trip(&self, view: &mut DataView, object: &str) {
        if let Some(props) = self.last_persisted(object) {
            view.metadata
                .objects
                .entry(object.to_string())
                .or_default()
                .extend(props);
        }
    }
}

impl HostServices for FakeHost {
    fn create_selection_id(
        &self,
        node: &MatrixNode,
        _levels: &HierarchyLevels,
    ) -> Result<SelectionId, HostError> {
        if self.state.lock().unwrap().fail_identity {
            return Err(HostError::Identity(format!("no identity for '{}'", node.label())));
        }
        Ok(node
            .identity
            .clone()
            .map_or_else(|| SelectionId::new(format!("row:{}", node.label())), SelectionId::new))
    }

    fn select(&self, id: SelectionId) -> SelectFuture {
        let mut state = self.state.lock().unwrap();
        let reject = state.reject_selects;
        state.selections.push(id.clone());
        Box::pin(async move {
            if reject {
                Err(HostError::Select(id.to_string()))
            } else {
                Ok(())
            }
        })
    }

    fn persist_properties(&self, request: PersistRequest) {
        self.state.lock().unwrap().persisted.push(request);
    }

    fn populate_formatting_settings(
        &self,
        manifest: &Manifest,
        view: &DataView,
    ) -> Option<SettingsOverride> {
        match &self.state.lock().unwrap().declared {
            Some(declared) => declared.clone(),
            None => gridvis::read_settings_override(manifest, view),
        }
    }
}
