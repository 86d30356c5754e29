//! Host capabilities consumed by the visual.

use crate::error::HostError;
use futures::future::BoxFuture;
use gridvis_core::{DataView, HierarchyLevels, MatrixNode, PersistedSettings, SettingsOverride};
use gridvis_yaml::Manifest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stable host-recognized handle for a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionId(String);

impl SelectionId {
    /// Wrap a host identity token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The identity token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pending result of a host selection call.
pub type SelectFuture = BoxFuture<'static, Result<(), HostError>>;

/// One object in a persistence request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedObject {
    /// Object name the properties belong to
    pub object_name: String,
    /// Flat key/value properties
    pub properties: Map<String, Value>,
}

/// A `persistProperties` request: objects merged into host storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistRequest {
    /// Objects to merge
    pub merge: Vec<PersistedObject>,
}

impl PersistRequest {
    /// Request persisting the settings under one object.
    #[must_use]
    pub fn settings(object_name: impl Into<String>, settings: &PersistedSettings) -> Self {
        Self {
            merge: vec![PersistedObject {
                object_name: object_name.into(),
                properties: settings.to_properties(),
            }],
        }
    }

    /// Properties merged into an object, if the request touches it.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.merge
            .iter()
            .find(|o| o.object_name == name)
            .map(|o| &o.properties)
    }
}

/// Capabilities the host provides to a visual instance.
///
/// Implementations must be cheap to call; `persist_properties` is
/// fire-and-forget and the only asynchronous call is `select`.
pub trait HostServices: Send + Sync {
    /// Build a stable identity for a matrix row.
    fn create_selection_id(
        &self,
        node: &MatrixNode,
        levels: &HierarchyLevels,
    ) -> Result<SelectionId, HostError>;

    /// Hand an identity to the host selection manager.
    ///
    /// Toggling and deduplication of repeated selections happen host-side.
    fn select(&self, id: SelectionId) -> SelectFuture;

    /// Merge properties into host storage.
    fn persist_properties(&self, request: PersistRequest);

    /// Read the host-declared settings override for a data view.
    ///
    /// Returns `None` when the host declares nothing.
    fn populate_formatting_settings(
        &self,
        manifest: &Manifest,
        view: &DataView,
    ) -> Option<SettingsOverride> {
        read_settings_override(manifest, view)
    }
}

/// Read the round-tripped settings object from data view metadata.
#[must_use]
pub fn read_settings_override(manifest: &Manifest, view: &DataView) -> Option<SettingsOverride> {
    let props = view.metadata.object(&manifest.settings_object)?;
    let patch = SettingsOverride::from_properties(props);
    (!patch.is_empty()).then_some(patch)
}
