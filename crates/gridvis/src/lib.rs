//! gridvis: an interactive, style-configurable grid visual for a host
//! dashboard.
//!
//! The host drives a [`VisualController`] through `update`,
//! `get_formatting_model` and `destroy`. Host capabilities (selection
//! identity, selection manager, property persistence) are consumed through
//! the [`HostServices`] trait.
//!
//! ```
//! use std::sync::Arc;
//! use gridvis::{HostError, HostServices, PersistRequest, SelectFuture, SelectionId, VisualController};
//! use gridvis::core::{HierarchyLevels, MatrixNode, VisualUpdateOptions};
//!
//! struct NullHost;
//!
//! impl HostServices for NullHost {
//!     fn create_selection_id(&self, node: &MatrixNode, _: &HierarchyLevels) -> Result<SelectionId, HostError> {
//!         Ok(SelectionId::new(node.label()))
//!     }
//!     fn select(&self, _: SelectionId) -> SelectFuture {
//!         Box::pin(async { Ok(()) })
//!     }
//!     fn persist_properties(&self, _: PersistRequest) {}
//! }
//!
//! let mut visual = VisualController::new(Arc::new(NullHost));
//! visual.update(&VisualUpdateOptions::default()).unwrap();
//! assert!(visual.model().is_empty());
//! ```

pub mod error;
pub mod formatting;
pub mod host;
pub mod selection;
pub mod visual;

pub use gridvis_core as core;
pub use gridvis_widgets as widgets;
pub use gridvis_yaml as yaml;

pub use error::{HostError, VisualError};
pub use formatting::{FormattingCard, FormattingModel, FormattingSlice, PropertyDescriptor, SliceItem};
pub use host::{
    read_settings_override, HostServices, PersistRequest, PersistedObject, SelectFuture, SelectionId,
};
pub use selection::{SelectionController, SelectionOutcome, SelectionTask};
pub use visual::{Lifecycle, Message, PendingTask, VisualController};
