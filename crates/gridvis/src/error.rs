//! Error types for the visual and its host capabilities.

use thiserror::Error;

/// A failed host capability call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The identity builder could not produce an identity
    #[error("selection identity unavailable: {0}")]
    Identity(String),

    /// The selection manager rejected the selection
    #[error("selection rejected: {0}")]
    Select(String),
}

/// Errors surfaced by the visual controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisualError {
    /// Lifecycle call after `destroy`
    #[error("visual has been destroyed")]
    Destroyed,

    /// Selection of a row that does not exist
    #[error("row {index} out of range ({rows} rows)")]
    RowOutOfRange {
        /// Requested row
        index: usize,
        /// Rows in the current model
        rows: usize,
    },

    /// Selection of a row without a selection affordance
    #[error("row {0} is not selectable")]
    NotSelectable(usize),

    /// Host capability failure
    #[error(transparent)]
    Host(#[from] HostError),
}
