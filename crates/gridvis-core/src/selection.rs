//! Row selection state.

use serde::{Deserialize, Serialize};

/// Which row, if any, is highlighted.
///
/// The index is positional within the current row sequence and is cleared
/// whenever that sequence is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    /// Selected row position
    pub selected_row_index: Option<usize>,
}

impl SelectionState {
    /// Selection of a single row.
    #[must_use]
    pub const fn row(index: usize) -> Self {
        Self {
            selected_row_index: Some(index),
        }
    }

    /// Mark a row as selected, replacing any previous selection.
    pub fn select(&mut self, index: usize) {
        self.selected_row_index = Some(index);
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected_row_index = None;
    }

    /// Whether a given row is the selected one.
    #[must_use]
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected_row_index == Some(index)
    }
}
