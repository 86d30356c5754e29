//! Row selection through the host selection manager.
//!
//! Selecting a row is the only asynchronous step of the visual. A request
//! captures the current epoch; [`SelectionController::reset`] bumps the epoch
//! on every refresh so a request that resolves afterwards is discarded.

use crate::error::{HostError, VisualError};
use crate::host::HostServices;
use gridvis_core::{GridModel, SelectionState};
use std::future::Future;
use std::pin::Pin;

/// Result of a selection request, fed back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Epoch captured when the request was made
    pub epoch: u64,
    /// Requested row
    pub row: usize,
    /// Host answer
    pub result: Result<(), HostError>,
}

/// A selection request in flight.
pub type SelectionTask = Pin<Box<dyn Future<Output = SelectionOutcome> + Send>>;

/// Tracks the highlighted row and guards late selection results.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    epoch: u64,
}

impl SelectionController {
    /// Create a controller with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Current epoch.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Clear the selection and start a new epoch. Returns the new epoch.
    pub fn reset(&mut self) -> u64 {
        self.state.clear();
        self.epoch = self.epoch.wrapping_add(1);
        self.epoch
    }

    /// Start selecting a row.
    ///
    /// Builds the row identity synchronously, then returns a task that
    /// resolves once the host selection manager answers. The selection state
    /// is not touched until [`complete`](Self::complete) accepts the outcome.
    pub fn select_row<H>(
        &self,
        host: &H,
        model: &GridModel,
        row: usize,
    ) -> Result<SelectionTask, VisualError>
    where
        H: HostServices + ?Sized,
    {
        let record = model.row(row).ok_or(VisualError::RowOutOfRange {
            index: row,
            rows: model.row_count(),
        })?;
        let node = record.node().ok_or(VisualError::NotSelectable(row))?;
        let id = host.create_selection_id(node, &model.levels)?;

        tracing::trace!(target: "gridvis::selection", row, epoch = self.epoch, %id, "selecting row");
        let epoch = self.epoch;
        let pending = host.select(id);
        Ok(Box::pin(async move {
            SelectionOutcome {
                epoch,
                row,
                result: pending.await,
            }
        }))
    }

    /// Apply a finished request. Returns whether the selection changed.
    ///
    /// Outcomes from an older epoch, for rows no longer present, or that the
    /// host rejected leave the state unchanged.
    pub fn complete(&mut self, outcome: SelectionOutcome, row_count: usize) -> bool {
        if outcome.epoch != self.epoch {
            tracing::debug!(
                target: "gridvis::selection",
                row = outcome.row,
                stale_epoch = outcome.epoch,
                epoch = self.epoch,
                "discarding stale selection"
            );
            return false;
        }
        if outcome.row >= row_count {
            tracing::warn!(
                target: "gridvis::selection",
                row = outcome.row,
                rows = row_count,
                "discarding selection outside current rows"
            );
            return false;
        }
        if let Err(err) = outcome.result {
            tracing::warn!(target: "gridvis::selection", row = outcome.row, "selection failed: {}", err);
            return false;
        }
        self.state.select(outcome.row);
        true
    }
}
