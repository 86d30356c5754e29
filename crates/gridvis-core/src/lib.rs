//! Core types for the gridvis dashboard grid.
//!
//! This crate provides the pieces of the grid pipeline that carry invariants:
//! - Host payload types: [`DataView`], [`Matrix`], [`Table`], [`CellValue`]
//! - Shape normalization: [`RawInput`], [`normalize`], [`GridModel`]
//! - Numeric display: [`Scaling`], [`format_value`]
//! - Settings reducer and store: [`FormattingSettings`], [`SettingsIntent`], [`Store`]
//! - Selection and UI events: [`SelectionState`], [`Event`], [`Intent`]

mod data;
mod error;
mod event;
mod format;
mod normalize;
mod selection;
mod settings;
mod state;

pub use data::{
    CellValue, DataView, DataViewMetadata, DataViewObject, HierarchyLevel, HierarchyLevels,
    LevelSource, LevelValue, Matrix, MatrixHierarchy, MatrixNode, MatrixValue, Table,
    TableColumnMeta, VisualUpdateOptions,
};
pub use error::UnknownVariant;
pub use event::{Event, Intent, Target};
pub use format::{format_number, format_value, parse_numeric, Scaling};
pub use normalize::{
    normalize, ColumnDescriptor, FlatRow, GridMode, GridModel, MatrixRow, RawInput, RowRecord,
};
pub use selection::SelectionState;
pub use settings::{
    FormattingSettings, PersistedSettings, SettingsIntent, SettingsOverride, SettingsStore,
    StyleFlag, Theme, DEFAULT_TITLE,
};
pub use state::{Command, State, Store};
