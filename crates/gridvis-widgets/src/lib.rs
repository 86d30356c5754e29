//! Grid renderer for the gridvis visual.
//!
//! [`render`] turns a normalized [`GridModel`](gridvis_core::GridModel),
//! the current settings and the selection into a [`GridView`]: a control
//! panel plus the grid table. The view is plain data. It renders to HTML and
//! maps UI [`Event`](gridvis_core::Event)s to
//! [`Intent`](gridvis_core::Intent)s; it never mutates state itself.

pub mod button;
pub mod control_panel;
pub mod grid_table;
pub mod select;
pub mod view;
pub mod widget;

pub use button::StyleButton;
pub use control_panel::ControlPanel;
pub use grid_table::{BodyRow, GridCell, GridTable, HeaderCell};
pub use select::{Select, SelectOption};
pub use view::{render, GridView};
pub use widget::{escape_html, Widget};
