#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_precision_loss)]
//! Testing support for gridvis.
//!
//! - [`FakeHost`]: an in-memory [`HostServices`](gridvis::HostServices)
//!   that records persisted properties and selections.
//! - Data view builders and TOML fixtures.
//!
//! ```
//! use std::sync::Arc;
//! use gridvis::VisualController;
//! use gridvis_test::{FakeHost, Fixtures};
//!
//! let host = Arc::new(FakeHost::new());
//! let mut visual = VisualController::new(host.clone());
//! visual.update(&Fixtures::sales_matrix().to_options()).unwrap();
//! assert_eq!(visual.model().row_count(), 5);
//! ```

pub mod fake_host;
pub mod fixture;

pub use fake_host::FakeHost;
pub use fixture::{
    DataViewBuilder, DataViewFixture, FixtureError, Fixtures, MatrixBuilder, TableBuilder,
};
