//! YAML visual manifest for gridvis.
//!
//! The manifest configures one visual: the host object names it reads and
//! persists, the compiled-in default settings, per-mode heading defaults and
//! the formatting cards exposed to the host's settings pane.

mod error;
mod manifest;

pub use error::ManifestError;
pub use manifest::{
    CardConfig, HeadingConfig, Headings, Manifest, SettingField, SliceConfig, SliceKind,
    BUILTIN_MANIFEST,
};
