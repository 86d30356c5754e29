//! Visual manifest types.

use crate::error::ManifestError;
use gridvis_core::{FormattingSettings, GridMode, PersistedSettings};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The manifest shipped with the crate, loaded by [`Manifest::builtin`].
pub const BUILTIN_MANIFEST: &str = include_str!("visual.yaml");

/// Visual manifest loaded from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Visual name registered with the host
    pub visual: String,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Host API version the visual targets
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Object name settings are persisted under
    #[serde(default = "default_settings_object")]
    pub settings_object: String,
    /// Heading configuration
    #[serde(default)]
    pub headings: HeadingConfig,
    /// Compiled-in default settings
    #[serde(default)]
    pub defaults: PersistedSettings,
    /// Formatting cards exposed to the host settings pane
    #[serde(default)]
    pub cards: Vec<CardConfig>,
}

fn default_api_version() -> String {
    "5.3.0".to_string()
}

fn default_settings_object() -> String {
    "visualSettings".to_string()
}

/// Where headings come from and what they default to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingConfig {
    /// Metadata object holding the heading properties
    #[serde(default = "default_heading_object")]
    pub object: String,
    /// Title property name
    #[serde(default = "default_title_property")]
    pub title_property: String,
    /// Subtitle property name
    #[serde(default = "default_subtitle_property")]
    pub subtitle_property: String,
    /// Defaults for matrix input
    #[serde(default = "Headings::matrix")]
    pub matrix: Headings,
    /// Defaults for table input
    #[serde(default = "Headings::table")]
    pub table: Headings,
}

fn default_heading_object() -> String {
    "demoSection".to_string()
}

fn default_title_property() -> String {
    "title".to_string()
}

fn default_subtitle_property() -> String {
    "subTitle".to_string()
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            object: default_heading_object(),
            title_property: default_title_property(),
            subtitle_property: default_subtitle_property(),
            matrix: Headings::matrix(),
            table: Headings::table(),
        }
    }
}

/// A title/subtitle pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    /// Title text
    pub title: String,
    /// Subtitle text
    pub subtitle: String,
}

impl Headings {
    /// Create a heading pair.
    #[must_use]
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Defaults for matrix input.
    #[must_use]
    pub fn matrix() -> Self {
        Self::new("Table", "Matrix")
    }

    /// Defaults for table input.
    #[must_use]
    pub fn table() -> Self {
        Self::new("Table", "Table Sub Title")
    }
}

/// A formatting card in the host settings pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    /// Card (object) name
    pub name: String,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Slices shown on the card
    #[serde(default)]
    pub slices: Vec<SliceConfig>,
}

/// One control on a formatting card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceConfig {
    /// Settings field the slice edits
    pub field: SettingField,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Placeholder for text slices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// A settings field a slice can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingField {
    /// Bold flag
    Bold,
    /// Italic flag
    Italic,
    /// Underline flag
    Underline,
    /// Scaling mode
    Scaling,
    /// Theme
    Theme,
    /// Heading title
    Title,
    /// Heading subtitle
    SubTitle,
}

/// Control kind of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SliceKind {
    /// On/off switch
    Toggle,
    /// Pick one of several values
    Dropdown,
    /// Free text
    TextInput,
}

impl SettingField {
    /// Property name on the host object.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Scaling => "scaling",
            Self::Theme => "theme",
            Self::Title => "title",
            Self::SubTitle => "subTitle",
        }
    }

    /// Whether the field is part of the persisted settings object.
    #[must_use]
    pub const fn is_persisted(self) -> bool {
        !matches!(self, Self::Title | Self::SubTitle)
    }

    /// Control kind used to edit the field.
    #[must_use]
    pub const fn kind(self) -> SliceKind {
        match self {
            Self::Bold | Self::Italic | Self::Underline => SliceKind::Toggle,
            Self::Scaling | Self::Theme => SliceKind::Dropdown,
            Self::Title | Self::SubTitle => SliceKind::TextInput,
        }
    }
}

impl Manifest {
    /// The compiled-in manifest.
    ///
    /// # Panics
    ///
    /// Panics if the bundled `visual.yaml` is invalid, which its tests rule out.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_yaml(BUILTIN_MANIFEST).expect("bundled visual.yaml is a valid manifest")
    }

    /// Parse and validate a manifest from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize manifest to YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check structural rules serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first rule violated.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (field, value) in [
            ("visual", &self.visual),
            ("settings_object", &self.settings_object),
            ("headings.object", &self.headings.object),
        ] {
            if value.trim().is_empty() {
                return Err(ManifestError::MissingField(field.to_string()));
            }
        }

        if !self.defaults.styles_exclusive() {
            return Err(ManifestError::InvalidValue {
                field: "defaults".to_string(),
                message: "more than one style flag set".to_string(),
            });
        }

        let mut cards = HashSet::new();
        let mut fields = HashSet::new();
        for card in &self.cards {
            if card.name.trim().is_empty() {
                return Err(ManifestError::MissingField("cards[].name".to_string()));
            }
            if !cards.insert(card.name.as_str()) {
                return Err(ManifestError::Validation(format!(
                    "duplicate card '{}'",
                    card.name
                )));
            }
            for slice in &card.slices {
                if !fields.insert(slice.field) {
                    return Err(ManifestError::Validation(format!(
                        "duplicate slice '{}'",
                        slice.field.name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Heading defaults for a grid mode. Empty models use the table defaults.
    #[must_use]
    pub fn headings_for(&self, mode: GridMode) -> &Headings {
        match mode {
            GridMode::Hierarchical => &self.headings.matrix,
            GridMode::Flat | GridMode::Empty => &self.headings.table,
        }
    }

    /// Settings a visual starts with.
    #[must_use]
    pub fn default_settings(&self) -> FormattingSettings {
        let defaults = self.defaults;
        let headings = self.headings_for(GridMode::Empty);
        FormattingSettings {
            bold: defaults.bold,
            italic: defaults.italic,
            underline: defaults.underline,
            scaling: defaults.scaling,
            theme: defaults.theme,
            title: headings.title.clone(),
            subtitle: headings.subtitle.clone(),
        }
    }

    /// Host object a field is read from and persisted under.
    ///
    /// Style, scaling and theme live in the settings object; title and
    /// subtitle live in the heading object.
    #[must_use]
    pub fn object_for(&self, field: SettingField) -> &str {
        if field.is_persisted() {
            &self.settings_object
        } else {
            &self.headings.object
        }
    }

    /// Find the card a field lives on.
    #[must_use]
    pub fn card_for(&self, field: SettingField) -> Option<&CardConfig> {
        self.cards
            .iter()
            .find(|card| card.slices.iter().any(|slice| slice.field == field))
    }
}
