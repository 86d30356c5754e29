//! Formatting model exported to the host settings pane.

use gridvis_core::{FormattingSettings, Scaling, Theme};
use gridvis_yaml::{Manifest, SettingField, SliceKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Host formatting model: one card per manifest card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattingModel {
    /// Cards in manifest order
    pub cards: Vec<FormattingCard>,
}

/// A card in the settings pane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingCard {
    /// Unique id
    pub uid: String,
    /// Display name
    pub display_name: String,
    /// Controls on the card
    pub slices: Vec<FormattingSlice>,
}

/// Where a slice value is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Object name
    pub object_name: String,
    /// Property name
    pub property_name: String,
}

/// A dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceItem {
    /// Persisted value
    pub value: String,
    /// Display name
    pub display_name: String,
}

/// One control on a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingSlice {
    /// Unique id
    pub uid: String,
    /// Display name
    pub display_name: String,
    /// Control kind
    pub control: SliceKind,
    /// Persisted location
    pub descriptor: PropertyDescriptor,
    /// Current value
    pub value: Value,
    /// Placeholder text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Dropdown entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SliceItem>,
}

impl FormattingModel {
    /// Project settings onto the manifest's cards.
    #[must_use]
    pub fn build(manifest: &Manifest, settings: &FormattingSettings) -> Self {
        let cards = manifest
            .cards
            .iter()
            .map(|card| FormattingCard {
                uid: format!("{}_card", card.name),
                display_name: card.display_name.clone(),
                slices: card
                    .slices
                    .iter()
                    .map(|slice| FormattingSlice {
                        uid: format!("{}_{}_slice", card.name, slice.field.name()),
                        display_name: slice.display_name.clone(),
                        control: slice.field.kind(),
                        descriptor: PropertyDescriptor {
                            object_name: manifest.object_for(slice.field).to_string(),
                            property_name: slice.field.name().to_string(),
                        },
                        value: field_value(slice.field, settings),
                        placeholder: slice.placeholder.clone(),
                        items: field_items(slice.field),
                    })
                    .collect(),
            })
            .collect();
        Self { cards }
    }

    /// Look up a slice by property name.
    #[must_use]
    pub fn slice(&self, property_name: &str) -> Option<&FormattingSlice> {
        self.cards
            .iter()
            .flat_map(|card| &card.slices)
            .find(|slice| slice.descriptor.property_name == property_name)
    }
}

fn field_value(field: SettingField, settings: &FormattingSettings) -> Value {
    match field {
        SettingField::Bold => Value::Bool(settings.bold),
        SettingField::Italic => Value::Bool(settings.italic),
        SettingField::Underline => Value::Bool(settings.underline),
        SettingField::Scaling => Value::from(settings.scaling.name()),
        SettingField::Theme => Value::from(settings.theme.name()),
        SettingField::Title => Value::from(settings.title.as_str()),
        SettingField::SubTitle => Value::from(settings.subtitle.as_str()),
    }
}

fn field_items(field: SettingField) -> Vec<SliceItem> {
    let item = |value: &str, label: &str| SliceItem {
        value: value.to_string(),
        display_name: label.to_string(),
    };
    match field {
        SettingField::Scaling => Scaling::ALL
            .iter()
            .map(|s| item(s.name(), s.label()))
            .collect(),
        SettingField::Theme => Theme::ALL.iter().map(|t| item(t.name(), t.label())).collect(),
        _ => Vec::new(),
    }
}
