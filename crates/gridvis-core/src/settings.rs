//! Formatting settings and their reducer.
//!
//! Settings change only through [`SettingsIntent`] values applied by
//! [`FormattingSettings::update`], which keeps the style flags mutually
//! exclusive: at most one of bold, italic and underline is set.

use crate::error::UnknownVariant;
use crate::format::Scaling;
use crate::state::{Command, State, Store};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Default title shown above the grid.
pub const DEFAULT_TITLE: &str = "Table";

/// Default subtitle before any data has been bound.
const DEFAULT_SUBTITLE: &str = "Table Sub Title";

/// One of the mutually exclusive text style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleFlag {
    /// Bold text
    Bold,
    /// Italic text
    Italic,
    /// Underlined text
    Underline,
}

impl StyleFlag {
    /// All flags, in control-panel order.
    pub const ALL: [Self; 3] = [Self::Bold, Self::Italic, Self::Underline];

    /// Wire name, also used as the CSS class.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Underline => "Underline",
        }
    }
}

impl fmt::Display for StyleFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleFlag {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("style", s))
    }
}

/// Color theme of the visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    /// All themes, in selector order.
    pub const ALL: [Self; 2] = [Self::Light, Self::Dark];

    /// Wire name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }

    /// Top-level style class.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Light => "light-theme",
            Self::Dark => "dark-theme",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("theme", s))
    }
}

/// Current formatting settings of a visual instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingSettings {
    /// Bold cell text
    pub bold: bool,
    /// Italic cell text
    pub italic: bool,
    /// Underlined cell text
    pub underline: bool,
    /// Numeric scaling mode
    pub scaling: Scaling,
    /// Color theme
    pub theme: Theme,
    /// Heading title
    pub title: String,
    /// Heading subtitle
    pub subtitle: String,
}

impl Default for FormattingSettings {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            scaling: Scaling::None,
            theme: Theme::Light,
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
        }
    }
}

impl FormattingSettings {
    /// Whether a style flag is set.
    #[must_use]
    pub const fn is_active(&self, flag: StyleFlag) -> bool {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
        }
    }

    /// The style flag currently set, if any.
    #[must_use]
    pub fn active_style(&self) -> Option<StyleFlag> {
        StyleFlag::ALL.into_iter().find(|flag| self.is_active(*flag))
    }

    /// Whether at most one style flag is set.
    #[must_use]
    pub fn styles_exclusive(&self) -> bool {
        StyleFlag::ALL
            .into_iter()
            .filter(|flag| self.is_active(*flag))
            .count()
            <= 1
    }

    /// Set one flag and clear the other two.
    pub fn set_exclusive_style(&mut self, flag: StyleFlag) {
        self.bold = flag == StyleFlag::Bold;
        self.italic = flag == StyleFlag::Italic;
        self.underline = flag == StyleFlag::Underline;
    }

    /// The subset of settings persisted to the host.
    #[must_use]
    pub const fn persisted(&self) -> PersistedSettings {
        PersistedSettings {
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            scaling: self.scaling,
            theme: self.theme,
        }
    }

    /// Shallow-merge an override: present fields win, absent fields keep
    /// their current value.
    ///
    /// When the merge would leave more than one style flag set, the first
    /// flag (in bold, italic, underline order) that the override itself sets
    /// wins; failing that, the first flag already set wins.
    pub fn merge(&mut self, patch: &SettingsOverride) {
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(underline) = patch.underline {
            self.underline = underline;
        }
        if let Some(scaling) = patch.scaling {
            self.scaling = scaling;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(subtitle) = &patch.subtitle {
            self.subtitle.clone_from(subtitle);
        }

        if !self.styles_exclusive() {
            let winner = StyleFlag::ALL
                .into_iter()
                .find(|flag| patch.style(*flag) == Some(true))
                .or_else(|| self.active_style());
            if let Some(flag) = winner {
                self.set_exclusive_style(flag);
            }
        }
    }
}

/// Settings-change intents: the closed set of ways settings can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsIntent {
    /// Set one style flag and clear the others
    ToggleStyle(StyleFlag),
    /// Change the scaling mode
    SetScaling(Scaling),
    /// Change the theme
    SetTheme(Theme),
    /// Merge a host-declared partial settings value
    HostOverride(SettingsOverride),
}

impl State for FormattingSettings {
    type Message = SettingsIntent;

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
        let before = self.persisted();
        match msg {
            SettingsIntent::ToggleStyle(flag) => self.set_exclusive_style(flag),
            SettingsIntent::SetScaling(scaling) => self.scaling = scaling,
            SettingsIntent::SetTheme(theme) => self.theme = theme,
            SettingsIntent::HostOverride(patch) => {
                self.merge(&patch);
                // Echoed host state: nothing new to persist.
                if self.persisted() == before {
                    return Command::Render;
                }
            }
        }
        Command::batch([Command::Persist(self.persisted()), Command::Render])
    }
}

/// Store holding the settings of one visual instance.
pub type SettingsStore = Store<FormattingSettings>;

impl Store<FormattingSettings> {
    /// Current settings.
    pub const fn current_settings(&self) -> &FormattingSettings {
        self.state()
    }

    /// Set a style flag, clearing the other two.
    pub fn apply_style_toggle(&mut self, flag: StyleFlag) -> Command<SettingsIntent> {
        self.dispatch(SettingsIntent::ToggleStyle(flag))
    }

    /// Change the scaling mode.
    pub fn apply_scaling(&mut self, scaling: Scaling) -> Command<SettingsIntent> {
        self.dispatch(SettingsIntent::SetScaling(scaling))
    }

    /// Change the theme.
    pub fn apply_theme(&mut self, theme: Theme) -> Command<SettingsIntent> {
        self.dispatch(SettingsIntent::SetTheme(theme))
    }

    /// Merge a host-declared override.
    pub fn merge_host_override(&mut self, patch: SettingsOverride) -> Command<SettingsIntent> {
        self.dispatch(SettingsIntent::HostOverride(patch))
    }
}

/// Settings persisted to the host under the settings object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    /// Bold flag
    pub bold: bool,
    /// Italic flag
    pub italic: bool,
    /// Underline flag
    pub underline: bool,
    /// Scaling mode
    pub scaling: Scaling,
    /// Theme
    pub theme: Theme,
}

impl PersistedSettings {
    /// Whether at most one style flag is set.
    #[must_use]
    pub const fn styles_exclusive(&self) -> bool {
        (self.bold as u8) + (self.italic as u8) + (self.underline as u8) <= 1
    }

    /// Flat key/value properties, as handed to the host.
    #[must_use]
    pub fn to_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("bold".to_string(), Value::Bool(self.bold));
        props.insert("italic".to_string(), Value::Bool(self.italic));
        props.insert("underline".to_string(), Value::Bool(self.underline));
        props.insert("scaling".to_string(), Value::from(self.scaling.name()));
        props.insert("theme".to_string(), Value::from(self.theme.name()));
        props
    }
}

/// A partial settings value; `None` fields are left untouched by a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsOverride {
    /// Bold flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// Italic flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// Underline flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    /// Scaling mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling: Option<Scaling>,
    /// Theme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    /// Heading title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Heading subtitle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl SettingsOverride {
    /// An override setting every persisted field.
    #[must_use]
    pub const fn from_persisted(persisted: PersistedSettings) -> Self {
        Self {
            bold: Some(persisted.bold),
            italic: Some(persisted.italic),
            underline: Some(persisted.underline),
            scaling: Some(persisted.scaling),
            theme: Some(persisted.theme),
            title: None,
            subtitle: None,
        }
    }

    /// Read an override from persisted host properties.
    ///
    /// Unknown properties and values of the wrong type are skipped.
    #[must_use]
    pub fn from_properties(props: &Map<String, Value>) -> Self {
        let flag = |name: &str| props.get(name).and_then(Value::as_bool);
        let text = |name: &str| props.get(name).and_then(Value::as_str);
        Self {
            bold: flag("bold"),
            italic: flag("italic"),
            underline: flag("underline"),
            scaling: text("scaling").and_then(|s| s.parse().ok()),
            theme: text("theme").and_then(|s| s.parse().ok()),
            title: None,
            subtitle: None,
        }
    }

    /// Set the heading fields.
    #[must_use]
    pub fn with_headings(mut self, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Value of a style flag in this override.
    #[must_use]
    pub const fn style(&self, flag: StyleFlag) -> Option<bool> {
        match flag {
            StyleFlag::Bold => self.bold,
            StyleFlag::Italic => self.italic,
            StyleFlag::Underline => self.underline,
        }
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
