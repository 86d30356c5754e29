//! UI events and the intents they produce.
//!
//! The rendered view never mutates controller state directly: a UI event is
//! mapped to an [`Intent`] value, which the controller consumes from its
//! queue.

use crate::format::Scaling;
use crate::settings::{SettingsIntent, StyleFlag, Theme};
use serde::{Deserialize, Serialize};

/// An interactive element of the rendered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    /// A style toggle button
    StyleButton(StyleFlag),
    /// The scaling selector
    ScalingSelect,
    /// The theme selector
    ThemeSelect,
    /// A body row, by position
    Row(usize),
}

/// A UI event delivered to the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Element clicked
    Click {
        /// Clicked element
        target: Target,
    },
    /// Selector value changed
    Change {
        /// Changed element
        target: Target,
        /// New option value
        value: String,
    },
}

impl Event {
    /// Click event.
    #[must_use]
    pub const fn click(target: Target) -> Self {
        Self::Click { target }
    }

    /// Change event.
    #[must_use]
    pub fn change(target: Target, value: impl Into<String>) -> Self {
        Self::Change {
            target,
            value: value.into(),
        }
    }

    /// Target element of the event.
    #[must_use]
    pub const fn target(&self) -> Target {
        match self {
            Self::Click { target } | Self::Change { target, .. } => *target,
        }
    }
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Change settings
    Settings(SettingsIntent),
    /// Select a body row
    SelectRow(usize),
}

impl Intent {
    /// Toggle-style intent.
    #[must_use]
    pub const fn toggle(flag: StyleFlag) -> Self {
        Self::Settings(SettingsIntent::ToggleStyle(flag))
    }

    /// Set-scaling intent.
    #[must_use]
    pub const fn scaling(scaling: Scaling) -> Self {
        Self::Settings(SettingsIntent::SetScaling(scaling))
    }

    /// Set-theme intent.
    #[must_use]
    pub const fn theme(theme: Theme) -> Self {
        Self::Settings(SettingsIntent::SetTheme(theme))
    }
}
