//! Dropdown selector for the scaling and theme settings.

use crate::widget::{escape_html, Widget};
use gridvis_core::{Event, Intent, Scaling, Target, Theme};
use serde::{Deserialize, Serialize};

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Unique value for this option
    pub value: String,
    /// Display label
    pub label: String,
}

impl SelectOption {
    /// Create a new option.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Dropdown bound to one settings field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Select {
    /// Target change events carry
    target: Target,
    /// Available options
    options: Vec<SelectOption>,
    /// Currently selected index
    selected: Option<usize>,
    /// Accessible name
    accessible_name: String,
}

impl Select {
    /// Create an empty select for a target.
    #[must_use]
    pub fn new(target: Target, accessible_name: impl Into<String>) -> Self {
        Self {
            target,
            options: Vec::new(),
            selected: None,
            accessible_name: accessible_name.into(),
        }
    }

    /// Scaling selector showing the current mode.
    #[must_use]
    pub fn scaling(current: Scaling) -> Self {
        let mut select = Self::new(Target::ScalingSelect, "Scaling").options(
            Scaling::ALL
                .iter()
                .map(|mode| SelectOption::new(mode.name(), mode.label())),
        );
        select.select_value(current.name());
        select
    }

    /// Theme selector showing the current theme.
    #[must_use]
    pub fn theme(current: Theme) -> Self {
        let mut select = Self::new(Target::ThemeSelect, "Theme").options(
            Theme::ALL
                .iter()
                .map(|theme| SelectOption::new(theme.name(), theme.label())),
        );
        select.select_value(current.name());
        select
    }

    /// Add options.
    #[must_use]
    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options.extend(options);
        self
    }

    /// Available options.
    #[must_use]
    pub fn get_options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Target change events carry.
    #[must_use]
    pub const fn target(&self) -> Target {
        self.target
    }

    /// Selected index.
    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Value of the selected option.
    #[must_use]
    pub fn selected_value(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|o| o.value.as_str())
    }

    /// Select the option with a value. Returns false if no option matches.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    fn offers(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

impl Widget for Select {
    fn to_html(&self) -> String {
        let mut html = format!(
            r#"<select class="formatting-select" data-testid="{}" aria-label="{}">"#,
            self.test_id().unwrap_or("select"),
            escape_html(&self.accessible_name)
        );
        for (index, option) in self.options.iter().enumerate() {
            let selected = if self.selected == Some(index) {
                " selected"
            } else {
                ""
            };
            html.push_str(&format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                escape_html(&option.value),
                escape_html(&option.label)
            ));
        }
        html.push_str("</select>");
        html
    }

    fn event(&self, event: &Event) -> Option<Intent> {
        let Event::Change { target, value } = event else {
            return None;
        };
        if *target != self.target || !self.offers(value) {
            return None;
        }
        match self.target {
            Target::ScalingSelect => value.parse().ok().map(Intent::scaling),
            Target::ThemeSelect => value.parse().ok().map(Intent::theme),
            Target::StyleButton(_) | Target::Row(_) => None,
        }
    }

    fn test_id(&self) -> Option<&str> {
        match self.target {
            Target::ScalingSelect => Some("scaling-select"),
            Target::ThemeSelect => Some("theme-select"),
            Target::StyleButton(_) | Target::Row(_) => None,
        }
    }
}
