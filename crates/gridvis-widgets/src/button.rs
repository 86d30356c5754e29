//! Style toggle button.

use crate::widget::{escape_html, Widget};
use gridvis_core::{Event, Intent, StyleFlag, Target};
use serde::{Deserialize, Serialize};

/// Toggle button for one text style flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleButton {
    /// Flag the button sets
    flag: StyleFlag,
    /// Whether the flag is currently set
    active: bool,
    /// Test ID
    test_id_value: String,
}

impl StyleButton {
    /// Create a button for a flag.
    #[must_use]
    pub fn new(flag: StyleFlag) -> Self {
        Self {
            flag,
            active: false,
            test_id_value: format!("style-{}", flag.name()),
        }
    }

    /// Set the active state.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Flag the button sets.
    #[must_use]
    pub const fn flag(&self) -> StyleFlag {
        self.flag
    }

    /// Whether the button renders as pressed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Target clicks on this button carry.
    #[must_use]
    pub const fn target(&self) -> Target {
        Target::StyleButton(self.flag)
    }
}

impl Widget for StyleButton {
    fn to_html(&self) -> String {
        let class = if self.active {
            "formatting-button active"
        } else {
            "formatting-button"
        };
        format!(
            r#"<button type="button" class="{class}" data-testid="{}" data-style="{}" aria-pressed="{}">{}</button>"#,
            self.test_id_value,
            self.flag.name(),
            self.active,
            escape_html(self.flag.label())
        )
    }

    fn to_css(&self) -> String {
        ".formatting-button.active { font-weight: 600; }".into()
    }

    fn event(&self, event: &Event) -> Option<Intent> {
        match event {
            Event::Click { target } if *target == self.target() => Some(Intent::toggle(self.flag)),
            _ => None,
        }
    }

    fn test_id(&self) -> Option<&str> {
        Some(&self.test_id_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Construction Tests =====

    #[test]
    fn test_style_button_new() {
        let button = StyleButton::new(StyleFlag::Italic);
        assert_eq!(button.flag(), StyleFlag::Italic);
        assert!(!button.is_active());
        assert_eq!(button.test_id(), Some("style-italic"));
    }

    // ===== HTML Tests =====

    #[test]
    fn test_style_button_html_inactive() {
        let html = StyleButton::new(StyleFlag::Bold).to_html();
        assert!(html.contains(r#"class="formatting-button""#));
        assert!(html.contains(r#"aria-pressed="false""#));
        assert!(html.contains(">Bold</button>"));
    }

    #[test]
    fn test_style_button_html_active() {
        let html = StyleButton::new(StyleFlag::Underline).active(true).to_html();
        assert!(html.contains(r#"class="formatting-button active""#));
        assert!(html.contains(r#"aria-pressed="true""#));
    }

    // ===== Event Tests =====

    #[test]
    fn test_style_button_click_own_target() {
        let button = StyleButton::new(StyleFlag::Bold).active(true);
        let event = Event::click(Target::StyleButton(StyleFlag::Bold));
        assert_eq!(button.event(&event), Some(Intent::toggle(StyleFlag::Bold)));
    }

    #[test]
    fn test_style_button_ignores_other_targets() {
        let button = StyleButton::new(StyleFlag::Bold);
        assert_eq!(
            button.event(&Event::click(Target::StyleButton(StyleFlag::Italic))),
            None
        );
        assert_eq!(button.event(&Event::click(Target::Row(0))), None);
        assert_eq!(
            button.event(&Event::change(Target::StyleButton(StyleFlag::Bold), "x")),
            None
        );
    }
}
