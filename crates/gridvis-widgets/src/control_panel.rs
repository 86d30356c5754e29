//! Control panel: style buttons plus the scaling and theme selectors.

use crate::button::StyleButton;
use crate::select::Select;
use crate::widget::Widget;
use gridvis_core::{Event, FormattingSettings, Intent, StyleFlag};
use serde::{Deserialize, Serialize};

/// The settings controls shown above the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPanel {
    buttons: Vec<StyleButton>,
    scaling: Select,
    theme: Select,
}

impl ControlPanel {
    /// Controls reflecting the given settings.
    #[must_use]
    pub fn from_settings(settings: &FormattingSettings) -> Self {
        Self {
            buttons: StyleFlag::ALL
                .iter()
                .map(|flag| StyleButton::new(*flag).active(settings.is_active(*flag)))
                .collect(),
            scaling: Select::scaling(settings.scaling),
            theme: Select::theme(settings.theme),
        }
    }

    /// Style buttons in bold, italic, underline order.
    #[must_use]
    pub fn buttons(&self) -> &[StyleButton] {
        &self.buttons
    }

    /// Scaling selector.
    #[must_use]
    pub const fn scaling(&self) -> &Select {
        &self.scaling
    }

    /// Theme selector.
    #[must_use]
    pub const fn theme(&self) -> &Select {
        &self.theme
    }

    fn children(&self) -> impl Iterator<Item = &dyn Widget> {
        self.buttons
            .iter()
            .map(|b| b as &dyn Widget)
            .chain([&self.scaling as &dyn Widget, &self.theme as &dyn Widget])
    }
}

impl Widget for ControlPanel {
    fn to_html(&self) -> String {
        let mut html = String::from(r#"<div class="control-panel" data-testid="control-panel">"#);
        for child in self.children() {
            html.push_str(&child.to_html());
        }
        html.push_str("</div>");
        html
    }

    fn to_css(&self) -> String {
        let mut css = String::from(".control-panel { display: flex; gap: 4px; }");
        if let Some(button) = self.buttons.first() {
            css.push('\n');
            css.push_str(&button.to_css());
        }
        css
    }

    fn event(&self, event: &Event) -> Option<Intent> {
        self.children().find_map(|child| child.event(event))
    }

    fn test_id(&self) -> Option<&str> {
        Some("control-panel")
    }
}
