//! The assembled grid view.

use crate::control_panel::ControlPanel;
use crate::grid_table::GridTable;
use crate::widget::{escape_html, Widget};
use gridvis_core::{Event, FormattingSettings, GridModel, Intent, SelectionState, Theme};
use serde::{Deserialize, Serialize};

/// Heading, control panel and grid table under one themed container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridView {
    theme: Theme,
    title: String,
    subtitle: String,
    panel: ControlPanel,
    table: GridTable,
}

/// Render a model with the given settings and selection.
///
/// Stateless: the same inputs always yield the same view.
#[must_use]
pub fn render(
    model: &GridModel,
    settings: &FormattingSettings,
    selection: &SelectionState,
) -> GridView {
    GridView {
        theme: settings.theme,
        title: settings.title.clone(),
        subtitle: settings.subtitle.clone(),
        panel: ControlPanel::from_settings(settings),
        table: GridTable::from_model(model, settings, selection),
    }
}

impl GridView {
    /// Active theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Heading title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Heading subtitle.
    #[must_use]
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// Control panel.
    #[must_use]
    pub const fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Grid table.
    #[must_use]
    pub const fn table(&self) -> &GridTable {
        &self.table
    }
}

impl Widget for GridView {
    fn to_html(&self) -> String {
        format!(
            r#"<div class="table-visual {}" data-testid="table-visual"><div class="heading"><h2 class="title">{}</h2><h3 class="subtitle">{}</h3></div>{}{}</div>"#,
            self.theme.class_name(),
            escape_html(&self.title),
            escape_html(&self.subtitle),
            self.panel.to_html(),
            self.table.to_html()
        )
    }

    fn to_css(&self) -> String {
        [
            ".table-visual.light-theme { background: #ffffff; color: #1f2937; --selected-bg: #e0e7ff; }",
            ".table-visual.dark-theme { background: #111827; color: #f9fafb; --selected-bg: #3730a3; }",
            self.panel.to_css().as_str(),
            self.table.to_css().as_str(),
        ]
        .join("\n")
    }

    fn event(&self, event: &Event) -> Option<Intent> {
        self.panel.event(event).or_else(|| self.table.event(event))
    }

    fn test_id(&self) -> Option<&str> {
        Some("table-visual")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridvis_core::{
        normalize, Matrix, MatrixNode, RawInput, Scaling, StyleFlag, Target,
    };
    use proptest::prelude::*;

    fn model(rows: usize) -> GridModel {
        let mut matrix = Matrix::default();
        matrix.columns.root = MatrixNode::default().child(MatrixNode::labelled("Total"));
        let mut root = MatrixNode::default();
        for i in 0..rows {
            root = root.child(MatrixNode::labelled(format!("Row {i}")).value(0, 2_300.0));
        }
        matrix.rows.root = root;
        normalize(RawInput::Matrix(&matrix))
    }

    #[test]
    fn test_render_heading_and_theme() {
        let mut settings = FormattingSettings::default();
        settings.theme = Theme::Dark;
        settings.title = "Sales".to_string();
        settings.subtitle = "By region".to_string();

        let view = render(&model(1), &settings, &SelectionState::default());
        assert_eq!(view.theme(), Theme::Dark);
        assert_eq!(view.title(), "Sales");

        let html = view.to_html();
        assert!(html.starts_with(r#"<div class="table-visual dark-theme""#));
        assert!(html.contains(r#"<h2 class="title">Sales</h2>"#));
        assert!(html.contains(r#"<h3 class="subtitle">By region</h3>"#));
    }

    #[test]
    fn test_render_light_theme_default() {
        let view = render(&GridModel::default(), &FormattingSettings::default(), &SelectionState::default());
        assert!(view.to_html().contains("table-visual light-theme"));
        assert!(view.table().is_empty());
    }

    #[test]
    fn test_render_scaling_applied() {
        let mut settings = FormattingSettings::default();
        settings.scaling = Scaling::Thousands;
        let view = render(&model(2), &settings, &SelectionState::default());
        assert_eq!(view.table().get_rows()[0].cells[0].text, "2.30");
    }

    #[test]
    fn test_view_routes_events() {
        let view = render(&model(3), &FormattingSettings::default(), &SelectionState::default());
        assert_eq!(
            view.event(&Event::click(Target::StyleButton(StyleFlag::Bold))),
            Some(Intent::toggle(StyleFlag::Bold))
        );
        assert_eq!(
            view.event(&Event::change(Target::ScalingSelect, "auto")),
            Some(Intent::scaling(Scaling::Auto))
        );
        assert_eq!(view.event(&Event::click(Target::Row(2))), Some(Intent::SelectRow(2)));
        assert_eq!(view.event(&Event::click(Target::Row(3))), None);
    }

    #[test]
    fn test_view_css_covers_themes() {
        let css = render(&model(1), &FormattingSettings::default(), &SelectionState::default()).to_css();
        assert!(css.contains(".table-visual.light-theme"));
        assert!(css.contains(".table-visual.dark-theme"));
        assert!(css.contains(".formatted-cell.bold"));
    }

    #[test]
    fn test_view_serializes() {
        let view = render(&model(1), &FormattingSettings::default(), &SelectionState::row(0));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["theme"], "light");
        assert_eq!(json["table"]["rows"][0]["selected"], true);
    }

    proptest! {
        #[test]
        fn prop_render_deterministic(rows in 0usize..20, selected in 0usize..25) {
            let model = model(rows);
            let selection = SelectionState::row(selected);
            let a = render(&model, &FormattingSettings::default(), &selection);
            let b = render(&model, &FormattingSettings::default(), &selection);
            prop_assert_eq!(a.to_html(), b.to_html());
            prop_assert_eq!(a.table().row_count(), rows);
            prop_assert!(a.table().get_rows().iter().filter(|r| r.selected).count() <= 1);
        }
    }
}
