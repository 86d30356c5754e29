//! `GridTable` widget: header row plus formatted, styled body rows.

use crate::widget::{escape_html, Widget};
use gridvis_core::{
    format_value, CellValue, Event, FormattingSettings, GridMode, GridModel, Intent, Scaling,
    SelectionState, StyleFlag, Target,
};
use serde::{Deserialize, Serialize};

/// A header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    /// Column key
    pub key: String,
    /// Header text
    pub label: String,
}

/// A rendered body cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    /// Display text
    pub text: String,
    /// Whether the text came from the number formatter
    pub numeric: bool,
    /// Style flag applied to the cell
    pub style: Option<StyleFlag>,
}

impl GridCell {
    /// Render a raw value. Numeric values go through the formatter, anything
    /// else is shown as-is.
    #[must_use]
    pub fn from_value(value: &CellValue, scaling: Scaling, style: Option<StyleFlag>) -> Self {
        let numeric = value.is_numeric();
        let text = if numeric {
            format_value(value, scaling)
        } else {
            value.display()
        };
        Self {
            text,
            numeric,
            style,
        }
    }

    fn class(&self) -> String {
        let mut class = String::from("formatted-cell");
        if let Some(style) = self.style {
            class.push(' ');
            class.push_str(style.name());
        }
        if self.numeric {
            class.push_str(" numeric");
        }
        class
    }
}

/// A rendered body row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyRow {
    /// Position in the model
    pub index: usize,
    /// Leading row-header text (hierarchical rows)
    pub group_label: Option<String>,
    /// Cells in column order
    pub cells: Vec<GridCell>,
    /// Whether this is the selected row
    pub selected: bool,
}

/// The grid table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTable {
    /// Header cells
    columns: Vec<HeaderCell>,
    /// Body rows
    rows: Vec<BodyRow>,
    /// Header text of the row-header column, when rows carry group labels
    row_header: Option<String>,
    /// Whether clicking a row selects it
    selectable: bool,
}

impl GridTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table for a model.
    ///
    /// Only hierarchical rows are selectable; flat rows have no identity to
    /// resolve.
    #[must_use]
    pub fn from_model(
        model: &GridModel,
        settings: &FormattingSettings,
        selection: &SelectionState,
    ) -> Self {
        let style = settings.active_style();
        let hierarchical = model.mode == GridMode::Hierarchical;

        let columns = model
            .columns
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: c.display_label.clone(),
            })
            .collect();

        let rows = model
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| BodyRow {
                index,
                group_label: row.group_label().map(str::to_string),
                cells: model
                    .columns
                    .iter()
                    .enumerate()
                    .map(|(position, column)| {
                        let value = row.cell(position, column).cloned().unwrap_or_default();
                        GridCell::from_value(&value, settings.scaling, style)
                    })
                    .collect(),
                selected: hierarchical && selection.is_selected(index),
            })
            .collect();

        let row_header = hierarchical.then(|| {
            model
                .levels
                .first()
                .and_then(|level| level.sources.first())
                .map(|source| source.display_name.clone())
                .unwrap_or_default()
        });

        Self {
            columns,
            rows,
            row_header,
            selectable: hierarchical,
        }
    }

    /// Get number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header cells.
    #[must_use]
    pub fn get_columns(&self) -> &[HeaderCell] {
        &self.columns
    }

    /// Body rows.
    #[must_use]
    pub fn get_rows(&self) -> &[BodyRow] {
        &self.rows
    }

    /// Index of the highlighted row.
    #[must_use]
    pub fn get_selected_row(&self) -> Option<usize> {
        self.rows.iter().find(|r| r.selected).map(|r| r.index)
    }

    /// Whether rows respond to clicks.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Check if table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Widget for GridTable {
    fn to_html(&self) -> String {
        let mut html = String::from(r#"<table class="grid-table" data-testid="grid-table"><thead><tr>"#);
        if let Some(label) = &self.row_header {
            html.push_str(&format!(r#"<th class="row-header">{}</th>"#, escape_html(label)));
        }
        for column in &self.columns {
            html.push_str(&format!(
                r#"<th data-key="{}">{}</th>"#,
                escape_html(&column.key),
                escape_html(&column.label)
            ));
        }
        html.push_str("</tr></thead><tbody>");

        for row in &self.rows {
            let class = if row.selected { r#" class="selected""# } else { "" };
            html.push_str(&format!(r#"<tr{class} data-row="{}">"#, row.index));
            if self.row_header.is_some() {
                html.push_str(&format!(
                    r#"<th class="row-header">{}</th>"#,
                    escape_html(row.group_label.as_deref().unwrap_or_default())
                ));
            }
            for cell in &row.cells {
                html.push_str(&format!(
                    r#"<td class="{}">{}</td>"#,
                    cell.class(),
                    escape_html(&cell.text)
                ));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        html
    }

    fn to_css(&self) -> String {
        [
            ".grid-table { border-collapse: collapse; width: 100%; }",
            ".grid-table tr.selected { background: var(--selected-bg); }",
            ".formatted-cell.bold { font-weight: bold; }",
            ".formatted-cell.italic { font-style: italic; }",
            ".formatted-cell.underline { text-decoration: underline; }",
            ".formatted-cell.numeric { text-align: right; }",
        ]
        .join("\n")
    }

    fn event(&self, event: &Event) -> Option<Intent> {
        match event {
            Event::Click {
                target: Target::Row(index),
            } if self.selectable && *index < self.rows.len() => Some(Intent::SelectRow(*index)),
            _ => None,
        }
    }

    fn test_id(&self) -> Option<&str> {
        Some("grid-table")
    }
}
