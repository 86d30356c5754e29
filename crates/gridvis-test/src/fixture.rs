//! Data view fixtures: programmatic builders and TOML fixture files.
//!
//! A fixture file describes one data view:
//!
//! ```toml
//! name = "sales"
//!
//! [matrix]
//! row_level = "Region"
//! columns = ["Q1", "Q2"]
//!
//! [[matrix.rows]]
//! label = "East"
//! values = [1500000, "n/a"]
//!
//! [objects.visualSettings]
//! bold = true
//! ```

use gridvis_core::{
    CellValue, DataView, DataViewObject, HierarchyLevel, LevelSource, Matrix, MatrixNode, Table,
    TableColumnMeta, VisualUpdateOptions,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Error loading a fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// File could not be read
    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML or wrong field types
    #[error("invalid fixture: {0}")]
    Toml(#[from] toml::de::Error),

    /// Structurally invalid fixture
    #[error("invalid fixture '{name}': {message}")]
    Invalid {
        /// Fixture name
        name: String,
        /// What is wrong
        message: String,
    },
}

// ===== Builders =====

/// Builds a [`Matrix`] with a single row level.
#[derive(Debug, Clone, Default)]
pub struct MatrixBuilder {
    columns: Vec<String>,
    rows: Vec<MatrixNode>,
    row_level: Option<String>,
}

impl MatrixBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set column labels.
    #[must_use]
    pub fn columns<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Name the row grouping level.
    #[must_use]
    pub fn row_level(mut self, name: impl Into<String>) -> Self {
        self.row_level = Some(name.into());
        self
    }

    /// Add a row; values are placed at consecutive column positions.
    #[must_use]
    pub fn row<I, V>(mut self, label: impl Into<CellValue>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let node = values
            .into_iter()
            .enumerate()
            .fold(MatrixNode::labelled(label), |node, (position, value)| {
                node.value(position, value)
            });
        self.rows.push(node);
        self
    }

    /// Add a prebuilt row node.
    #[must_use]
    pub fn node(mut self, node: MatrixNode) -> Self {
        self.rows.push(node);
        self
    }

    /// Build the matrix.
    #[must_use]
    pub fn build(self) -> Matrix {
        let mut matrix = Matrix::default();
        matrix.columns.root = self
            .columns
            .into_iter()
            .fold(MatrixNode::default(), |root, label| {
                root.child(MatrixNode::labelled(label))
            });
        matrix.rows.root = self
            .rows
            .into_iter()
            .fold(MatrixNode::default(), MatrixNode::child);
        if let Some(name) = self.row_level {
            matrix.rows.levels = vec![HierarchyLevel {
                sources: vec![LevelSource {
                    display_name: name,
                    query_name: None,
                }],
            }];
        }
        matrix
    }
}

/// Builds a flat [`Table`].
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set column names.
    #[must_use]
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table.columns = names.into_iter().map(TableColumnMeta::new).collect();
        self
    }

    /// Add a row of positional values.
    #[must_use]
    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.table.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    /// Build the table.
    #[must_use]
    pub fn build(self) -> Table {
        self.table
    }
}

/// Builds a [`DataView`].
#[derive(Debug, Clone, Default)]
pub struct DataViewBuilder {
    view: DataView,
}

impl DataViewBuilder {
    /// Create an empty data view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the matrix encoding.
    #[must_use]
    pub fn matrix(mut self, matrix: Matrix) -> Self {
        self.view.matrix = Some(matrix);
        self
    }

    /// Set the table encoding.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.view.table = Some(table);
        self
    }

    /// Add a persisted metadata object. Non-object JSON is ignored.
    #[must_use]
    pub fn object(mut self, name: impl Into<String>, properties: serde_json::Value) -> Self {
        if let serde_json::Value::Object(map) = properties {
            self.view.metadata.objects.insert(name.into(), map);
        }
        self
    }

    /// Build the data view.
    #[must_use]
    pub fn build(self) -> DataView {
        self.view
    }

    /// Build update options carrying the data view.
    #[must_use]
    pub fn options(self) -> VisualUpdateOptions {
        VisualUpdateOptions::single(self.view)
    }
}

// ===== TOML fixtures =====

#[derive(Debug, Clone, Deserialize)]
struct MatrixFixture {
    #[serde(default)]
    row_level: Option<String>,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<MatrixRowFixture>,
}

#[derive(Debug, Clone, Deserialize)]
struct MatrixRowFixture {
    label: String,
    #[serde(default)]
    identity: Option<String>,
    #[serde(default)]
    values: Vec<CellValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct TableFixture {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<CellValue>>,
}

/// A data view described in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct DataViewFixture {
    /// Fixture name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    matrix: Option<MatrixFixture>,
    #[serde(default)]
    table: Option<TableFixture>,
    #[serde(default)]
    objects: BTreeMap<String, DataViewObject>,
}

impl DataViewFixture {
    /// Parse a fixture from TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self, FixtureError> {
        let fixture: Self = toml::from_str(toml_str)?;
        fixture.validate()?;
        Ok(fixture)
    }

    /// Load a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    fn validate(&self) -> Result<(), FixtureError> {
        let invalid = |message: String| FixtureError::Invalid {
            name: self.name.clone(),
            message,
        };
        if let Some(matrix) = &self.matrix {
            if let Some(row) = matrix.rows.iter().find(|r| r.values.len() > matrix.columns.len()) {
                return Err(invalid(format!(
                    "row '{}' has {} values for {} columns",
                    row.label,
                    row.values.len(),
                    matrix.columns.len()
                )));
            }
        }
        if let Some(table) = &self.table {
            if table.columns.is_empty() && !table.rows.is_empty() {
                return Err(invalid("table rows without columns".to_string()));
            }
        }
        Ok(())
    }

    /// Whether the fixture carries a matrix encoding.
    #[must_use]
    pub fn has_matrix(&self) -> bool {
        self.matrix.is_some()
    }

    /// Whether the fixture carries a table encoding.
    #[must_use]
    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }

    /// Build the data view.
    #[must_use]
    pub fn to_data_view(&self) -> DataView {
        let mut builder = DataViewBuilder::new();
        if let Some(fixture) = &self.matrix {
            let mut matrix = MatrixBuilder::new().columns(fixture.columns.iter().cloned());
            if let Some(level) = &fixture.row_level {
                matrix = matrix.row_level(level.clone());
            }
            for row in &fixture.rows {
                let mut node = row
                    .values
                    .iter()
                    .enumerate()
                    .fold(MatrixNode::labelled(row.label.as_str()), |node, (i, v)| {
                        node.value(i, v.clone())
                    });
                node.identity.clone_from(&row.identity);
                matrix = matrix.node(node);
            }
            builder = builder.matrix(matrix.build());
        }
        if let Some(fixture) = &self.table {
            let table = fixture.rows.iter().fold(
                TableBuilder::new().columns(fixture.columns.iter().cloned()),
                |table, row| table.row(row.iter().cloned()),
            );
            builder = builder.table(table.build());
        }
        let mut view = builder.build();
        view.metadata.objects.clone_from(&self.objects);
        view
    }

    /// Build update options carrying the data view.
    #[must_use]
    pub fn to_options(&self) -> VisualUpdateOptions {
        VisualUpdateOptions::single(self.to_data_view())
    }
}

/// Fixture files shipped with this crate.
pub struct Fixtures;

impl Fixtures {
    /// Five regions by three quarters, hierarchical.
    #[must_use]
    pub fn sales_matrix() -> DataViewFixture {
        Self::parse(include_str!("../fixtures/sales_matrix.toml"))
    }

    /// Flat table with decorated and missing values.
    #[must_use]
    pub fn flat_table() -> DataViewFixture {
        Self::parse(include_str!("../fixtures/flat_table.toml"))
    }

    /// Matrix with persisted settings and headings in metadata.
    #[must_use]
    pub fn persisted_dark() -> DataViewFixture {
        Self::parse(include_str!("../fixtures/persisted_dark.toml"))
    }

    fn parse(toml_str: &str) -> DataViewFixture {
        DataViewFixture::from_toml(toml_str).unwrap()
    }
}
