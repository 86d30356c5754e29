//! Host payload types.
//!
//! These mirror the JSON the host pushes on every update. Only the fields the
//! grid pipeline reads are modeled; unknown fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A raw cell value as supplied by the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing value (JSON null)
    #[default]
    Empty,
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl CellValue {
    /// Get display text for the cell, without any numeric formatting.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format!("{n}"),
            Self::Bool(b) => b.to_string(),
            Self::Empty => String::new(),
        }
    }

    /// Numeric value when the cell is a number, or text that is a plain
    /// number ("42", " -1.5 "). Decorated text such as "$1,234" is not.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Bool(_) | Self::Empty => None,
        };
        number.filter(|n| n.is_finite())
    }

    /// Whether the cell should be shown through the number formatter.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Whether the cell is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Update options passed by the host on every refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualUpdateOptions {
    /// Data views bound to the visual; only the first is rendered
    #[serde(default)]
    pub data_views: Vec<DataView>,
}

impl VisualUpdateOptions {
    /// Options carrying a single data view.
    #[must_use]
    pub fn single(view: DataView) -> Self {
        Self {
            data_views: vec![view],
        }
    }

    /// The data view to render, if any.
    #[must_use]
    pub fn data_view(&self) -> Option<&DataView> {
        self.data_views.first()
    }
}

/// One data view: metadata plus a matrix or table encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataView {
    /// Metadata, including persisted objects
    #[serde(default)]
    pub metadata: DataViewMetadata,
    /// Hierarchical cross-tab encoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Matrix>,
    /// Flat table encoding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
}

/// Properties of one persisted object, keyed by property name.
pub type DataViewObject = Map<String, Value>;

/// Data view metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataViewMetadata {
    /// Persisted objects by object name
    #[serde(default)]
    pub objects: BTreeMap<String, DataViewObject>,
}

impl DataViewMetadata {
    /// Look up a persisted object.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&DataViewObject> {
        self.objects.get(name)
    }

    /// Read a property as display text. Empty strings count as absent.
    #[must_use]
    pub fn property_text(&self, object: &str, property: &str) -> Option<String> {
        let text = match self.object(object)?.get(property)? {
            Value::String(s) => s.clone(),
            Value::Null => return None,
            other => other.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Hierarchical cross-tab payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Row hierarchy
    #[serde(default)]
    pub rows: MatrixHierarchy,
    /// Column hierarchy
    #[serde(default)]
    pub columns: MatrixHierarchy,
}

/// One axis of a matrix: a tree plus its level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixHierarchy {
    /// Tree root (carries no label of its own)
    #[serde(default)]
    pub root: MatrixNode,
    /// Level metadata, outermost first
    #[serde(default)]
    pub levels: HierarchyLevels,
}

/// Level metadata handed through to identity resolution.
pub type HierarchyLevels = Vec<HierarchyLevel>;

/// One grouping level of a hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyLevel {
    /// Fields grouped at this level
    #[serde(default)]
    pub sources: Vec<LevelSource>,
}

/// A field bound to a hierarchy level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSource {
    /// Field display name
    #[serde(default)]
    pub display_name: String,
    /// Query reference, when the host supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_name: Option<String>,
}

/// A node in a matrix tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixNode {
    /// Depth of this node, when supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,
    /// Group values; the first one labels the node
    #[serde(default)]
    pub level_values: Vec<LevelValue>,
    /// Cell values keyed by column position
    #[serde(default)]
    pub values: BTreeMap<usize, MatrixValue>,
    /// Child nodes
    #[serde(default)]
    pub children: Vec<MatrixNode>,
    /// Host identity token, when supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

impl MatrixNode {
    /// Create a leaf labelled by a single level value.
    #[must_use]
    pub fn labelled(label: impl Into<CellValue>) -> Self {
        Self {
            level_values: vec![LevelValue {
                value: label.into(),
            }],
            ..Self::default()
        }
    }

    /// Add a cell value at a column position.
    #[must_use]
    pub fn value(mut self, position: usize, value: impl Into<CellValue>) -> Self {
        self.values.insert(
            position,
            MatrixValue {
                value: value.into(),
            },
        );
        self
    }

    /// Add a child node.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Text of the first level value, or empty.
    #[must_use]
    pub fn label(&self) -> String {
        self.level_values
            .first()
            .map(|v| v.value.display())
            .unwrap_or_default()
    }
}

/// A group value on a matrix node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelValue {
    /// The group value
    #[serde(default)]
    pub value: CellValue,
}

/// A cell value on a matrix node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixValue {
    /// The cell value
    #[serde(default)]
    pub value: CellValue,
}

/// Flat table payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Declared columns, in order
    #[serde(default)]
    pub columns: Vec<TableColumnMeta>,
    /// Rows of positional values
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A declared table column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumnMeta {
    /// Source field name
    pub display_name: String,
}

impl TableColumnMeta {
    /// Create a column by field name.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}
