//! Normalization of host payloads into a uniform row/column model.
//!
//! The host supplies either a hierarchical matrix or a flat table. Detection
//! happens once, in [`RawInput::detect`]; [`normalize`] then handles each
//! shape in one exhaustive match.

use crate::data::{CellValue, DataView, HierarchyLevels, Matrix, MatrixNode, Table};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The payload shape supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput<'a> {
    /// Hierarchical cross-tab
    Matrix(&'a Matrix),
    /// Flat table
    Table(&'a Table),
    /// No data view, or a data view with neither encoding
    Absent,
}

impl<'a> RawInput<'a> {
    /// Detect the shape from whichever encoding is populated.
    ///
    /// The matrix encoding wins when both are present.
    #[must_use]
    pub fn detect(view: Option<&'a DataView>) -> Self {
        match view {
            Some(DataView {
                matrix: Some(matrix),
                ..
            }) => Self::Matrix(matrix),
            Some(DataView {
                table: Some(table), ..
            }) => Self::Table(table),
            _ => Self::Absent,
        }
    }
}

/// Which row shape a model carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    /// No data
    #[default]
    Empty,
    /// Rows are keyed mappings
    Flat,
    /// Rows are matrix nodes with positional values
    Hierarchical,
}

/// One rendered column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Lookup key
    pub key: String,
    /// Header text
    pub display_label: String,
}

impl ColumnDescriptor {
    /// Create a column descriptor.
    #[must_use]
    pub fn new(key: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_label: display_label.into(),
        }
    }
}

/// A flat row: cell values keyed by column key.
///
/// Entries keep column order and serialize as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    /// Cell values by column key, in column order
    #[serde(with = "ordered_cells")]
    pub cells: Vec<(String, CellValue)>,
}

impl FlatRow {
    /// Get a cell value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Set a cell value. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: CellValue) {
        let key = key.into();
        match self.cells.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.cells.push((key, value)),
        }
    }

    /// Column keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    /// Positional values in column order.
    #[must_use]
    pub fn positional(&self, columns: &[ColumnDescriptor]) -> Vec<CellValue> {
        columns
            .iter()
            .map(|c| self.get(&c.key).cloned().unwrap_or_default())
            .collect()
    }
}

/// A hierarchical row: the source node plus its values aligned to columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    /// First level value of the node
    pub group_label: String,
    /// Values aligned with the column order
    pub values: Vec<CellValue>,
    /// Source node, handed to identity resolution
    #[serde(skip)]
    pub node: MatrixNode,
}

/// One normalized row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum RowRecord {
    /// Keyed mapping (table input)
    Flat(FlatRow),
    /// Matrix node (matrix input)
    Hierarchical(MatrixRow),
}

impl RowRecord {
    /// Value of the cell at a column position.
    #[must_use]
    pub fn cell<'a>(&'a self, position: usize, column: &ColumnDescriptor) -> Option<&'a CellValue> {
        match self {
            Self::Flat(row) => row.get(&column.key),
            Self::Hierarchical(row) => row.values.get(position),
        }
    }

    /// Group label of a hierarchical row.
    #[must_use]
    pub fn group_label(&self) -> Option<&str> {
        match self {
            Self::Flat(_) => None,
            Self::Hierarchical(row) => Some(&row.group_label),
        }
    }

    /// Source node of a hierarchical row.
    #[must_use]
    pub const fn node(&self) -> Option<&MatrixNode> {
        match self {
            Self::Flat(_) => None,
            Self::Hierarchical(row) => Some(&row.node),
        }
    }
}

/// The uniform row/column model rendered by the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridModel {
    /// Row shape
    pub mode: GridMode,
    /// Columns in render order
    pub columns: Vec<ColumnDescriptor>,
    /// Rows in render order
    pub rows: Vec<RowRecord>,
    /// Row hierarchy levels (hierarchical mode only)
    #[serde(skip)]
    pub levels: HierarchyLevels,
}

impl GridModel {
    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether the model holds no rows and no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    /// Row at a position.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&RowRecord> {
        self.rows.get(index)
    }
}

/// Normalize a raw payload into columns and rows.
///
/// Pure: the same input always produces the same model.
#[must_use]
pub fn normalize(input: RawInput<'_>) -> GridModel {
    let model = match input {
        RawInput::Matrix(matrix) => normalize_matrix(matrix),
        RawInput::Table(table) => normalize_table(table),
        RawInput::Absent => GridModel::default(),
    };
    tracing::debug!(
        target: "gridvis_core::normalize",
        mode = ?model.mode,
        columns = model.column_count(),
        rows = model.row_count(),
        "normalized data view"
    );
    model
}

fn normalize_matrix(matrix: &Matrix) -> GridModel {
    let columns: Vec<ColumnDescriptor> = matrix
        .columns
        .root
        .children
        .iter()
        .enumerate()
        .map(|(position, node)| ColumnDescriptor::new(position.to_string(), node.label()))
        .collect();

    let rows = matrix
        .rows
        .root
        .children
        .iter()
        .map(|node| {
            let values = (0..columns.len())
                .map(|position| {
                    node.values
                        .get(&position)
                        .map(|v| v.value.clone())
                        .unwrap_or_default()
                })
                .collect();
            RowRecord::Hierarchical(MatrixRow {
                group_label: node.label(),
                values,
                node: node.clone(),
            })
        })
        .collect();

    GridModel {
        mode: GridMode::Hierarchical,
        columns,
        rows,
        levels: matrix.rows.levels.clone(),
    }
}

fn normalize_table(table: &Table) -> GridModel {
    let columns: Vec<ColumnDescriptor> = table
        .columns
        .iter()
        .map(|c| ColumnDescriptor::new(c.display_name.clone(), c.display_name.clone()))
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|values| {
            let mut values = values.iter();
            let mut row = FlatRow::default();
            for column in &columns {
                row.insert(column.key.clone(), values.next().cloned().unwrap_or_default());
            }
            RowRecord::Flat(row)
        })
        .collect();

    GridModel {
        mode: GridMode::Flat,
        columns,
        rows,
        levels: HierarchyLevels::new(),
    }
}

mod ordered_cells {
    use super::{
        fmt, CellValue, Deserializer, MapAccess, SerializeMap, Serializer, Visitor,
    };

    pub(super) fn serialize<S: Serializer>(
        cells: &[(String, CellValue)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(cells.len()))?;
        for (key, value) in cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(String, CellValue)>, D::Error> {
        struct CellsVisitor;

        impl<'de> Visitor<'de> for CellsVisitor {
            type Value = Vec<(String, CellValue)>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column keys to cell values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut cells = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, CellValue>()? {
                    cells.push(entry);
                }
                Ok(cells)
            }
        }

        deserializer.deserialize_map(CellsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HierarchyLevel, LevelSource, MatrixHierarchy, TableColumnMeta};
    use proptest::prelude::*;

    fn matrix(column_count: usize, row_count: usize) -> Matrix {
        let mut columns = MatrixNode::default();
        for c in 0..column_count {
            columns = columns.child(MatrixNode::labelled(format!("Q{}", c + 1)));
        }
        let mut rows = MatrixNode::default();
        for r in 0..row_count {
            let mut node = MatrixNode::labelled(format!("Region {r}"));
            for c in 0..column_count {
                node = node.value(c, (r * 10 + c) as i32);
            }
            rows = rows.child(node);
        }
        Matrix {
            rows: MatrixHierarchy {
                root: rows,
                levels: vec![HierarchyLevel {
                    sources: vec![LevelSource {
                        display_name: "Region".to_string(),
                        query_name: None,
                    }],
                }],
            },
            columns: MatrixHierarchy {
                root: columns,
                levels: Vec::new(),
            },
        }
    }

    fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        Table {
            columns: columns.iter().map(|c| TableColumnMeta::new(*c)).collect(),
            rows,
        }
    }

    // ===== Detection Tests =====

    #[test]
    fn test_detect_absent() {
        assert_eq!(RawInput::detect(None), RawInput::Absent);
        let empty = DataView::default();
        assert_eq!(RawInput::detect(Some(&empty)), RawInput::Absent);
    }

    #[test]
    fn test_detect_prefers_matrix() {
        let view = DataView {
            matrix: Some(matrix(1, 1)),
            table: Some(table(&["a"], vec![])),
            ..DataView::default()
        };
        assert!(matches!(RawInput::detect(Some(&view)), RawInput::Matrix(_)));
    }

    #[test]
    fn test_normalize_absent_is_empty() {
        let model = normalize(RawInput::Absent);
        assert!(model.is_empty());
        assert_eq!(model.mode, GridMode::Empty);
    }

    // ===== Matrix Tests =====

    #[test]
    fn test_matrix_three_columns_five_rows() {
        let input = matrix(3, 5);
        let model = normalize(RawInput::Matrix(&input));
        assert_eq!(model.mode, GridMode::Hierarchical);
        assert_eq!(model.column_count(), 3);
        assert_eq!(model.row_count(), 5);
        for row in &model.rows {
            let RowRecord::Hierarchical(row) = row else {
                panic!("expected hierarchical row");
            };
            assert_eq!(row.values.len(), 3);
        }
    }

    #[test]
    fn test_matrix_labels_and_keys() {
        let input = matrix(2, 2);
        let model = normalize(RawInput::Matrix(&input));
        assert_eq!(model.columns[0], ColumnDescriptor::new("0", "Q1"));
        assert_eq!(model.columns[1], ColumnDescriptor::new("1", "Q2"));
        assert_eq!(model.rows[1].group_label(), Some("Region 1"));
        assert_eq!(model.rows[1].cell(1, &model.columns[1]), Some(&CellValue::Number(11.0)));
        assert_eq!(model.levels.len(), 1);
    }

    #[test]
    fn test_matrix_missing_values_padded() {
        let input = Matrix {
            rows: MatrixHierarchy {
                root: MatrixNode::default().child(MatrixNode::labelled("Only").value(1, 5)),
                levels: Vec::new(),
            },
            columns: MatrixHierarchy {
                root: MatrixNode::default()
                    .child(MatrixNode::labelled("A"))
                    .child(MatrixNode::labelled("B")),
                levels: Vec::new(),
            },
        };
        let model = normalize(RawInput::Matrix(&input));
        let RowRecord::Hierarchical(row) = &model.rows[0] else {
            panic!("expected hierarchical row");
        };
        assert_eq!(row.values, vec![CellValue::Empty, CellValue::Number(5.0)]);
        assert_eq!(row.node.label(), "Only");
    }

    // ===== Table Tests =====

    #[test]
    fn test_table_rows_keyed_by_column() {
        let input = table(
            &["Region", "Sales"],
            vec![
                vec!["West".into(), 1200.into()],
                vec!["East".into(), 800.into()],
            ],
        );
        let model = normalize(RawInput::Table(&input));
        assert_eq!(model.mode, GridMode::Flat);
        assert_eq!(model.columns[1], ColumnDescriptor::new("Sales", "Sales"));
        let RowRecord::Flat(row) = &model.rows[0] else {
            panic!("expected flat row");
        };
        assert_eq!(row.get("Region"), Some(&CellValue::from("West")));
        assert_eq!(row.get("Sales"), Some(&CellValue::Number(1200.0)));
        assert!(model.rows[0].group_label().is_none());
    }

    #[test]
    fn test_table_short_and_long_rows() {
        let input = table(
            &["a", "b"],
            vec![vec![1.into()], vec![1.into(), 2.into(), 3.into()]],
        );
        let model = normalize(RawInput::Table(&input));
        let RowRecord::Flat(short) = &model.rows[0] else {
            panic!("expected flat row");
        };
        assert_eq!(short.get("b"), Some(&CellValue::Empty));
        let RowRecord::Flat(long) = &model.rows[1] else {
            panic!("expected flat row");
        };
        assert_eq!(long.cells.len(), 2);
    }

    #[test]
    fn test_table_serializes_in_column_order() {
        let keys = ["h", "c", "a", "f", "b", "g", "d", "e"];
        let input = table(&keys, vec![(0..8).map(|i| CellValue::Number(f64::from(i))).collect()]);
        let first = serde_json::to_string(&normalize(RawInput::Table(&input))).unwrap();
        for _ in 0..10 {
            assert_eq!(serde_json::to_string(&normalize(RawInput::Table(&input))).unwrap(), first);
        }
        assert!(first.contains(r#""cells":{"h":0.0,"c":1.0,"a":2.0,"f":3.0,"b":4.0,"g":5.0,"d":6.0,"e":7.0}"#));

        let parsed: GridModel = serde_json::from_str(&first).unwrap();
        let RowRecord::Flat(row) = &parsed.rows[0] else {
            panic!("expected flat row");
        };
        assert_eq!(row.keys().collect::<Vec<_>>(), keys);
    }

    #[test]
    fn test_duplicate_column_keys_collapse() {
        let input = table(&["a", "a"], vec![vec![1.into(), 2.into()]]);
        let model = normalize(RawInput::Table(&input));
        let RowRecord::Flat(row) = &model.rows[0] else {
            panic!("expected flat row");
        };
        assert_eq!(row.cells.len(), 1);
        assert_eq!(row.get("a"), Some(&CellValue::from(2)));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let input = matrix(4, 3);
        assert_eq!(
            normalize(RawInput::Matrix(&input)),
            normalize(RawInput::Matrix(&input))
        );
    }

    proptest! {
        #[test]
        fn prop_table_round_trips_positional_values(
            rows in proptest::collection::vec(proptest::collection::vec(-1e6f64..1e6, 3), 0..20)
        ) {
            let values: Vec<Vec<CellValue>> = rows
                .iter()
                .map(|r| r.iter().map(|n| CellValue::Number(*n)).collect())
                .collect();
            let input = table(&["x", "y", "z"], values.clone());
            let model = normalize(RawInput::Table(&input));

            prop_assert_eq!(model.row_count(), input.row_count());
            for (record, original) in model.rows.iter().zip(&values) {
                let RowRecord::Flat(row) = record else {
                    return Err(TestCaseError::fail("expected flat row"));
                };
                prop_assert_eq!(row.keys().collect::<Vec<_>>(), vec!["x", "y", "z"]);
                prop_assert_eq!(&row.positional(&model.columns), original);
            }
        }

        #[test]
        fn prop_matrix_values_align_with_columns(cols in 0usize..8, rows in 0usize..8) {
            let input = matrix(cols, rows);
            let model = normalize(RawInput::Matrix(&input));
            prop_assert_eq!(model.column_count(), cols);
            prop_assert_eq!(model.row_count(), rows);
            for record in &model.rows {
                if let RowRecord::Hierarchical(row) = record {
                    prop_assert_eq!(row.values.len(), cols);
                }
            }
        }
    }
}
