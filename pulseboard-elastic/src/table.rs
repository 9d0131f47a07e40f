//! Rows-by-named-columns staging container for documents.

use serde_json::{Map, Value};

/// An ordered collection of rows with a shared, first-seen column order.
///
/// Rows are flat records; a missing cell is simply an absent key. This is
/// the staging shape bulk writes consume and search results are reshaped
/// into.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows; column order follows first appearance.
    pub fn from_rows(rows: impl IntoIterator<Item = Map<String, Value>>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push(row);
        }
        table
    }

    /// Append a row, extending the column set with any new keys.
    pub fn push(&mut self, row: Map<String, Value>) {
        for key in row.keys() {
            if !self.columns.iter().any(|column| column == key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(row);
    }

    /// Append all rows of another table.
    pub fn extend(&mut self, other: Table) {
        for row in other.rows {
            self.push(row);
        }
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Map<String, Value>> {
        self.rows.iter()
    }

    /// Values of one column, `None` where a row has no cell.
    pub fn column(&self, name: &str) -> Vec<Option<&Value>> {
        self.rows.iter().map(|row| row.get(name)).collect()
    }

    /// Set a constant-valued column on every row, e.g. to tag staged
    /// rows with `_index` metadata before a bulk write.
    pub fn with_column(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        if !self.columns.iter().any(|column| column == &name) {
            self.columns.push(name.clone());
        }
        for row in &mut self.rows {
            row.insert(name.clone(), value.clone());
        }
        self
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Map<String, Value>;
    type IntoIter = std::slice::Iter<'a, Map<String, Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_columns_first_seen_order() {
        let table = Table::from_rows(vec![
            row(json!({ "date": "2023-04-01", "hr": 61 })),
            row(json!({ "hr": 62, "steps": 9000 })),
        ]);

        assert_eq!(table.columns(), ["date", "hr", "steps"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_cells_are_absent() {
        let table = Table::from_rows(vec![
            row(json!({ "a": 1 })),
            row(json!({ "b": 2 })),
        ]);

        assert_eq!(table.column("a"), vec![Some(&json!(1)), None]);
    }

    #[test]
    fn test_with_column_tags_every_row() {
        let table = Table::from_rows(vec![
            row(json!({ "hr": 61 })),
            row(json!({ "hr": 62 })),
        ])
        .with_column("_index", json!("metrics"));

        assert_eq!(table.columns(), ["hr", "_index"]);
        assert_eq!(
            table.column("_index"),
            vec![Some(&json!("metrics")), Some(&json!("metrics"))]
        );
    }

    #[test]
    fn test_extend_merges_columns() {
        let mut table = Table::from_rows(vec![row(json!({ "a": 1 }))]);
        table.extend(Table::from_rows(vec![row(json!({ "b": 2 }))]));

        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.len(), 2);
    }
}
