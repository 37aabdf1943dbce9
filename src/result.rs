use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::ColumnMetaData;

/// Update count reported for row-returning statements.
pub const QUERY_UPDATE_COUNT: i64 = -1;

/// A fully materialized statement result.
///
/// `update_count` is `-1` for queries (rows are populated), `0` for
/// statements that changed nothing, and the affected row count otherwise.
/// Batch executions additionally carry one count per submitted statement in
/// `update_counts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub columns: Vec<ColumnMetaData>,
    pub rows: Vec<Vec<Value>>,
    pub update_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_counts: Option<Vec<i64>>,
}

impl ResultSet {
    pub fn new(columns: Vec<ColumnMetaData>, rows: Vec<Vec<Value>>, update_count: i64) -> Self {
        Self {
            columns,
            rows,
            update_count,
            update_counts: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), 0)
    }

    pub fn update_only(update_count: i64) -> Self {
        Self::new(Vec::new(), Vec::new(), update_count)
    }

    pub fn batch(update_counts: Vec<i64>) -> Self {
        Self {
            update_counts: Some(update_counts),
            ..Self::empty()
        }
    }

    pub fn is_query(&self) -> bool {
        self.update_count == QUERY_UPDATE_COUNT
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column_name.as_str()).collect()
    }

    /// Position of a column by name, ignoring ASCII case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.column_name.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn column(name: &str) -> ColumnMetaData {
        ColumnMetaData {
            column_name: name.to_string(),
            label: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty() {
        let rs = ResultSet::empty();
        assert!(rs.columns.is_empty());
        assert!(rs.rows.is_empty());
        assert_eq!(rs.update_count, 0);
        assert!(rs.update_counts.is_none());
        assert!(!rs.is_query());
    }

    #[test]
    fn test_batch_carries_counts() {
        let rs = ResultSet::batch(vec![1, 1]);
        assert_eq!(rs.update_counts, Some(vec![1, 1]));
        assert!(rs.rows.is_empty());
        assert_eq!(rs.update_count, 0);
    }

    #[test]
    fn test_column_lookup() {
        let rs = ResultSet::new(
            vec![column("ID"), column("NAME")],
            vec![vec![json!(1), json!("Test Name")]],
            QUERY_UPDATE_COUNT,
        );
        assert!(rs.is_query());
        assert_eq!(rs.column_names(), vec!["ID", "NAME"]);
        assert_eq!(rs.column_index("name"), Some(1));
        assert_eq!(rs.get(0, "NAME"), Some(&json!("Test Name")));
        assert_eq!(rs.get(1, "NAME"), None);
        assert_eq!(rs.get(0, "MONEY"), None);
    }

    #[test]
    fn test_serialized_shape() {
        let rs = ResultSet::update_only(3);
        assert_eq!(
            serde_json::to_value(&rs).unwrap(),
            json!({"columns": [], "rows": [], "updateCount": 3})
        );
    }
}
