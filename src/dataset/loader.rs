//! Load trial records from JSON.

use super::record::{Record, REQUIRED_FIELDS};
use crate::error::LoadError;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

/// Ordered collection of trial records, read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Wrap already-parsed records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load a dataset from a local JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_json_str(&contents)?;
        tracing::info!("Loaded {} records from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Load a dataset from any reader producing JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Load a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Accepts an array of record objects, or an object of columns keyed by row.
    fn from_value(value: Value) -> Result<Self, LoadError> {
        let rows = match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(LoadError::Layout(json_kind(&other))),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Value::Object(columns) => Self::rows_from_columns(columns)?,
            other => return Err(LoadError::Layout(json_kind(&other))),
        };

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| Self::parse_record(i, row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }

    /// Transpose `{field: {row_key: value}}` into one object per row.
    fn rows_from_columns(columns: Map<String, Value>) -> Result<Vec<Map<String, Value>>, LoadError> {
        if columns.values().any(|v| !v.is_object()) {
            return Err(LoadError::Layout("object with non-column values"));
        }

        let anchor = REQUIRED_FIELDS[0];
        let Some(Value::Object(anchor_column)) = columns.get(anchor) else {
            return Err(LoadError::MissingField {
                record: 0,
                field: anchor.to_string(),
            });
        };

        let mut row_keys: Vec<&String> = anchor_column.keys().collect();
        row_keys.sort_by(|a, b| match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        });

        let rows = row_keys
            .iter()
            .map(|key| {
                columns
                    .iter()
                    .filter_map(|(field, column)| {
                        column
                            .get(key.as_str())
                            .map(|value| (field.clone(), value.clone()))
                    })
                    .collect::<Map<String, Value>>()
            })
            .collect();

        Ok(rows)
    }

    fn parse_record(index: usize, row: Map<String, Value>) -> Result<Record, LoadError> {
        // A null value counts as absent
        let present = |field: &str| matches!(row.get(field), Some(v) if !v.is_null());
        if let Some(field) = REQUIRED_FIELDS.iter().find(|f| !present(**f)) {
            return Err(LoadError::MissingField {
                record: index,
                field: field.to_string(),
            });
        }
        Ok(serde_json::from_value(Value::Object(row))?)
    }

    /// All records in input order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over records in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RECORDS: &str = r#"[
        {"gt_corners": 4.0, "rb_corners": 4.0, "floor_mean": 1.0, "ceiling_mean": 2.0,
         "floor_min": 0.5, "ceiling_min": 1.5, "floor_max": 1.5, "ceiling_max": 2.5},
        {"gt_corners": 6.0, "rb_corners": 8.0, "floor_mean": 1.1, "ceiling_mean": 2.1,
         "floor_min": 2.0, "ceiling_min": 1.0, "floor_max": 5.0, "ceiling_max": 3.0}
    ]"#;

    #[test]
    fn test_load_records_layout() {
        let ds = Dataset::from_json_str(RECORDS).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].rb_corners, 8.0);
        assert_eq!(ds.records()[1].floor_range(), 3.0);
    }

    #[test]
    fn test_load_columns_layout_orders_rows_numerically() {
        let json = r#"{
            "gt_corners":   {"0": 4, "1": 6, "10": 8, "2": 10},
            "rb_corners":   {"0": 4, "1": 6, "10": 8, "2": 10},
            "floor_mean":   {"0": 0.0, "1": 1.0, "10": 10.0, "2": 2.0},
            "ceiling_mean": {"0": 0.0, "1": 1.0, "10": 10.0, "2": 2.0},
            "floor_min":    {"0": 0.0, "1": 1.0, "10": 10.0, "2": 2.0},
            "ceiling_min":  {"0": 0.0, "1": 1.0, "10": 10.0, "2": 2.0},
            "floor_max":    {"0": 0.0, "1": 1.0, "10": 10.0, "2": 2.0},
            "ceiling_max":  {"0": 0.0, "1": 1.0, "10": 10.0, "2": 2.0}
        }"#;
        let ds = Dataset::from_json_str(json).unwrap();
        let means: Vec<f64> = ds.iter().map(|r| r.floor_mean).collect();
        assert_eq!(means, vec![0.0, 1.0, 2.0, 10.0]);
        assert_eq!(ds.records()[3].gt_corners, 8.0);
    }

    #[test]
    fn test_columns_layout_missing_cell() {
        let json = r#"{
            "gt_corners":   {"0": 4, "1": 6},
            "rb_corners":   {"0": 4, "1": 6},
            "floor_mean":   {"0": 0.0, "1": 1.0},
            "ceiling_mean": {"0": 0.0, "1": 1.0},
            "floor_min":    {"0": 0.0, "1": 1.0},
            "ceiling_min":  {"0": 0.0, "1": 1.0},
            "floor_max":    {"0": 0.0},
            "ceiling_max":  {"0": 0.0, "1": 1.0}
        }"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        match err {
            LoadError::MissingField { record, field } => {
                assert_eq!(record, 1);
                assert_eq!(field, "floor_max");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_gt_corners() {
        let json = r#"[{"rb_corners": 4.0, "floor_mean": 1.0, "ceiling_mean": 2.0,
            "floor_min": 0.5, "ceiling_min": 1.5, "floor_max": 1.5, "ceiling_max": 2.5}]"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("gt_corners"));
    }

    #[test]
    fn test_null_field_is_missing_field() {
        let json = r#"[{"gt_corners": 4.0, "rb_corners": 4.0, "floor_mean": 1.0, "ceiling_mean": 2.0,
            "floor_min": null, "ceiling_min": 1.5, "floor_max": 1.5, "ceiling_max": 2.5}]"#;
        match Dataset::from_json_str(json).unwrap_err() {
            LoadError::MissingField { record, field } => {
                assert_eq!(record, 0);
                assert_eq!(field, "floor_min");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_columns_layout_null_cell() {
        let json = r#"{
            "gt_corners":   {"0": 4, "1": 6},
            "rb_corners":   {"0": 4, "1": null},
            "floor_mean":   {"0": 0.0, "1": 1.0},
            "ceiling_mean": {"0": 0.0, "1": 1.0},
            "floor_min":    {"0": 0.0, "1": 1.0},
            "ceiling_min":  {"0": 0.0, "1": 1.0},
            "floor_max":    {"0": 0.0, "1": 1.0},
            "ceiling_max":  {"0": 0.0, "1": 1.0}
        }"#;
        let err = Dataset::from_json_str(json).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { record: 1, .. }));
        assert!(err.to_string().contains("rb_corners"));
    }

    #[test]
    fn test_empty_array_is_empty_dataset() {
        let ds = Dataset::from_json_str("[]").unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn test_rejects_scalar_and_malformed() {
        assert!(matches!(
            Dataset::from_json_str("42"),
            Err(LoadError::Layout(_))
        ));
        assert!(matches!(
            Dataset::from_json_str("[1, 2]"),
            Err(LoadError::Layout(_))
        ));
        assert!(matches!(
            Dataset::from_json_str("{\"gt_corners\": 4}"),
            Err(LoadError::Layout(_))
        ));
        assert!(matches!(
            Dataset::from_json_str("[{"),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_wrong_field_type_is_parse_error() {
        let json = r#"[{"gt_corners": "four", "rb_corners": 4.0, "floor_mean": 1.0, "ceiling_mean": 2.0,
            "floor_min": 0.5, "ceiling_min": 1.5, "floor_max": 1.5, "ceiling_max": 2.5}]"#;
        assert!(matches!(
            Dataset::from_json_str(json),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RECORDS.as_bytes()).unwrap();

        let ds = Dataset::from_path(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Dataset::from_path("/nonexistent/deviation.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("deviation.json"));
    }

    #[test]
    fn test_from_reader() {
        let ds = Dataset::from_reader(RECORDS.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
    }
}
