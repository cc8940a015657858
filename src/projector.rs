/// Row projection and convention-based classification
///
/// Turns rows into [`OrderedFieldMap`]s and answers questions about them
/// (does it carry a key, which one, does it carry amounts) by matching
/// column names against a [`SchemaVocabulary`].
///
/// Every fallible operation comes in two forms: `try_*` returns the error,
/// the plain form reports it to the configured [`FailureSink`] and returns
/// an empty value.
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use crate::core::{BindError, ColumnScan, OrderedFieldMap, Row, Table, Value};
use crate::notify::{guard, FailureSink, LogSink};
use crate::vocabulary::SchemaVocabulary;

/// A primary-key column and its integer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryKey {
    pub column: String,
    pub value: i64,
}

#[derive(Clone)]
pub struct RowProjector {
    vocabulary: Arc<SchemaVocabulary>,
    scan: ColumnScan,
    sink: Arc<dyn FailureSink>,
}

impl Default for RowProjector {
    fn default() -> Self {
        Self::new()
    }
}

impl RowProjector {
    /// Standard vocabulary, `SkipFirst` lookups, failures logged.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vocabulary: SchemaVocabulary::standard(),
            scan: ColumnScan::SkipFirst,
            sink: Arc::new(LogSink),
        }
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Arc<SchemaVocabulary>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    #[must_use]
    pub fn with_scan(mut self, scan: ColumnScan) -> Self {
        self.scan = scan;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn vocabulary(&self) -> &SchemaVocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub const fn scan(&self) -> ColumnScan {
        self.scan
    }

    pub fn try_to_field_map(&self, row: &Row) -> Result<OrderedFieldMap, BindError> {
        let map = OrderedFieldMap::from_row(row)?;
        log::debug!("projected {} of {} columns", map.len(), row.len());
        Ok(map)
    }

    pub fn to_field_map(&self, row: &Row) -> Option<OrderedFieldMap> {
        guard(&*self.sink, "to_field_map", self.try_to_field_map(row).map(Some), || None)
    }

    /// True if any inspected column is a numeric field name.
    #[must_use]
    pub fn has_numeric_column(&self, map: &OrderedFieldMap) -> bool {
        map.find(self.scan, |name| self.vocabulary.is_numeric_field_name(name))
            .is_some()
    }

    /// True if any inspected column is a primary-key name.
    ///
    /// With the default `SkipFirst` scan a map whose only key column is
    /// column 0 reports false.
    #[must_use]
    pub fn has_primary_key(&self, map: &OrderedFieldMap) -> bool {
        map.find(self.scan, |name| self.vocabulary.is_primary_key_name(name))
            .is_some()
    }

    /// First inspected primary-key column, with its value as an integer.
    pub fn try_primary_key(&self, map: &OrderedFieldMap) -> Result<Option<PrimaryKey>, BindError> {
        let Some((_, column, value)) =
            map.find(self.scan, |name| self.vocabulary.is_primary_key_name(name))
        else {
            return Ok(None);
        };
        let key = coerce_key(column, value)?;
        Ok(Some(PrimaryKey {
            column: column.to_string(),
            value: key,
        }))
    }

    pub fn primary_key(&self, map: &OrderedFieldMap) -> Option<PrimaryKey> {
        guard(&*self.sink, "primary_key", self.try_primary_key(map), || None)
    }

    /// Integer values of column 0 across `rows`.
    ///
    /// The rows qualify when the first row has a primary-key-named column
    /// anywhere, column 0 included. Values are always read from column 0,
    /// not from the matched column; rows whose column 0 is null are skipped.
    /// Unlike [`Self::try_primary_key`] this ignores the projector's scan.
    pub fn try_primary_key_values(&self, rows: &[Row]) -> Result<Vec<i64>, BindError> {
        let first = rows.first().ok_or(BindError::EmptyInput)?;
        let keyed = first
            .columns()
            .iter()
            .any(|name| !name.is_empty() && self.vocabulary.is_primary_key_name(name));
        if !keyed {
            return Ok(Vec::new());
        }

        let mut keys = Vec::with_capacity(rows.len());
        for row in rows {
            let (Some(column), Some(value)) = (row.columns().first(), row.values().first()) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            keys.push(coerce_key(column, value)?);
        }
        Ok(keys)
    }

    pub fn primary_key_values(&self, rows: &[Row]) -> Vec<i64> {
        guard(&*self.sink, "primary_key_values", self.try_primary_key_values(rows), Vec::new)
    }

    /// Text of a recognized descriptive field; `None` when the value is null.
    pub fn try_field_text(&self, row: &Row, name: &str) -> Result<Option<String>, BindError> {
        if !self.vocabulary.is_recognized_field_name(name) {
            return Err(BindError::UnrecognizedField(name.to_string()));
        }
        let value = lookup(row, name)?;
        Ok((!value.is_null()).then(|| value.to_string()))
    }

    pub fn field_text(&self, row: &Row, name: &str) -> Option<String> {
        guard(&*self.sink, "field_text", self.try_field_text(row, name), || None)
    }

    /// Value of a numeric field as `f64`.
    pub fn try_numeric_value(&self, row: &Row, name: &str) -> Result<f64, BindError> {
        if !self.vocabulary.is_numeric_field_name(name) {
            return Err(BindError::UnrecognizedField(name.to_string()));
        }
        let value = lookup(row, name)?;
        value.coerce_f64().ok_or_else(|| BindError::ValueCoercion {
            column: name.to_string(),
            value: value.to_string(),
            expected: "a number",
        })
    }

    /// Zero when the field is missing or not numeric.
    pub fn numeric_value(&self, row: &Row, name: &str) -> f64 {
        guard(&*self.sink, "numeric_value", self.try_numeric_value(row, name), || 0.0)
    }

    /// Value of a recognized date field.
    pub fn try_date_value(&self, row: &Row, name: &str) -> Result<NaiveDate, BindError> {
        if !self.vocabulary.is_recognized_field_name(name) {
            return Err(BindError::UnrecognizedField(name.to_string()));
        }
        let value = lookup(row, name)?;
        value.coerce_date().ok_or_else(|| BindError::ValueCoercion {
            column: name.to_string(),
            value: value.to_string(),
            expected: "a date",
        })
    }

    pub fn date_value(&self, row: &Row, name: &str) -> Option<NaiveDate> {
        guard(&*self.sink, "date_value", self.try_date_value(row, name).map(Some), || None)
    }

    /// True if the table has rows and any of its columns is a numeric field name.
    #[must_use]
    pub fn table_has_numeric_column(&self, table: &Table) -> bool {
        !table.rows().is_empty()
            && table
                .columns()
                .iter()
                .any(|name| self.vocabulary.is_numeric_field_name(name))
    }

    /// True if the table has rows and any of its columns is a primary-key name.
    #[must_use]
    pub fn table_has_primary_key(&self, table: &Table) -> bool {
        !table.rows().is_empty()
            && table
                .columns()
                .iter()
                .any(|name| self.vocabulary.is_primary_key_name(name))
    }

    /// Integer values of column 0 for each row that has a primary key.
    ///
    /// Unlike [`Self::try_primary_key_values`] the gate is the row-level
    /// [`Self::has_primary_key`], so it honours the scan: under `SkipFirst`
    /// a table keyed only by its column 0 yields nothing.
    pub fn try_table_primary_key_values(&self, table: &Table) -> Result<Vec<i64>, BindError> {
        if table.rows().is_empty() {
            return Err(BindError::EmptyInput);
        }
        let mut keys = Vec::with_capacity(table.rows().len());
        for row in table.rows() {
            let map = OrderedFieldMap::from_row(row)?;
            if !self.has_primary_key(&map) {
                continue;
            }
            let (Some(column), Some(value)) = (row.columns().first(), row.values().first()) else {
                continue;
            };
            if !value.is_null() {
                keys.push(coerce_key(column, value)?);
            }
        }
        Ok(keys)
    }

    pub fn table_primary_key_values(&self, table: &Table) -> Vec<i64> {
        guard(
            &*self.sink,
            "table_primary_key_values",
            self.try_table_primary_key_values(table),
            Vec::new,
        )
    }
}

fn lookup<'a>(row: &'a Row, name: &str) -> Result<&'a Value, BindError> {
    row.get(name)
        .ok_or_else(|| BindError::ColumnNotFound(name.to_string()))
}

fn coerce_key(column: &str, value: &Value) -> Result<i64, BindError> {
    value.coerce_int().ok_or_else(|| BindError::KeyCoercion {
        column: column.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingSink;

    fn map(pairs: &[(&str, Value)]) -> OrderedFieldMap {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    fn recording() -> (RowProjector, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let projector = RowProjector::new().with_sink(sink.clone());
        (projector, sink)
    }

    #[test]
    fn test_to_field_map_counts_named_columns() {
        let row = Row::from_pairs([("ID", Value::Integer(1)), ("", Value::from("x")), ("Name", Value::from("n"))])
            .unwrap();
        let map = RowProjector::new().try_to_field_map(&row).unwrap();
        assert_eq!(map.len(), row.non_empty_column_count());
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["ID", "Name"]);
    }

    #[test]
    fn test_to_field_map_is_repeatable() {
        let row = Row::from_pairs([("FundId", 3), ("Amount", 10)]).unwrap();
        let projector = RowProjector::new();
        assert_eq!(projector.to_field_map(&row), projector.to_field_map(&row));
    }

    #[test]
    fn test_to_field_map_empty_input() {
        let (projector, sink) = recording();
        let row = Row::from_pairs(Vec::<(String, Value)>::new()).unwrap();
        assert!(matches!(projector.try_to_field_map(&row), Err(BindError::EmptyInput)));
        assert_eq!(projector.to_field_map(&row), None);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_to_field_map_empty_result() {
        let row = Row::from_pairs([("", 1), ("", 2)]).unwrap();
        assert!(matches!(
            RowProjector::new().try_to_field_map(&row),
            Err(BindError::EmptyResult)
        ));
    }

    #[test]
    fn test_has_primary_key_skips_first_column() {
        let projector = RowProjector::new();
        let only_key = map(&[("ID", Value::Integer(1))]);
        assert!(!projector.has_primary_key(&only_key));

        let keyed = map(&[("ID", Value::Integer(1)), ("FundId", Value::Integer(4))]);
        assert!(projector.has_primary_key(&keyed));

        assert!(!projector.has_primary_key(&OrderedFieldMap::new()));
    }

    #[test]
    fn test_has_primary_key_from_first() {
        let projector = RowProjector::new().with_scan(ColumnScan::FromFirst);
        let only_key = map(&[("ID", Value::Integer(1))]);
        assert!(projector.has_primary_key(&only_key));
    }

    #[test]
    fn test_has_numeric_column() {
        let projector = RowProjector::new();
        let amounts = map(&[("ID", Value::Integer(1)), ("Name", "x".into()), ("Amount", 5.0.into())]);
        assert!(projector.has_numeric_column(&amounts));

        let first_only = map(&[("Amount", 5.0.into()), ("Name", "x".into())]);
        assert!(!projector.has_numeric_column(&first_only));
        assert!(
            RowProjector::new()
                .with_scan(ColumnScan::FromFirst)
                .has_numeric_column(&first_only)
        );
    }

    #[test]
    fn test_primary_key_returns_first_match() {
        let projector = RowProjector::new();
        let m = map(&[
            ("ID", Value::Integer(1)),
            ("Name", "x".into()),
            ("FundId", Value::from("42")),
            ("GoalId", Value::Integer(7)),
        ]);
        assert_eq!(
            projector.try_primary_key(&m).unwrap(),
            Some(PrimaryKey { column: "FundId".to_string(), value: 42 })
        );
    }

    #[test]
    fn test_primary_key_absent() {
        let projector = RowProjector::new();
        let m = map(&[("ID", Value::Integer(1)), ("Name", "x".into())]);
        assert_eq!(projector.try_primary_key(&m).unwrap(), None);
    }

    #[test]
    fn test_primary_key_coercion_error() {
        let (projector, sink) = recording();
        let m = map(&[("ID", Value::Integer(1)), ("AccountKey", "abc".into())]);
        assert!(matches!(
            projector.try_primary_key(&m),
            Err(BindError::KeyCoercion { column, value }) if column == "AccountKey" && value == "abc"
        ));
        assert_eq!(projector.primary_key(&m), None);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_primary_key_values_read_column_zero() {
        let columns: Arc<[String]> = vec!["ID".to_string(), "FundId".to_string()].into();
        let rows = vec![
            Row::new(columns.clone(), vec![Value::Integer(10), Value::Integer(1)]).unwrap(),
            Row::new(columns.clone(), vec![Value::Null, Value::Integer(2)]).unwrap(),
            Row::new(columns, vec![Value::from("12"), Value::Integer(3)]).unwrap(),
        ];
        assert_eq!(RowProjector::new().try_primary_key_values(&rows).unwrap(), vec![10, 12]);
    }

    #[test]
    fn test_primary_key_values_without_key_columns() {
        let rows = vec![Row::from_pairs([("Name", "a"), ("Code", "b")]).unwrap()];
        assert!(RowProjector::new().try_primary_key_values(&rows).unwrap().is_empty());
    }

    #[test]
    fn test_primary_key_values_failures() {
        let (projector, sink) = recording();
        assert!(matches!(projector.try_primary_key_values(&[]), Err(BindError::EmptyInput)));

        let rows = vec![Row::from_pairs([("ID", "x1")]).unwrap()];
        assert!(matches!(
            projector.try_primary_key_values(&rows),
            Err(BindError::KeyCoercion { .. })
        ));
        assert!(projector.primary_key_values(&rows).is_empty());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_table_primary_key_values_gate_each_row() {
        let keyed = Table::from_json(
            r#"{"columns": ["ID", "FundId", "Amount"], "rows": [[10, 1, 5.0], [null, 2, 6.0], [12, 3, 7.0]]}"#,
        )
        .unwrap();
        let projector = RowProjector::new();
        assert_eq!(projector.try_table_primary_key_values(&keyed).unwrap(), vec![10, 12]);

        // key only in column 0: skipped by the row gate, accepted by the bulk form
        let leading = Table::from_json(r#"{"columns": ["ID", "Amount"], "rows": [[10, 5.0]]}"#).unwrap();
        assert!(projector.try_table_primary_key_values(&leading).unwrap().is_empty());
        assert_eq!(projector.try_primary_key_values(leading.rows()).unwrap(), vec![10]);
        assert_eq!(
            projector
                .clone()
                .with_scan(ColumnScan::FromFirst)
                .try_table_primary_key_values(&leading)
                .unwrap(),
            vec![10]
        );
    }

    #[test]
    fn test_table_primary_key_values_on_empty_table() {
        let (projector, sink) = recording();
        let table = Table::new("Empty", vec!["ID".to_string()]).unwrap();
        assert!(matches!(
            projector.try_table_primary_key_values(&table),
            Err(BindError::EmptyInput)
        ));
        assert!(projector.table_primary_key_values(&table).is_empty());
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_field_accessors() {
        let row = Row::from_pairs([
            ("ID", Value::Integer(1)),
            ("FundCode", Value::from("B")),
            ("Obligations", Value::from("1250.75")),
            ("StartDate", Value::from("2023-10-01")),
            ("Status", Value::Null),
        ])
        .unwrap();
        let projector = RowProjector::new();
        assert_eq!(projector.field_text(&row, "FundCode"), Some("B".to_string()));
        assert_eq!(projector.field_text(&row, "Status"), None);
        assert!((projector.numeric_value(&row, "Obligations") - 1250.75).abs() < f64::EPSILON);
        assert_eq!(
            projector.date_value(&row, "StartDate"),
            NaiveDate::from_ymd_opt(2023, 10, 1)
        );
    }

    #[test]
    fn test_field_accessor_failures() {
        let (projector, sink) = recording();
        let row = Row::from_pairs([("Amount", "lots"), ("Name", "n")]).unwrap();
        assert!(matches!(
            projector.try_field_text(&row, "Amount"),
            Err(BindError::UnrecognizedField(_))
        ));
        assert!(matches!(
            projector.try_field_text(&row, "FundCode"),
            Err(BindError::ColumnNotFound(_))
        ));
        assert!(matches!(
            projector.try_numeric_value(&row, "Amount"),
            Err(BindError::ValueCoercion { .. })
        ));
        assert!(projector.numeric_value(&row, "Amount").abs() < f64::EPSILON);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_table_classification() {
        let mut table = Table::new("Allocations", vec!["ID".to_string(), "Amount".to_string()]).unwrap();
        let projector = RowProjector::new();
        assert!(!projector.table_has_primary_key(&table));
        table.insert(vec![Value::Integer(1), Value::Real(2.0)]).unwrap();
        assert!(projector.table_has_primary_key(&table));
        assert!(projector.table_has_numeric_column(&table));
    }
}
