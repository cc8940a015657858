use serde::Deserialize;
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use super::error::BindError;
use super::row::{check_unique, Row};
use super::value::Value;

/// A named table: one column list shared by every row.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

/// JSON layout accepted by [`Table::from_json`]:
/// `{"name": "...", "columns": [...], "rows": [[...], ...]}`.
#[derive(Debug, Deserialize)]
struct TableDocument {
    #[serde(default)]
    name: String,
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<serde_json::Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Result<Self, BindError> {
        check_unique(&columns)?;
        Ok(Self {
            name: name.into(),
            columns: columns.into(),
            rows: Vec::new(),
        })
    }

    pub fn from_json(text: &str) -> Result<Self, BindError> {
        let doc: TableDocument = serde_json::from_str(text)?;
        let mut table = Self::new(doc.name, doc.columns)?;
        for raw in doc.rows {
            let values = raw
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            table.insert(values)?;
        }
        Ok(table)
    }

    pub fn insert(&mut self, values: Vec<Value>) -> Result<(), BindError> {
        let row = Row::with_shared_columns(Arc::clone(&self.columns), values)?;
        self.rows.push(row);
        Ok(())
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Column name to position, in table order.
    #[must_use]
    pub fn column_indexes(&self) -> IndexMap<String, usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect()
    }

    /// Distinct rendered values of `column`, in first-seen order. Nulls are skipped.
    pub fn unique_values(&self, column: &str) -> Result<Vec<String>, BindError> {
        let idx = self
            .get_column_index(column)
            .ok_or_else(|| BindError::ColumnNotFound(column.to_string()))?;
        let unique: IndexSet<String> = self
            .rows
            .iter()
            .filter_map(|row| row.values().get(idx))
            .filter(|v| !v.is_null())
            .map(ToString::to_string)
            .collect();
        Ok(unique.into_iter().collect())
    }

    /// Rows whose rendered value in `column` equals `filter`.
    pub fn filter(&self, column: &str, filter: &str) -> Result<Vec<&Row>, BindError> {
        let idx = self
            .get_column_index(column)
            .ok_or_else(|| BindError::ColumnNotFound(column.to_string()))?;
        Ok(self
            .rows
            .iter()
            .filter(|row| row.values().get(idx).is_some_and(|v| v.to_string() == filter))
            .collect())
    }
}
