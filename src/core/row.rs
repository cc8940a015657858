use std::sync::Arc;
use super::error::BindError;
use super::value::Value;

/// One tabular record: column names in table order plus one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Builds a row, checking that every column has a value and that
    /// non-empty column names are unique.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Result<Self, BindError> {
        if values.len() != columns.len() {
            return Err(BindError::ColumnCountMismatch {
                expected: columns.len(),
                actual: values.len(),
            });
        }
        check_unique(&columns)?;
        Ok(Self { columns, values })
    }

    /// Row built from `(column, value)` pairs in the given order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, BindError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(columns.into(), values)
    }

    /// Rows sharing a column list skip the uniqueness check; the list was
    /// validated when the owning table was built.
    pub(crate) fn with_shared_columns(columns: Arc<[String]>, values: Vec<Value>) -> Result<Self, BindError> {
        if values.len() != columns.len() {
            return Err(BindError::ColumnCountMismatch {
                expected: columns.len(),
                actual: values.len(),
            });
        }
        Ok(Self { columns, values })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of columns with a non-empty name.
    #[must_use]
    pub fn non_empty_column_count(&self) -> usize {
        self.columns.iter().filter(|c| !c.is_empty()).count()
    }

    #[must_use]
    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_column_index(name).and_then(|idx| self.values.get(idx))
    }

    /// Iterates `(column, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }
}

pub(crate) fn check_unique(columns: &[String]) -> Result<(), BindError> {
    let mut seen = std::collections::HashSet::with_capacity(columns.len());
    for name in columns.iter().filter(|c| !c.is_empty()) {
        if !seen.insert(name.as_str()) {
            return Err(BindError::DuplicateColumn(name.clone()));
        }
    }
    Ok(())
}
