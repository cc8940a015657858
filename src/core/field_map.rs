use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use super::error::BindError;
use super::row::Row;
use super::value::Value;

/// Which columns a name-based lookup inspects.
///
/// Single-row key lookups conventionally skip column 0, which holds the
/// table's own surrogate id. `FromFirst` inspects every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnScan {
    #[default]
    SkipFirst,
    FromFirst,
}

impl ColumnScan {
    #[must_use]
    pub const fn start(self) -> usize {
        match self {
            Self::SkipFirst => 1,
            Self::FromFirst => 0,
        }
    }
}

/// Column name to value, in the originating row's column order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedFieldMap {
    fields: IndexMap<String, Value>,
}

/// Equal when both hold the same entries in the same order.
impl PartialEq for OrderedFieldMap {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len() && self.fields.iter().eq(other.fields.iter())
    }
}

impl OrderedFieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects a row, skipping unnamed columns and storing empty text as null.
    pub fn from_row(row: &Row) -> Result<Self, BindError> {
        if row.is_empty() {
            return Err(BindError::EmptyInput);
        }
        let fields: IndexMap<String, Value> = row
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.to_string(), value.clone().or_null()))
            .collect();
        if fields.is_empty() {
            return Err(BindError::EmptyResult);
        }
        Ok(Self { fields })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// First entry at or after the scan's start position whose name matches.
    pub fn find(&self, scan: ColumnScan, mut matches: impl FnMut(&str) -> bool) -> Option<(usize, &str, &Value)> {
        self.fields
            .iter()
            .enumerate()
            .skip(scan.start())
            .find(|(_, (name, _))| matches(name))
            .map(|(idx, (name, value))| (idx, name.as_str(), value))
    }

    /// Same entries ordered by column name.
    #[must_use]
    pub fn sorted(&self) -> BTreeMap<String, Value> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for OrderedFieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a OrderedFieldMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
