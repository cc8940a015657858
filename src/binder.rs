/// Provider-tagged parameter binding and predicate building
///
/// Works on the shape of an [`OrderedFieldMap`] only. Back-end native
/// parameter objects are built by the data-access layer from the
/// [`BindParameter`]s produced here.
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use crate::core::{BindError, ColumnScan, OrderedFieldMap, Row, Value};
use crate::notify::{guard, FailureSink, LogSink};
use crate::vocabulary::SchemaVocabulary;

/// Back-end family a parameter list is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Provider {
    /// Embedded file-based engine.
    #[serde(rename = "SQLite")]
    Sqlite,
    /// Compact embedded relational engine.
    SqlCe,
    /// Generic tabular-file / ODBC-style source (spreadsheets, desktop databases).
    OleDb,
    /// Client-server relational engine.
    SqlServer,
}

impl Provider {
    pub const ALL: [Self; 4] = [Self::Sqlite, Self::SqlCe, Self::OleDb, Self::SqlServer];

    /// OleDb binds by position, the others by name.
    #[must_use]
    pub const fn is_positional(self) -> bool {
        matches!(self, Self::OleDb)
    }

    /// Bind marker for `column` as it appears in command text.
    #[must_use]
    pub fn placeholder(self, column: &str) -> String {
        if self.is_positional() {
            "?".to_string()
        } else {
            format!("@{column}")
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "SQLite"),
            Self::SqlCe => write!(f, "SqlCe"),
            Self::OleDb => write!(f, "OleDb"),
            Self::SqlServer => write!(f, "SqlServer"),
        }
    }
}

impl FromStr for Provider {
    type Err = BindError;

    /// Case-insensitive; `Excel` and `Access` are OleDb sources.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "sqlce" => Ok(Self::SqlCe),
            "oledb" | "excel" | "access" => Ok(Self::OleDb),
            "sqlserver" => Ok(Self::SqlServer),
            _ => Err(BindError::UnknownProvider(tag.to_string())),
        }
    }
}

impl TryFrom<String> for Provider {
    type Error = BindError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

/// Connective used between equality terms of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Logic {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl std::fmt::Display for Logic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for Logic {
    type Err = BindError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            _ => Err(BindError::UnknownLogic(tag.to_string())),
        }
    }
}

impl TryFrom<String> for Logic {
    type Error = BindError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindParameter {
    pub provider: Provider,
    pub source_column: String,
    pub value: Value,
}

impl BindParameter {
    #[must_use]
    pub fn placeholder(&self) -> String {
        self.provider.placeholder(&self.source_column)
    }
}

#[derive(Clone)]
pub struct ParameterBinder {
    vocabulary: Arc<SchemaVocabulary>,
    sink: Arc<dyn FailureSink>,
}

impl Default for ParameterBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterBinder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            vocabulary: SchemaVocabulary::standard(),
            sink: Arc::new(LogSink),
        }
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Arc<SchemaVocabulary>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn FailureSink>) -> Self {
        self.sink = sink;
        self
    }

    /// One parameter per named entry, in map order.
    #[must_use]
    pub fn bind_with(&self, map: &OrderedFieldMap, provider: Provider) -> Vec<BindParameter> {
        let params: Vec<BindParameter> = map
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| BindParameter {
                provider,
                source_column: name.to_string(),
                value: value.clone(),
            })
            .collect();
        log::debug!("bound {} parameters for {provider}", params.len());
        params
    }

    pub fn try_bind(&self, map: &OrderedFieldMap, tag: &str) -> Result<Vec<BindParameter>, BindError> {
        let provider: Provider = tag.parse()?;
        Ok(self.bind_with(map, provider))
    }

    pub fn bind(&self, map: &OrderedFieldMap, tag: &str) -> Vec<BindParameter> {
        guard(&*self.sink, "bind", self.try_bind(map, tag), Vec::new)
    }

    pub fn try_bind_row(&self, row: &Row, tag: &str) -> Result<Vec<BindParameter>, BindError> {
        let map = OrderedFieldMap::from_row(row)?;
        self.try_bind(&map, tag)
    }

    pub fn bind_row(&self, row: &Row, tag: &str) -> Vec<BindParameter> {
        guard(&*self.sink, "bind_row", self.try_bind_row(row, tag), Vec::new)
    }

    /// Equality predicate over the map.
    ///
    /// A map holding a non-null primary-key column (column 0 included)
    /// yields only `<key> = <value>`. Otherwise every entry is joined with
    /// `logic`; null entries render as `<name> IS NULL`.
    #[must_use]
    pub fn to_predicate(&self, map: &OrderedFieldMap, logic: Logic) -> String {
        if let Some((_, key, value)) = map.find(ColumnScan::FromFirst, |name| {
            self.vocabulary.is_primary_key_name(name) && map.get(name).is_some_and(|v| !v.is_null())
        }) {
            return format!("{key} = {value}");
        }
        map.iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| {
                if value.is_null() {
                    format!("{name} IS NULL")
                } else {
                    format!("{name} = {value}")
                }
            })
            .collect::<Vec<_>>()
            .join(format!(" {logic} ").as_str())
    }

    pub fn try_predicate(&self, map: &OrderedFieldMap, logic: &str) -> Result<String, BindError> {
        let logic: Logic = logic.parse()?;
        Ok(self.to_predicate(map, logic))
    }

    pub fn predicate(&self, map: &OrderedFieldMap, logic: &str) -> String {
        guard(&*self.sink, "predicate", self.try_predicate(map, logic), String::new)
    }

    /// Bind markers for `params`, in order.
    #[must_use]
    pub fn placeholders(params: &[BindParameter]) -> Vec<String> {
        params.iter().map(BindParameter::placeholder).collect()
    }
}
