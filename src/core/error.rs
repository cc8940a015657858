use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindError {
    #[error("Row has no columns")]
    EmptyInput,
    #[error("Row has no usable columns")]
    EmptyResult,
    #[error("Unknown provider '{0}'")]
    UnknownProvider(String),
    #[error("Unknown logic '{0}'")]
    UnknownLogic(String),
    #[error("Primary key '{column}' value '{value}' is not an integer")]
    KeyCoercion { column: String, value: String },
    #[error("Column count mismatch: expected {expected}, got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("Row {index} out of range: table has {rows} rows")]
    RowOutOfRange { index: usize, rows: usize },
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("'{0}' is not a recognized field name")]
    UnrecognizedField(String),
    #[error("Value '{value}' in column '{column}' cannot be read as {expected}")]
    ValueCoercion {
        column: String,
        value: String,
        expected: &'static str,
    },
    #[error("Vocabulary '{0}' is empty")]
    EmptyVocabulary(&'static str),
    #[error("Name '{name}' appears more than once in vocabulary '{category}'")]
    DuplicateVocabularyName { category: &'static str, name: String },
    #[error("Unsupported JSON value: {0}")]
    UnsupportedJson(String),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
