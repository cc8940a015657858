// rowbind - convention-based row projection and parameter binding
// Modular layout: core data model, vocabulary, projector, binder

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

// Core data structures (values, rows, tables, field maps, errors)
pub mod core;

// Closed name sets used for column inference
pub mod vocabulary;

// Failure sinks for sentinel-returning operations
pub mod notify;

// Row to field map projection and key inference
pub mod projector;

// Provider-tagged bind parameters and predicates
pub mod binder;

// File + environment settings
pub mod settings;

// Re-export commonly used types for convenience
pub use crate::core::{BindError, ColumnScan, OrderedFieldMap, Row, Table, Value};
pub use vocabulary::{ColumnRole, SchemaVocabulary};
pub use notify::{FailureSink, LogSink, RecordingSink};
pub use projector::{PrimaryKey, RowProjector};
pub use binder::{BindParameter, Logic, ParameterBinder, Provider};
pub use settings::RowbindConfig;
