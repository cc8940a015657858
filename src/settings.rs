/// Layered settings
///
/// Priority: explicit file (or the first existing default file) <
/// `ROWBIND_*` environment variables. Command-line flags are applied on top
/// by the binary.
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use crate::binder::{Logic, ParameterBinder, Provider};
use crate::core::{BindError, ColumnScan};
use crate::notify::FailureSink;
use crate::projector::RowProjector;
use crate::vocabulary::{SchemaVocabulary, VocabularyConfig};

pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["/etc/rowbind/rowbind.toml", "./rowbind.toml"];

/// `ROWBIND_*` variables; `__` descends into tables and the vocabulary
/// lists are comma separated (`ROWBIND_VOCABULARY__PRIMARY_KEYS=ContractId,LineId`).
fn environment() -> Environment {
    Environment::with_prefix("ROWBIND")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("vocabulary.primary_keys")
        .with_list_parse_key("vocabulary.numeric_fields")
        .with_list_parse_key("vocabulary.fields")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RowbindConfig {
    #[serde(default = "default_provider")]
    pub default_provider: Provider,
    #[serde(default)]
    pub default_logic: Logic,
    #[serde(default)]
    pub key_scan: ColumnScan,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

const fn default_provider() -> Provider {
    Provider::SqlServer
}

impl Default for RowbindConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            default_logic: Logic::default(),
            key_scan: ColumnScan::default(),
            vocabulary: VocabularyConfig::default(),
        }
    }
}

impl RowbindConfig {
    /// Loads `path` (which must exist) or the first existing default path,
    /// then applies the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, BindError> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, BindError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
            log::info!("loaded config from {}", path.display());
        } else if let Some(found) = DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            builder = builder.add_source(File::with_name(found));
            log::info!("loaded config from {found}");
        }

        builder = builder.add_source(env);

        Ok(builder.build()?.try_deserialize()?)
    }

    /// The standard vocabulary when no extra names are configured.
    pub fn vocabulary(&self) -> Result<Arc<SchemaVocabulary>, BindError> {
        if self.vocabulary.is_empty() {
            Ok(SchemaVocabulary::standard())
        } else {
            SchemaVocabulary::extended(&self.vocabulary).map(Arc::new)
        }
    }

    pub fn projector(&self, sink: Arc<dyn FailureSink>) -> Result<RowProjector, BindError> {
        Ok(RowProjector::new()
            .with_vocabulary(self.vocabulary()?)
            .with_scan(self.key_scan)
            .with_sink(sink))
    }

    pub fn binder(&self, sink: Arc<dyn FailureSink>) -> Result<ParameterBinder, BindError> {
        Ok(ParameterBinder::new()
            .with_vocabulary(self.vocabulary()?)
            .with_sink(sink))
    }
}
