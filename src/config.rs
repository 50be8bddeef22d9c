//! Schema generation settings
//!
//! [`SchemaConfig::load`] reads `config/interleave.toml` (optional) and then
//! environment variables prefixed with `INTERLEAVE_DDL`, e.g.
//! `INTERLEAVE_DDL__SCHEMA__ACTION=update`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_CONFIG_FILE: &str = "config/interleave.toml";
const ENV_PREFIX: &str = "INTERLEAVE_DDL";

/// What a schema operation should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaAction {
    /// Emit nothing
    None,
    /// Drop the schema, then create it
    Create,
    /// Create the schema, assuming an empty target
    #[default]
    CreateOnly,
    /// Drop the schema
    Drop,
    /// Create what is missing, consulting the live catalog
    Update,
}

impl SchemaAction {
    /// Incremental mode consults live index metadata before adding unique keys
    pub fn is_update(&self) -> bool {
        matches!(self, SchemaAction::Update)
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub action: SchemaAction,
    /// Bracket each operation with `START BATCH DDL` / `RUN BATCH`
    #[serde(default = "default_true")]
    pub batch_ddl: bool,
    /// In update mode, check live indexes before emitting unique keys
    #[serde(default = "default_true")]
    pub check_live_indexes: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            action: SchemaAction::default(),
            batch_ddl: true,
            check_live_indexes: true,
        }
    }
}

impl SchemaConfig {
    /// Load from `config/interleave.toml`, falling back to env vars
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific file (optional) plus env vars
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if path.exists() {
                    log::warn!(
                        "Failed to load config file {}, falling back to env: {}",
                        path.display(),
                        err
                    );
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        // A missing `schema` section means all defaults.
        match settings.get::<SchemaConfig>("schema") {
            Ok(cfg) => Ok(cfg),
            Err(ConfigError::NotFound(_)) => Ok(SchemaConfig::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Schema configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }

    pub fn with_action(mut self, action: SchemaAction) -> Self {
        self.action = action;
        self
    }

    pub fn without_batching(mut self) -> Self {
        self.batch_ddl = false;
        self
    }
}
