use serde::{Deserialize, Serialize};

/// Where and how to reach the player query service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub query_path: String,
    pub accept: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            query_path: "/query".to_string(),
            accept: "text/event-stream".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "configs")]
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(feature = "configs")]
pub mod configuration {
    use std::path::Path;

    use config::{Config, Environment, File};
    use tracing::debug;

    use super::{ClientConfig, ConfigError};

    /// Environment variables with this prefix override file values, e.g. `KYP_BASE_URL`.
    pub const ENV_PREFIX: &str = "KYP";

    impl ClientConfig {
        /// Layers an optional config file and `KYP_*` environment variables over the defaults.
        pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
            let mut builder = Config::builder();
            if let Some(path) = path {
                debug!(path = %path.display(), "loading client config file");
                builder = builder.add_source(File::from(path).required(true));
            }
            let settings = builder
                .add_source(Environment::with_prefix(ENV_PREFIX))
                .build()?;

            let loaded: ClientConfig = settings.try_deserialize()?;
            if loaded.base_url.trim().is_empty() {
                return Err(ConfigError::Invalid("base_url must not be empty".into()));
            }
            Ok(loaded)
        }
    }
}
