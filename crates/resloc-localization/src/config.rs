use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid resolver config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Independent resource map name cannot be empty")]
    EmptyMapName,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Resource map the view-independent loader binds to. `None` uses the
    /// service's own default.
    pub independent_map: Option<String>,
    /// Log key misses at `warn` instead of `trace`.
    pub warn_on_missing: bool,
}

impl ResolverConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.independent_map.as_deref() {
            Some(map) if map.trim().is_empty() => Err(ConfigError::EmptyMapName),
            _ => Ok(()),
        }
    }
}
