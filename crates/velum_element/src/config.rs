//! Stage configuration (`velum.toml`)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use velum_animation::AnimationContext;

use crate::error::ConfigError;

/// Top-level stage configuration
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct StageConfig {
    /// Context used by `ElementMut::animate_default`
    #[serde(default)]
    pub animation: AnimationContext,
}

impl StageConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: StageConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path.as_ref())?;
        tracing::debug!("Loaded stage config from {}", path.as_ref().display());
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let duration = self.animation.duration_secs;
        if !duration.is_finite() || duration < 0.0 {
            return Err(ConfigError::InvalidDuration(duration));
        }
        Ok(())
    }
}
