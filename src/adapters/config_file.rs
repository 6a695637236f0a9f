//! JSON config file adapter.
//!
//! Implements [`ConfigPort`] over a file on disk.  A missing file is
//! reported as [`ConfigError::NotFound`] so the host can fall back to
//! defaults; anything present must parse and validate.

use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::AirlockConfig;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<AirlockConfig, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound);
            }
            Err(e) => return Err(ConfigError::IoError(e)),
        };
        let config: AirlockConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        config.validate().map_err(ConfigError::ValidationFailed)?;
        info!("Config: loaded {}", self.path.display());
        Ok(config)
    }
}
