// lib/src/config/config_structs.rs

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::config_defaults::*;
use crate::errors::{Result, StoreError};

/// Record store configuration, read from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_base_patient_id")]
    pub base_patient_id: u32,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_enqueue_on_load")]
    pub enqueue_on_load: bool,
    #[serde(default = "default_write_header")]
    pub write_header: bool,
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    /// Refuse to open an archive containing any undecodable line.
    #[serde(default = "default_strict_load")]
    pub strict_load: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            base_patient_id: default_base_patient_id(),
            data_file: default_data_file(),
            enqueue_on_load: default_enqueue_on_load(),
            write_header: default_write_header(),
            autosave: default_autosave(),
            strict_load: default_strict_load(),
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates the configuration stored at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading configuration from file: {:?}", path);
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_patient_id == 0 {
            return Err(StoreError::ConfigurationError(
                "base_patient_id must be greater than zero".to_string(),
            ));
        }
        if self.data_file.as_os_str().is_empty() {
            return Err(StoreError::ConfigurationError("data_file cannot be empty".to_string()));
        }
        Ok(())
    }
}
