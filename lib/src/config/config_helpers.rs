// lib/src/config/config_helpers.rs

use std::path::PathBuf;

use log::debug;

use crate::config::config_constants::DEFAULT_CONFIG_PATH;
use crate::config::config_structs::StoreConfig;
use crate::errors::Result;

/// Resolves the store configuration: the explicit path if given, otherwise
/// `intake.toml` in the working directory if it exists, otherwise defaults.
pub fn load_store_config(config_file_path: Option<PathBuf>) -> Result<StoreConfig> {
    let path = match config_file_path {
        Some(path) => path,
        None => {
            let project_config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !project_config_path.exists() {
                debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
                return Ok(StoreConfig::default());
            }
            project_config_path
        }
    };

    let config = StoreConfig::load(&path)?;
    debug!("Final validated configuration: {:?}", config);
    Ok(config)
}
