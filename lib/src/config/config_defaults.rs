// lib/src/config/config_defaults.rs

use std::path::PathBuf;
pub use crate::config::config_constants::*;

pub fn default_base_patient_id() -> u32 { DEFAULT_BASE_PATIENT_ID }
pub fn default_data_file() -> PathBuf { PathBuf::from(DEFAULT_DATA_FILE) }
// Archived patients are already treated or discharged; do not requeue them.
pub fn default_enqueue_on_load() -> bool { false }
pub fn default_write_header() -> bool { false }
pub fn default_autosave() -> bool { true }
pub fn default_strict_load() -> bool { false }
