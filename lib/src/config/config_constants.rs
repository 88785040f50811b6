// lib/src/config/config_constants.rs

/// Id handed to the first patient registered into an empty store.
pub const DEFAULT_BASE_PATIENT_ID: u32 = 1001;
pub const DEFAULT_DATA_FILE: &str = "patients.csv";
/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_PATH: &str = "intake.toml";
pub const ARCHIVE_HEADER: &str = "PatientID,Name,Age,Symptoms,Priority,PriorityLabel,AdmittedAt";
