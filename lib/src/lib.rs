// lib/src/lib.rs

//! Patient intake core: an id-ordered record archive, a triage queue and the
//! line-based archive format they are loaded from and saved to.

pub mod config;
pub mod database;
pub mod errors;
pub mod persistence;
pub mod storage_engine;

pub use models::{PatientId, PatientIntake, PatientRecord, PriorityLevel};
pub use models::errors::{IntakeError, IntakeResult, ValidationError};

pub use crate::config::{load_store_config, StoreConfig};
pub use crate::database::{RecordStore, StoreStatistics};
pub use crate::errors::{LineError, Result, StoreError};
pub use crate::persistence::LoadReport;
pub use crate::storage_engine::{OrderedIndex, PatientIndex, PriorityQueue, TreeProperties};
