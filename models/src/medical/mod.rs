// models/src/medical/mod.rs

pub mod patient;
pub mod registration;
pub mod triage;

pub use patient::{PatientId, PatientRecord};
pub use registration::PatientIntake;
pub use triage::PriorityLevel;
