// models/src/lib.rs

//! Domain types for the emergency-department intake store: the patient
//! record, the intake form it is built from, the triage priority scale and
//! the errors raised while accepting or looking up patients.

pub mod errors;
pub mod medical;

pub use errors::{IntakeError, IntakeResult, ValidationError, ValidationResult};
pub use medical::{PatientId, PatientIntake, PatientRecord, PriorityLevel};
