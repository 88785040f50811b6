// models/src/errors.rs

pub use thiserror::Error;

use crate::medical::PatientId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntakeError {
    #[error("patient with id {0} was not found")]
    NotFound(PatientId),
    /// The replacement record carries a different key than the node it targets.
    #[error("record key mismatch: expected id {expected}, found {found}")]
    KeyMismatch { expected: PatientId, found: PatientId },
    /// Every id above the highest stored one has been handed out.
    #[error("no patient ids left to assign")]
    IdSpaceExhausted,
    #[error("patient id {0} is already in use")]
    DuplicateId(PatientId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A validation error raised while accepting patient data at intake.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// The patient name is empty or whitespace only.
    #[error("patient name cannot be empty")]
    EmptyName,
    /// The age is outside the accepted range.
    #[error("invalid age {0}: age must be greater than zero")]
    InvalidAge(u32),
    /// The symptoms description is empty or whitespace only.
    #[error("symptoms cannot be empty")]
    EmptySymptoms,
    /// A priority level that does not map onto Critical, Urgent or Standard.
    #[error("invalid priority level '{0}': expected 1 (Critical), 2 (Urgent) or 3 (Standard)")]
    InvalidPriority(String),
}

/// A type alias for a `Result` that returns an `IntakeError` on failure.
pub type IntakeResult<T> = Result<T, IntakeError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
