// models/src/medical/registration.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};
use crate::medical::patient::{PatientId, PatientRecord};
use crate::medical::triage::PriorityLevel;

/// The caller-supplied part of a registration. The store assigns the id and
/// the admission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientIntake {
    pub name: String,
    pub age: u32,
    pub symptoms: String,
    pub priority: PriorityLevel,
}

impl PatientIntake {
    pub fn new(name: impl Into<String>, age: u32, symptoms: impl Into<String>, priority: PriorityLevel) -> Self {
        PatientIntake {
            name: name.into(),
            age,
            symptoms: symptoms.into(),
            priority,
        }
    }

    /// Checks the same rules the registration form enforces: a name, a
    /// positive age and a description of symptoms.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.age == 0 {
            return Err(ValidationError::InvalidAge(self.age));
        }
        if self.symptoms.trim().is_empty() {
            return Err(ValidationError::EmptySymptoms);
        }
        Ok(())
    }

    pub fn into_record(self, id: PatientId, admitted_at: DateTime<Utc>) -> PatientRecord {
        PatientRecord {
            id,
            name: self.name,
            age: self.age,
            symptoms: self.symptoms,
            priority: self.priority,
            admitted_at,
        }
    }
}

impl From<&PatientRecord> for PatientIntake {
    fn from(record: &PatientRecord) -> Self {
        PatientIntake {
            name: record.name.clone(),
            age: record.age,
            symptoms: record.symptoms.clone(),
            priority: record.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_complete_intake() {
        let intake = PatientIntake::new("Emily Johnson", 28, "High Fever, Cough", PriorityLevel::Urgent);
        assert_eq!(intake.validate(), Ok(()));
    }

    #[test]
    fn should_reject_blank_name() {
        let intake = PatientIntake::new("   ", 28, "Cough", PriorityLevel::Urgent);
        assert_eq!(intake.validate(), Err(ValidationError::EmptyName));
    }

    #[test]
    fn should_reject_zero_age() {
        let intake = PatientIntake::new("Emily", 0, "Cough", PriorityLevel::Urgent);
        assert_eq!(intake.validate(), Err(ValidationError::InvalidAge(0)));
    }

    #[test]
    fn should_reject_blank_symptoms() {
        let intake = PatientIntake::new("Emily", 28, "", PriorityLevel::Urgent);
        assert_eq!(intake.validate(), Err(ValidationError::EmptySymptoms));
    }

    #[test]
    fn should_build_record_with_assigned_id() {
        let now = Utc::now();
        let record = PatientIntake::new("Lisa Anderson", 23, "Ankle Sprain", PriorityLevel::Standard)
            .into_record(1006, now);
        assert_eq!(record.id, 1006);
        assert_eq!(record.admitted_at, now);
        assert_eq!(PatientIntake::from(&record).name, "Lisa Anderson");
    }
}
