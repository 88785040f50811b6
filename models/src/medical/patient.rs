// models/src/medical/patient.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::medical::registration::PatientIntake;
use crate::medical::triage::PriorityLevel;

/// Unique patient key within a record store.
pub type PatientId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: PatientId,
    pub name: String,
    pub age: u32,
    pub symptoms: String,
    pub priority: PriorityLevel,
    pub admitted_at: DateTime<Utc>, // informational only, never used for ordering
}

impl PatientRecord {
    pub fn new(
        id: PatientId,
        name: impl Into<String>,
        age: u32,
        symptoms: impl Into<String>,
        priority: PriorityLevel,
        admitted_at: DateTime<Utc>,
    ) -> Self {
        PatientRecord {
            id,
            name: name.into(),
            age,
            symptoms: symptoms.into(),
            priority,
            admitted_at,
        }
    }

    /// Overwrites every non-key attribute from `intake`. The id and the
    /// admission time are kept.
    pub fn apply(&mut self, intake: PatientIntake) {
        self.name = intake.name;
        self.age = intake.age;
        self.symptoms = intake.symptoms;
        self.priority = intake.priority;
    }

    /// The `(id, name, age, symptoms, priority)` tuple that survives a
    /// save/load cycle.
    pub fn persisted_fields(&self) -> (PatientId, &str, u32, &str, PriorityLevel) {
        (self.id, &self.name, self.age, &self.symptoms, self.priority)
    }
}
