// lib/src/storage_engine/storage_engine.rs

use models::{PatientRecord, PriorityLevel};

/// Write/count surface shared by the two patient indexes, so the record store
/// can fan a registration out to both and compare what each one holds.
pub trait PatientIndex {
    /// Adds a copy of `record`. Returns `false` if the index declined it.
    fn insert(&mut self, record: PatientRecord) -> bool;
    fn len(&self) -> usize;
    fn count_by_priority(&self, level: PriorityLevel) -> usize;
    fn clear(&mut self);
    fn get_type(&self) -> &'static str;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
