// lib/src/database.rs

use std::path::Path;

use chrono::{SubsecRound, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use models::errors::{IntakeError, IntakeResult};
use models::{PatientId, PatientIntake, PatientRecord, PriorityLevel};

use crate::config::StoreConfig;
use crate::errors::{LineError, Result};
use crate::persistence::{load_from_file, save_to_file};
use crate::storage_engine::{OrderedIndex, PatientIndex, PriorityQueue};

/// Snapshot of the store's counters, as shown by the statistics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    pub total_records: usize,
    pub queued: usize,
    pub critical: usize,
    pub urgent: usize,
    pub standard: usize,
    pub tree_height: usize,
}

/// Patient record store combining the id-ordered archive with the live
/// triage queue.
///
/// Registration writes a copy of the new record into both indexes. Every other
/// mutation touches exactly one of them: removals and updates go to the
/// archive, treatment pops the queue. The two views are allowed to drift apart
/// after registration; `index()` and `queue()` expose each side.
#[derive(Debug)]
pub struct RecordStore {
    index: OrderedIndex,
    queue: PriorityQueue,
    // None once the id above `PatientId::MAX` would be needed.
    next_id: Option<PatientId>,
}

impl RecordStore {
    /// Creates an empty store whose first registration receives `base_id`.
    pub fn new(base_id: PatientId) -> Self {
        RecordStore {
            index: OrderedIndex::new(),
            queue: PriorityQueue::new(),
            next_id: Some(base_id),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.base_patient_id)
    }

    /// Bulk-populates a store from previously persisted records.
    ///
    /// # Arguments
    /// * `records`: Decoded archive records, in any order.
    /// * `base_id`: The id to hand out first if no loaded record exceeds it.
    /// * `enqueue`: Whether the loaded records also join the triage queue.
    ///
    /// # Returns
    /// A store whose next id is one past the highest loaded id. Records whose
    /// id is already present are ignored.
    pub fn from_records<I>(records: I, base_id: PatientId, enqueue: bool) -> Self
    where
        I: IntoIterator<Item = PatientRecord>,
    {
        let mut store = Self::new(base_id);
        for record in records {
            let id = record.id;
            let queued_copy = enqueue.then(|| record.clone());
            if store.index.insert(record) {
                if let Some(copy) = queued_copy {
                    store.queue.insert(copy);
                }
                store.next_id = match (store.next_id, id.checked_add(1)) {
                    (Some(current), Some(after)) => Some(current.max(after)),
                    _ => None,
                };
            } else {
                warn!("Ignoring duplicate patient id {} during load", id);
            }
        }
        debug!(
            "Populated store with {} records, {} queued, next id {:?}",
            store.index.len(),
            store.queue.len(),
            store.next_id
        );
        store
    }

    /// Opens the archive named by `config`, returning the store together with
    /// any lines that could not be decoded. With `strict_load` set the first
    /// such line is an error instead.
    pub fn open(config: &StoreConfig) -> Result<(Self, Vec<LineError>)> {
        let report = load_from_file(&config.data_file)?;
        if let (true, Some(first)) = (config.strict_load, report.rejected.first()) {
            return Err(first.clone().into());
        }
        let store = Self::from_records(report.records, config.base_patient_id, config.enqueue_on_load);
        Ok((store, report.rejected))
    }

    /// Writes the archive in ascending id order.
    pub fn save(&self, path: &Path, header: bool) -> Result<usize> {
        save_to_file(path, &self.index, header)
    }

    /// Registers a new patient.
    ///
    /// # Arguments
    /// * `intake`: The caller-supplied fields; validated before anything is stored.
    ///
    /// # Returns
    /// The assigned id. On any error nothing is stored and no id is consumed.
    /// The admission time is kept to whole seconds, the archive's resolution.
    pub fn register(&mut self, intake: PatientIntake) -> IntakeResult<PatientId> {
        intake.validate()?;

        let id = self.next_id.ok_or(IntakeError::IdSpaceExhausted)?;
        let record = intake.into_record(id, Utc::now().trunc_subsecs(0));
        if !self.index.insert(record.clone()) {
            return Err(IntakeError::DuplicateId(id));
        }
        self.queue.insert(record);
        self.next_id = id.checked_add(1);

        info!("Registered patient {}", id);
        Ok(id)
    }

    pub fn search(&self, id: PatientId) -> Option<&PatientRecord> {
        self.index.search(id)
    }

    /// Rewrites the archived record's non-key fields. The queued copy keeps
    /// the values it was registered with.
    pub fn update(&mut self, id: PatientId, intake: PatientIntake) -> IntakeResult<()> {
        intake.validate()?;

        let mut record = self.index.search(id).cloned().ok_or(IntakeError::NotFound(id))?;
        record.apply(intake);
        self.index.update(id, record)?;

        info!("Updated patient {}", id);
        Ok(())
    }

    /// Removes a record from the archive only.
    pub fn remove(&mut self, id: PatientId) -> Option<PatientRecord> {
        let removed = self.index.remove(id);
        match &removed {
            Some(_) => info!("Removed patient {} from the archive", id),
            None => debug!("Remove of unknown patient {}", id),
        }
        removed
    }

    pub fn next_patient(&self) -> Option<&PatientRecord> {
        self.queue.peek()
    }

    /// Pops the most urgent queued patient. The archive keeps its record.
    pub fn treat_next_patient(&mut self) -> Option<PatientRecord> {
        let treated = self.queue.extract_min();
        match &treated {
            Some(record) => info!("Treating patient {} ({})", record.id, record.priority),
            None => debug!("Treatment requested on an empty queue"),
        }
        treated
    }

    /// Archive contents in ascending id order.
    pub fn all_records(&self) -> Vec<PatientRecord> {
        self.index.in_order()
    }

    pub fn records_by_priority(&self, level: PriorityLevel) -> Vec<PatientRecord> {
        self.index.by_priority(level)
    }

    /// The queue's backing array in heap order.
    pub fn queued_patients(&self) -> &[PatientRecord] {
        self.queue.patients()
    }

    pub fn queue_in_treatment_order(&self) -> Vec<PatientRecord> {
        self.queue.treatment_order()
    }

    pub fn archived_count_by_priority(&self, level: PriorityLevel) -> usize {
        self.index.count_by_priority(level)
    }

    pub fn queued_count_by_priority(&self, level: PriorityLevel) -> usize {
        self.queue.count_by_priority(level)
    }

    pub fn statistics(&self) -> StoreStatistics {
        StoreStatistics {
            total_records: self.index.len(),
            queued: self.queue.len(),
            critical: self.index.count_by_priority(PriorityLevel::Critical),
            urgent: self.index.count_by_priority(PriorityLevel::Urgent),
            standard: self.index.count_by_priority(PriorityLevel::Standard),
            tree_height: self.index.height(),
        }
    }

    pub fn total_records(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn tree_height(&self) -> usize {
        self.index.height()
    }

    /// The id the next successful registration will receive, or `None` once
    /// the id space is used up.
    pub fn next_id(&self) -> Option<PatientId> {
        self.next_id
    }

    /// Empties both indexes. Ids already handed out are not reused.
    pub fn clear(&mut self) {
        let indexes: [&mut dyn PatientIndex; 2] = [&mut self.index, &mut self.queue];
        for index in indexes {
            debug!("Clearing {} with {} entries", index.get_type(), index.len());
            index.clear();
        }
    }

    pub fn index(&self) -> &OrderedIndex {
        &self.index
    }

    pub fn queue(&self) -> &PriorityQueue {
        &self.queue
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ValidationError;
    use models::PriorityLevel::{Critical, Standard, Urgent};

    fn intake(name: &str, priority: PriorityLevel) -> PatientIntake {
        PatientIntake::new(name, 40, "Observation", priority)
    }

    fn scenario_store() -> RecordStore {
        let mut store = RecordStore::new(1001);
        for (n, level) in [Critical, Urgent, Standard, Urgent, Critical].into_iter().enumerate() {
            store.register(intake(&format!("Patient {n}"), level)).unwrap();
        }
        store
    }

    #[test]
    fn test_ids_are_sequential_from_base() {
        let store = scenario_store();
        let ids: Vec<_> = store.all_records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1001, 1002, 1003, 1004, 1005]);
        assert_eq!(store.next_id(), Some(1006));
    }

    #[test]
    fn test_triage_scenario() {
        let mut store = scenario_store();
        assert_eq!(store.next_patient().map(|r| r.priority), Some(Critical));

        assert_eq!(store.treat_next_patient().map(|r| r.priority), Some(Critical));
        assert_eq!(store.treat_next_patient().map(|r| r.priority), Some(Critical));
        assert_eq!(store.next_patient().map(|r| r.priority), Some(Urgent));

        assert_eq!(store.treat_next_patient().map(|r| r.priority), Some(Urgent));
        assert_eq!(store.treat_next_patient().map(|r| r.priority), Some(Urgent));
        assert_eq!(store.treat_next_patient().map(|r| r.id), Some(1003));
        assert!(store.treat_next_patient().is_none());
        assert!(store.next_patient().is_none());
    }

    #[test]
    fn test_invalid_registration_consumes_no_id() {
        let mut store = RecordStore::new(1001);
        let err = store.register(PatientIntake::new("", 30, "Cough", Urgent)).unwrap_err();
        assert_eq!(err, IntakeError::Validation(ValidationError::EmptyName));
        assert!(store.is_empty());
        assert!(store.queue().is_empty());
        assert_eq!(store.register(intake("Emily", Urgent)), Ok(1001));
    }

    #[test]
    fn test_counts_agree_after_registration() {
        let store = scenario_store();
        for level in PriorityLevel::ALL {
            assert_eq!(store.archived_count_by_priority(level), store.queued_count_by_priority(level));
        }
        let stats = store.statistics();
        assert_eq!(
            stats,
            StoreStatistics { total_records: 5, queued: 5, critical: 2, urgent: 2, standard: 1, tree_height: 5 }
        );
    }

    #[test]
    fn test_treatment_leaves_archive_intact() {
        let mut store = scenario_store();
        let treated = store.treat_next_patient().unwrap();
        assert_eq!(store.search(treated.id), Some(&treated));
        assert_eq!(store.total_records(), 5);
        assert_eq!(store.queue().len(), 4);
        assert_eq!(store.queued_count_by_priority(Critical), 1);
        assert_eq!(store.archived_count_by_priority(Critical), 2);
    }

    #[test]
    fn test_remove_leaves_queue_intact() {
        let mut store = scenario_store();
        let removed = store.remove(1001).unwrap();
        assert_eq!(removed.id, 1001);
        assert!(store.search(1001).is_none());
        assert!(store.queue().contains(1001));
        assert_eq!(store.next_patient().map(|r| r.priority), Some(Critical));
        assert!(store.remove(1001).is_none());
    }

    #[test]
    fn test_update_rewrites_archive_only() {
        let mut store = scenario_store();
        store
            .update(1003, PatientIntake::new("Robert Brown", 67, "Stroke Symptoms", Critical))
            .unwrap();

        let archived = store.search(1003).unwrap();
        assert_eq!(archived.name, "Robert Brown");
        assert_eq!(archived.priority, Critical);
        assert_eq!(store.archived_count_by_priority(Critical), 3);
        assert_eq!(store.queued_count_by_priority(Critical), 2);

        let queued = store.queued_patients().iter().find(|r| r.id == 1003).unwrap();
        assert_eq!(queued.priority, Standard);
    }

    #[test]
    fn test_update_errors() {
        let mut store = scenario_store();
        assert_eq!(store.update(2000, intake("Nobody", Urgent)), Err(IntakeError::NotFound(2000)));
        assert!(matches!(
            store.update(1001, PatientIntake::new("John", 0, "Pain", Urgent)),
            Err(IntakeError::Validation(ValidationError::InvalidAge(0)))
        ));
    }

    #[test]
    fn test_from_records_seeds_next_id() {
        let archived = scenario_store().all_records();
        let store = RecordStore::from_records(archived.clone(), 1001, false);
        assert_eq!(store.total_records(), 5);
        assert!(store.queue().is_empty());
        assert_eq!(store.next_id(), Some(1006));

        let requeued = RecordStore::from_records(archived, 1001, true);
        assert_eq!(requeued.queue().len(), 5);
    }

    #[test]
    fn test_from_records_keeps_base_when_higher() {
        let archived = scenario_store().all_records();
        let store = RecordStore::from_records(archived, 5000, false);
        assert_eq!(store.next_id(), Some(5000));
    }

    #[test]
    fn test_from_records_ignores_duplicates() {
        let mut archived = scenario_store().all_records();
        let mut duplicate = archived[0].clone();
        duplicate.name = "Impostor".to_string();
        archived.push(duplicate);

        let store = RecordStore::from_records(archived, 1001, true);
        assert_eq!(store.total_records(), 5);
        assert_eq!(store.queue().len(), 5);
        assert_eq!(store.search(1001).map(|r| r.name.as_str()), Some("Patient 0"));
    }

    #[test]
    fn test_removed_ids_are_not_reused() {
        let mut store = scenario_store();
        store.remove(1005);
        assert_eq!(store.register(intake("Late arrival", Standard)), Ok(1006));
    }

    #[test]
    fn test_clear_empties_both_sides() {
        let mut store = scenario_store();
        store.clear();
        assert!(store.is_empty());
        assert!(store.queue().is_empty());
        assert_eq!(store.tree_height(), 0);
        assert_eq!(store.next_id(), Some(1006));
    }

    #[test]
    fn test_treatment_order_view() {
        let store = scenario_store();
        let order: Vec<_> = store.queue_in_treatment_order().into_iter().map(|r| r.priority).collect();
        assert_eq!(order, vec![Critical, Critical, Urgent, Urgent, Standard]);
        assert_eq!(store.queued_patients().len(), 5);
    }

    #[test]
    fn test_admission_time_has_whole_seconds() {
        use chrono::Timelike;

        let store = scenario_store();
        for record in store.all_records() {
            assert_eq!(record.admitted_at.nanosecond(), 0, "patient {}", record.id);
        }
    }

    #[test]
    fn test_last_id_exhausts_the_id_space() {
        let last = PatientRecord::new(PatientId::MAX, "Last", 70, "Fall", Standard, Utc::now());
        let mut store = RecordStore::from_records([last.clone()], 1001, false);
        assert_eq!(store.next_id(), None);

        assert_eq!(store.register(intake("Late arrival", Critical)), Err(IntakeError::IdSpaceExhausted));
        assert_eq!(store.total_records(), 1);
        assert_eq!(store.search(PatientId::MAX), Some(&last));
        assert!(store.queue().is_empty());
    }

    #[test]
    fn test_registering_the_maximum_id_once() {
        let mut store = RecordStore::new(PatientId::MAX);
        assert_eq!(store.register(intake("Only one", Urgent)), Ok(PatientId::MAX));
        assert_eq!(store.next_id(), None);
        assert_eq!(store.register(intake("One too many", Urgent)), Err(IntakeError::IdSpaceExhausted));
        assert_eq!(store.total_records(), 1);
        assert_eq!(store.queue().len(), 1);
    }
}
