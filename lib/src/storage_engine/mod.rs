// lib/src/storage_engine/mod.rs

// Module declarations
pub mod storage_engine;
pub mod ordered_index;
pub mod priority_queue;

// Re-export key types and traits for external use
pub use storage_engine::PatientIndex;
pub use ordered_index::{OrderedIndex, TreeProperties};
pub use priority_queue::PriorityQueue;
