// lib/src/persistence/mod.rs

//! Line-oriented patient archive: codec plus file load/save.

pub mod archive;
pub mod codec;

pub use archive::{load_from_file, read_records, save_to_file, write_records, LoadReport};
pub use codec::{decode_line, encode_record};
