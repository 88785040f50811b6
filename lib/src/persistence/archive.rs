// lib/src/persistence/archive.rs

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use models::PatientRecord;

use crate::config::ARCHIVE_HEADER;
use crate::errors::{LineError, Result, StoreError};
use crate::persistence::codec::{decode_line, encode_record};

/// Outcome of a bulk load: every line that decoded, plus the ones that did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub records: Vec<PatientRecord>,
    pub rejected: Vec<LineError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

fn is_header(line: &str) -> bool {
    line.trim_start().starts_with("PatientID")
}

/// Reads archive lines from `reader`. Blank lines and a leading header are
/// skipped. A line that fails to decode is recorded in the report and the
/// rest of the input is still read; only I/O failures abort.
pub fn read_records<R: BufRead>(reader: R) -> Result<LoadReport> {
    let mut report = LoadReport::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if line.trim().is_empty() || (line_number == 1 && is_header(&line)) {
            continue;
        }
        match decode_line(&line, line_number) {
            Ok(record) => report.records.push(record),
            Err(err) => {
                warn!("Skipping archive {}", err);
                report.rejected.push(err);
            }
        }
    }
    Ok(report)
}

/// Writes one line per record, optionally preceded by the header. Returns the
/// number of records written.
pub fn write_records<'a, W, I>(writer: &mut W, records: I, header: bool) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a PatientRecord>,
{
    if header {
        writeln!(writer, "{}", ARCHIVE_HEADER)?;
    }
    let mut written = 0;
    for record in records {
        writeln!(writer, "{}", encode_record(record)?)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Replaces the archive at `path`. The records are written to a temporary
/// file next to it which is then renamed over the target, so a failed encode
/// leaves the old archive untouched.
pub fn save_to_file<'a, I>(path: &Path, records: I, header: bool) -> Result<usize>
where
    I: IntoIterator<Item = &'a PatientRecord>,
{
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp_file = NamedTempFile::new_in(directory)?;
    let written = {
        let mut buf = BufWriter::new(temp_file.as_file());
        write_records(&mut buf, records, header)?
    };
    temp_file
        .persist(path)
        .map_err(|e| StoreError::IoError(e.error))?;
    info!("Saved {} patient records to {:?}", written, path);
    Ok(written)
}

/// Loads the archive at `path`. A missing file is an empty archive.
pub fn load_from_file(path: &Path) -> Result<LoadReport> {
    if !path.exists() {
        debug!("Archive {:?} does not exist, starting empty", path);
        return Ok(LoadReport::default());
    }
    let file = File::open(path)?;
    let report = read_records(BufReader::new(file))?;
    info!(
        "Loaded {} patient records from {:?} ({} rejected)",
        report.records.len(),
        path,
        report.rejected.len()
    );
    Ok(report)
}
