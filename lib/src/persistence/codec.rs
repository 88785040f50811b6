// lib/src/persistence/codec.rs

//! Single-line encoding of a patient record.
//!
//! `id,name,age,symptoms,priorityLevel,priorityLabel,admittedAt`, with text
//! quoted when it carries a delimiter, a quote or edge whitespace. Symptoms
//! are always quoted. Embedded quotes are doubled.

use chrono::{DateTime, SubsecRound, Utc};

use models::{PatientId, PatientIntake, PatientRecord, PriorityLevel};

use crate::errors::{LineError, Result, StoreError};

const DELIMITER: char = ',';
const QUOTE: char = '"';

fn needs_quoting(text: &str) -> bool {
    text.contains(DELIMITER)
        || text.contains(QUOTE)
        || text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
}

fn encode_text(id: PatientId, field: &str, text: &str, always_quote: bool) -> Result<String> {
    if text.contains(['\n', '\r']) {
        return Err(StoreError::Unencodable {
            id,
            reason: format!("{} contains a line break", field),
        });
    }
    if always_quote || needs_quoting(text) {
        Ok(format!("{QUOTE}{}{QUOTE}", text.replace(QUOTE, "\"\"")))
    } else {
        Ok(text.to_string())
    }
}

/// Encodes `record` as one archive line, without the trailing newline.
pub fn encode_record(record: &PatientRecord) -> Result<String> {
    let name = encode_text(record.id, "name", &record.name, false)?;
    let symptoms = encode_text(record.id, "symptoms", &record.symptoms, true)?;
    Ok(format!(
        "{},{},{},{},{},{},{}",
        record.id,
        name,
        record.age,
        symptoms,
        record.priority.level(),
        record.priority.label(),
        record.admitted_at.timestamp(),
    ))
}

/// Splits a line into fields, undoing the quoting. Unquoted fields are
/// trimmed; quoted fields are taken verbatim.
fn split_fields(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| *c == ' ' || *c == '\t') {
            chars.next();
        }

        let mut field = String::new();
        if chars.peek() == Some(&QUOTE) {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                if c == QUOTE {
                    if chars.peek() == Some(&QUOTE) {
                        chars.next();
                        field.push(QUOTE);
                    } else {
                        closed = true;
                        break;
                    }
                } else {
                    field.push(c);
                }
            }
            if !closed {
                return Err(format!("unterminated quoted field {}", fields.len() + 1));
            }
            while chars.peek().is_some_and(|c| *c == ' ' || *c == '\t') {
                chars.next();
            }
            match chars.next() {
                None => {
                    fields.push(field);
                    return Ok(fields);
                }
                Some(DELIMITER) => fields.push(field),
                Some(other) => {
                    return Err(format!(
                        "unexpected '{}' after quoted field {}",
                        other,
                        fields.len() + 1
                    ))
                }
            }
        } else {
            let mut ended = true;
            for c in chars.by_ref() {
                if c == DELIMITER {
                    ended = false;
                    break;
                }
                field.push(c);
            }
            fields.push(field.trim().to_string());
            if ended {
                return Ok(fields);
            }
        }
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> std::result::Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("{} '{}' is not a number", field, value))
}

/// Decodes one archive line. `line_number` is 1-based and only used for
/// error reporting. Lines without the label and timestamp columns are
/// admitted now.
pub fn decode_line(line: &str, line_number: usize) -> std::result::Result<PatientRecord, LineError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields = split_fields(line).map_err(|reason| LineError::new(line_number, reason))?;

    if !matches!(fields.len(), 5 | 7) {
        return Err(LineError::new(
            line_number,
            format!("expected 5 or 7 fields, found {}", fields.len()),
        ));
    }

    let fail = |reason: String| LineError::new(line_number, reason);

    let id: PatientId = parse_number("id", &fields[0]).map_err(fail)?;
    let age: u32 = parse_number("age", &fields[2]).map_err(fail)?;
    let level: u8 = parse_number("priority", &fields[4]).map_err(fail)?;
    let priority = PriorityLevel::try_from(level).map_err(|e| fail(e.to_string()))?;

    let admitted_at = match fields.get(6) {
        Some(raw) => {
            let seconds: i64 = parse_number("admission time", raw).map_err(fail)?;
            DateTime::<Utc>::from_timestamp(seconds, 0)
                .ok_or_else(|| fail(format!("admission time '{}' is out of range", raw)))?
        }
        None => Utc::now().trunc_subsecs(0),
    };

    let intake = PatientIntake::new(fields[1].clone(), age, fields[3].clone(), priority);
    intake.validate().map_err(|e| fail(e.to_string()))?;
    Ok(intake.into_record(id, admitted_at))
}
