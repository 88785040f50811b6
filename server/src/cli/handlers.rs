// server/src/cli/handlers.rs

// Executes parsed commands against a loaded record store and renders the
// results for the terminal.

use anyhow::{anyhow, Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::{self, Stylize};
use crossterm::terminal::{Clear, ClearType};
use log::debug;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

use intake::{PatientIntake, PatientRecord, PriorityLevel, RecordStore, StoreConfig, StoreStatistics};

use crate::cli::commands::PatientCommand;

/// A loaded store plus the settings that decide how it is shown and saved.
#[derive(Debug)]
pub struct Session {
    pub store: RecordStore,
    pub config: StoreConfig,
    pub json: bool,
    dirty: bool,
}

impl Session {
    pub fn new(store: RecordStore, config: StoreConfig, json: bool) -> Self {
        Session { store, config, json, dirty: false }
    }

    /// True when the archive changed since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Saves the archive if it changed and autosave is on.
    pub fn autosave(&mut self) -> Result<()> {
        if !self.dirty || !self.config.autosave {
            return Ok(());
        }
        let path = self.config.data_file.clone();
        save_archive(self, path)?;
        Ok(())
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn format_record(record: &PatientRecord) -> String {
    format!(
        "Patient {}\n  Name:      {}\n  Age:       {}\n  Symptoms:  {}\n  Priority:  {} ({})\n  Admitted:  {}",
        record.id,
        record.name,
        record.age,
        record.symptoms,
        record.priority.level(),
        record.priority,
        record.admitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}

pub fn format_table(records: &[PatientRecord]) -> String {
    let mut out = format!("{:<6} {:<24} {:>4}  {:<9} {}", "ID", "Name", "Age", "Priority", "Symptoms");
    for record in records {
        out.push_str(&format!(
            "\n{:<6} {:<24} {:>4}  {:<9} {}",
            record.id, record.name, record.age, record.priority.label(), record.symptoms
        ));
    }
    out
}

fn format_statistics(stats: &StoreStatistics) -> String {
    format!(
        "Archived patients: {}\n  Critical: {}\n  Urgent:   {}\n  Standard: {}\nWaiting in queue:  {}\nTree height:       {}",
        stats.total_records, stats.critical, stats.urgent, stats.standard, stats.queued, stats.tree_height
    )
}

fn records_output(session: &Session, records: &[PatientRecord], empty: &str) -> Result<String> {
    if session.json {
        return to_json(records);
    }
    if records.is_empty() {
        return Ok(empty.to_string());
    }
    Ok(format_table(records))
}

fn single_output(session: &Session, record: Option<&PatientRecord>, empty: &str) -> Result<String> {
    match (record, session.json) {
        (Some(record), true) => to_json(record),
        (Some(record), false) => Ok(format_record(record)),
        (None, true) => Ok("null".to_string()),
        (None, false) => Ok(empty.to_string()),
    }
}

fn save_archive(session: &mut Session, path: PathBuf) -> Result<String> {
    let written = session
        .store
        .save(&path, session.config.write_header)
        .with_context(|| format!("Failed to save archive to {:?}", path))?;
    if path == session.config.data_file {
        session.dirty = false;
    }
    Ok(format!("Saved {} patient records to {}", written, path.display()))
}

fn verify_report(store: &RecordStore) -> String {
    let properties = store.index().properties();
    let mut lines = vec![format!(
        "Archive: {} records, height {}, ids {}..{}, {}",
        properties.total,
        properties.height,
        properties.min_id.map_or("-".to_string(), |id| id.to_string()),
        properties.max_id.map_or("-".to_string(), |id| id.to_string()),
        if properties.ordered { "ordered" } else { "ORDER VIOLATED" },
    )];
    for level in PriorityLevel::ALL {
        let archived = store.archived_count_by_priority(level);
        let queued = store.queued_count_by_priority(level);
        let marker = if archived == queued { "" } else { "  (differs)" };
        lines.push(format!("{:<9} archived {:>4}, queued {:>4}{}", level.label(), archived, queued, marker));
    }
    lines.join("\n")
}

/// Runs one command against the session and returns the text to print.
pub fn handle_command(session: &mut Session, command: PatientCommand) -> Result<String> {
    debug!("Handling command: {:?}", command);
    let modifies = command.modifies_archive();

    let output = match command {
        PatientCommand::Register { name, age, symptoms, priority } => {
            let id = session.store.register(PatientIntake::new(name, age, symptoms, priority))?;
            match session.store.search(id) {
                Some(record) if session.json => to_json(record)?,
                _ => format!("Registered patient {} ({})", id, priority),
            }
        }
        PatientCommand::Show { id } => {
            let record = session
                .store
                .search(id)
                .ok_or_else(|| anyhow!("Patient {} not found", id))?;
            single_output(session, Some(record), "")?
        }
        PatientCommand::Update { id, name, age, symptoms, priority } => {
            let current = session
                .store
                .search(id)
                .ok_or_else(|| anyhow!("Patient {} not found", id))?;
            let mut intake = PatientIntake::from(current);
            if let Some(name) = name {
                intake.name = name;
            }
            if let Some(age) = age {
                intake.age = age;
            }
            if let Some(symptoms) = symptoms {
                intake.symptoms = symptoms;
            }
            if let Some(priority) = priority {
                intake.priority = priority;
            }
            session.store.update(id, intake)?;
            format!("Updated patient {}", id)
        }
        PatientCommand::Delete { id } => {
            let removed = session
                .store
                .remove(id)
                .ok_or_else(|| anyhow!("Patient {} not found", id))?;
            format!("Removed patient {} ({}) from the archive", removed.id, removed.name)
        }
        PatientCommand::List { priority } => {
            let records = match priority {
                Some(level) => session.store.records_by_priority(level),
                None => session.store.all_records(),
            };
            records_output(session, &records, "No patients on record")?
        }
        PatientCommand::Queue { heap } => {
            let records = if heap {
                session.store.queued_patients().to_vec()
            } else {
                session.store.queue_in_treatment_order()
            };
            records_output(session, &records, "Triage queue is empty")?
        }
        PatientCommand::Next => single_output(session, session.store.next_patient(), "No patients waiting")?,
        PatientCommand::Treat => {
            let treated = session.store.treat_next_patient();
            match (&treated, session.json) {
                (_, true) => to_json(&treated)?,
                (Some(record), false) => format!("Treating patient:\n{}", format_record(record)),
                (None, false) => "No patients waiting".to_string(),
            }
        }
        PatientCommand::Stats => {
            let stats = session.store.statistics();
            if session.json { to_json(&stats)? } else { format_statistics(&stats) }
        }
        PatientCommand::Tree => {
            if session.json {
                to_json(&session.store.index().properties())?
            } else {
                session.store.index().render()
            }
        }
        PatientCommand::Verify => verify_report(&session.store),
        PatientCommand::Save { path } => {
            let path = path.unwrap_or_else(|| session.config.data_file.clone());
            save_archive(session, path)?
        }
    };

    if modifies {
        session.dirty = true;
    }
    Ok(output)
}

pub fn print_welcome_screen() {
    let total_width = 72;
    let border_char = '#';
    let line_str = border_char.to_string().repeat(total_width);

    let print_centered_colored = |text: &str, text_color: style::Color| {
        let content_width = total_width - 4;
        let padding_len = content_width.saturating_sub(text.len());
        let left_padding = padding_len / 2;
        let right_padding = padding_len - left_padding;
        println!(
            "{} {}{}{} {}",
            border_char.to_string().with(style::Color::Cyan),
            " ".repeat(left_padding),
            text.with(text_color),
            " ".repeat(right_padding),
            border_char.to_string().with(style::Color::Cyan),
        );
    };

    println!("{}", line_str.clone().with(style::Color::Cyan));
    print_centered_colored("", style::Color::Blue);
    print_centered_colored("Patient Intake Command Line Interface", style::Color::DarkCyan);
    print_centered_colored("Version 0.1.0", style::Color::White);
    print_centered_colored("", style::Color::Blue);
    print_centered_colored("Type 'help' for a list of commands.", style::Color::Green);
    print_centered_colored("Tip: 'register -n NAME -a AGE -s SYMPTOMS -p 1' admits a patient.", style::Color::Yellow);
    print_centered_colored("Use 'clear' to clear the terminal.", style::Color::Yellow);
    print_centered_colored("Type 'exit' or 'quit' to leave the CLI.", style::Color::Red);
    print_centered_colored("", style::Color::Blue);
    println!("{}", line_str.with(style::Color::Cyan));
}

/// Clears the terminal screen.
pub fn clear_terminal_screen() -> Result<()> {
    execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
        .context("Failed to clear terminal screen or move cursor")?;
    io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session() -> Session {
        Session::new(RecordStore::new(1001), StoreConfig::default(), false)
    }

    fn register(session: &mut Session, name: &str, priority: PriorityLevel) -> String {
        let command = PatientCommand::Register {
            name: name.to_string(),
            age: 40,
            symptoms: "Observation".to_string(),
            priority,
        };
        handle_command(session, command).unwrap()
    }

    #[test]
    fn register_marks_session_dirty() {
        let mut session = session();
        assert_eq!(register(&mut session, "John Smith", PriorityLevel::Critical), "Registered patient 1001 (Critical)");
        assert!(session.is_dirty());
    }

    #[test]
    fn treat_does_not_mark_session_dirty() {
        let mut session = session();
        session.store.register(PatientIntake::new("Emily", 28, "Fever", PriorityLevel::Urgent)).unwrap();
        let output = handle_command(&mut session, PatientCommand::Treat).unwrap();
        assert!(output.contains("Patient 1001"));
        assert!(!session.is_dirty());
        assert_eq!(handle_command(&mut session, PatientCommand::Next).unwrap(), "No patients waiting");
    }

    #[test]
    fn update_merges_given_fields() {
        let mut session = session();
        register(&mut session, "Sarah Wilson", PriorityLevel::Urgent);
        handle_command(
            &mut session,
            PatientCommand::Update { id: 1001, name: None, age: Some(53), symptoms: None, priority: None },
        )
        .unwrap();
        let record = session.store.search(1001).unwrap();
        assert_eq!(record.name, "Sarah Wilson");
        assert_eq!(record.age, 53);
    }

    #[test]
    fn unknown_ids_are_errors() {
        let mut session = session();
        let err = handle_command(&mut session, PatientCommand::Delete { id: 4242 }).unwrap_err();
        assert_eq!(err.to_string(), "Patient 4242 not found");
        assert!(handle_command(&mut session, PatientCommand::Show { id: 4242 }).is_err());
    }

    #[test]
    fn invalid_registration_is_reported() {
        let mut session = session();
        let command = PatientCommand::Register {
            name: "Lisa".to_string(),
            age: 0,
            symptoms: "Sprain".to_string(),
            priority: PriorityLevel::Standard,
        };
        assert!(handle_command(&mut session, command).is_err());
        assert!(!session.is_dirty());
    }

    #[test]
    fn list_prints_a_table_in_id_order() {
        let mut session = session();
        register(&mut session, "Robert Brown", PriorityLevel::Critical);
        register(&mut session, "Lisa Anderson", PriorityLevel::Standard);
        let output = handle_command(&mut session, PatientCommand::List { priority: None }).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1001   Robert Brown"));
        assert!(lines[2].starts_with("1002   Lisa Anderson"));
    }

    #[test]
    fn json_output_is_parseable() {
        let mut session = session();
        session.json = true;
        register(&mut session, "Robert Brown", PriorityLevel::Critical);
        let output = handle_command(&mut session, PatientCommand::Stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total_records"], 1);
        assert_eq!(value["critical"], 1);
    }

    #[test]
    fn verify_flags_divergent_counts() {
        let mut session = session();
        register(&mut session, "Robert Brown", PriorityLevel::Critical);
        handle_command(&mut session, PatientCommand::Delete { id: 1001 }).unwrap();
        let report = handle_command(&mut session, PatientCommand::Verify).unwrap();
        assert!(report.contains("Critical  archived    0, queued    1  (differs)"));
        assert!(report.starts_with("Archive: 0 records"));
    }

    #[test]
    fn autosave_writes_data_file_once() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig { data_file: dir.path().join("patients.csv"), ..StoreConfig::default() };
        let mut session = Session::new(RecordStore::new(1001), config, false);
        register(&mut session, "Robert Brown", PriorityLevel::Critical);

        session.autosave().unwrap();
        assert!(!session.is_dirty());
        let saved = std::fs::read_to_string(dir.path().join("patients.csv")).unwrap();
        assert!(saved.starts_with("1001,Robert Brown,40,\"Observation\",1,Critical,"));
    }
}
