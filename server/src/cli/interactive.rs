// server/src/cli/interactive.rs

// Interactive mode: one record store stays loaded while the user types
// commands at the prompt.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{debug, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cli::commands::{InteractiveArgs, PatientCommand};
use crate::cli::handlers::{self, Session};

const HISTORY_PATH: &str = "intake_cli_history.txt";
const PROMPT: &str = "intake> ";

/// A line typed at the prompt, after splitting and parsing.
#[derive(Debug, PartialEq)]
pub enum CommandType {
    Patient(PatientCommand),
    Help,
    Clear,
    Exit,
    Empty,
    /// The line could not be parsed; holds the message to show.
    Invalid(String),
}

/// Parses a command string from the interactive CLI input. Words are split
/// shell-style so quoted names and symptoms survive.
pub fn parse_command(input: &str) -> CommandType {
    let Some(words) = shlex::split(input.trim()) else {
        return CommandType::Invalid("Unbalanced quotes in input".to_string());
    };
    let Some(first) = words.first() else {
        return CommandType::Empty;
    };

    match first.to_lowercase().as_str() {
        "exit" | "quit" | "q" => CommandType::Exit,
        "help" | "h" | "?" if words.len() == 1 => CommandType::Help,
        "clear" | "clean" => CommandType::Clear,
        _ => match InteractiveArgs::try_parse_from(&words) {
            Ok(args) => CommandType::Patient(args.command),
            Err(e) => CommandType::Invalid(e.to_string()),
        },
    }
}

pub fn print_interactive_help() {
    let mut command = InteractiveArgs::command();
    println!("{}", command.render_long_help());
    println!("Other commands: help, clear, exit");
}

/// Runs the prompt loop until `exit` or end of input, then autosaves.
pub fn run_cli_interactive(session: &mut Session) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let _ = rl.load_history(HISTORY_PATH);

    handlers::print_welcome_screen();

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Failed to read line: {}", e);
                break;
            }
        };
        if !line.trim().is_empty() {
            let _ = rl.add_history_entry(line.as_str());
        }

        match parse_command(&line) {
            CommandType::Exit => break,
            CommandType::Empty => {}
            CommandType::Help => print_interactive_help(),
            CommandType::Clear => handlers::clear_terminal_screen()?,
            CommandType::Invalid(message) => eprintln!("{}", message),
            CommandType::Patient(command) => match handlers::handle_command(session, command) {
                Ok(output) => println!("{}", output),
                Err(e) => eprintln!("Error: {:#}", e),
            },
        }
    }

    if let Err(e) = rl.save_history(HISTORY_PATH) {
        debug!("Could not save history to {}: {}", HISTORY_PATH, e);
    }

    if session.is_dirty() && !session.config.autosave {
        warn!("Leaving with unsaved changes; autosave is off");
    }
    session.autosave()?;
    println!("Goodbye.");
    Ok(())
}
