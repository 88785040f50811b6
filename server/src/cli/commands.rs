// server/src/cli/commands.rs

// Command-line arguments and subcommands for the intake CLI, shared by the
// one-shot and interactive modes.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use intake::{PatientId, PriorityLevel};

#[derive(Parser, Debug)]
#[command(name = "intake-cli")]
#[command(version = "0.1.0")]
#[command(about = "Emergency department patient intake and triage")]
pub struct CliArgs {
    /// TOML configuration file. Defaults to ./intake.toml when present.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
    /// Patient archive to load and save, overriding the configuration.
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Option<PatientCommand>,
}

/// Parser used for lines typed at the interactive prompt.
#[derive(Parser, Debug)]
#[command(name = "intake", no_binary_name = true, disable_version_flag = true)]
pub struct InteractiveArgs {
    #[command(subcommand)]
    pub command: PatientCommand,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum PatientCommand {
    /// Register a new patient and place them in the triage queue
    Register {
        #[clap(long, short = 'n')]
        name: String,
        #[clap(long, short = 'a')]
        age: u32,
        #[clap(long, short = 's')]
        symptoms: String,
        /// 1/critical, 2/urgent or 3/standard
        #[clap(long, short = 'p', default_value = "3")]
        priority: PriorityLevel,
    },
    /// Show one archived patient
    Show { id: PatientId },
    /// Change an archived patient's details
    Update {
        id: PatientId,
        #[clap(long, short = 'n')]
        name: Option<String>,
        #[clap(long, short = 'a')]
        age: Option<u32>,
        #[clap(long, short = 's')]
        symptoms: Option<String>,
        #[clap(long, short = 'p')]
        priority: Option<PriorityLevel>,
    },
    /// Remove a patient from the archive
    Delete { id: PatientId },
    /// List archived patients by id
    List {
        #[clap(long, short = 'p')]
        priority: Option<PriorityLevel>,
    },
    /// Show the triage queue in treatment order
    Queue {
        /// Show the heap's internal layout instead
        #[clap(long)]
        heap: bool,
    },
    /// Show the next patient to be treated
    Next,
    /// Treat the next patient, removing them from the queue
    Treat,
    /// Show archive and queue statistics
    Stats,
    /// Draw the archive's search tree
    Tree,
    /// Check the archive's ordering and compare both indexes
    Verify,
    /// Write the archive to disk
    Save {
        #[clap(long)]
        path: Option<PathBuf>,
    },
}

impl PatientCommand {
    /// Whether the command changes what `save` would write.
    pub fn modifies_archive(&self) -> bool {
        matches!(
            self,
            PatientCommand::Register { .. } | PatientCommand::Update { .. } | PatientCommand::Delete { .. }
        )
    }
}
