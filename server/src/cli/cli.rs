// server/src/cli/cli.rs

// CLI entry point: resolves configuration, loads the archive and either runs
// a single command or enters interactive mode.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use intake::{load_store_config, RecordStore, StoreConfig};

use crate::cli::commands::CliArgs;
use crate::cli::handlers::{handle_command, Session};
use crate::cli::interactive::run_cli_interactive;

/// Applies command-line overrides on top of the file configuration.
pub fn resolve_config(args: &CliArgs) -> Result<StoreConfig> {
    let mut config = load_store_config(args.config.clone()).context("Failed to load configuration")?;
    if let Some(data_file) = &args.data_file {
        config.data_file = data_file.clone();
    }
    Ok(config)
}

pub fn open_session(config: StoreConfig, json: bool) -> Result<Session> {
    let (store, rejected) = RecordStore::open(&config)
        .with_context(|| format!("Failed to load patient archive {:?}", config.data_file))?;
    for line_error in &rejected {
        warn!("{:?}: skipped {}", config.data_file, line_error);
    }
    if !rejected.is_empty() {
        eprintln!(
            "Warning: {} line(s) of {} could not be read and were skipped",
            rejected.len(),
            config.data_file.display()
        );
    }
    info!("Loaded {} patient records", store.total_records());
    Ok(Session::new(store, config, json))
}

pub fn start_cli() -> Result<()> {
    let args = CliArgs::parse();
    let config = resolve_config(&args)?;
    let mut session = open_session(config, args.json)?;

    match args.command {
        Some(command) => {
            let output = handle_command(&mut session, command)?;
            println!("{}", output);
            session.autosave()
        }
        None => run_cli_interactive(&mut session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn data_file_flag_overrides_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("intake.toml");
        fs::write(&config_path, "base_patient_id = 7001\ndata_file = \"from-config.csv\"\n").unwrap();

        let args = CliArgs::try_parse_from([
            "intake-cli",
            "--config",
            config_path.to_str().unwrap(),
            "--data-file",
            "override.csv",
            "stats",
        ])
        .unwrap();
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.base_patient_id, 7001);
        assert_eq!(config.data_file, std::path::PathBuf::from("override.csv"));
    }

    #[test]
    fn session_reports_but_survives_bad_lines() {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("patients.csv");
        fs::write(&data_file, "1001,John,45,\"Pain\",1\nbroken line\n").unwrap();

        let config = StoreConfig { data_file, ..StoreConfig::default() };
        let session = open_session(config, false).unwrap();
        assert_eq!(session.store.total_records(), 1);
        assert_eq!(session.store.next_id(), Some(1002));
    }
}
