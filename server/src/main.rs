// server/src/main.rs

// Entry point for the intake CLI. Parses arguments and dispatches to the CLI
// logic.

use anyhow::Result;
use intake_server::cli::start_cli;

fn main() -> Result<()> {
    env_logger::init();
    start_cli()
}
