// server/src/cli/mod.rs

pub mod cli;
pub mod commands;
pub mod handlers;
pub mod interactive;

pub use cli::{open_session, resolve_config, start_cli};
pub use commands::{CliArgs, InteractiveArgs, PatientCommand};
pub use handlers::{handle_command, print_welcome_screen, Session};
pub use interactive::{parse_command, run_cli_interactive, CommandType};
