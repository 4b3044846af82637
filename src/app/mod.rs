pub mod cli;
pub mod commands;

pub use cli::{Cli, CliCommand, ExtensionCommand};
pub use commands::{run_cli, LaunchTarget};
