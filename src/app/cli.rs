use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "sunbeam")]
#[command(about = "Turn scripts into interactive terminal pages", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum CliCommand {
    /// Run an extension script, or list the extension's entries
    Run {
        extension: String,
        script: Option<String>,
        /// Bind a script parameter, as name=value
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
    },
    /// Manage installed extensions
    #[command(visible_aliases = ["ext", "extensions"])]
    Extension {
        #[command(subcommand)]
        action: ExtensionCommand,
    },
    /// Show launcher paths and version
    Info,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum ExtensionCommand {
    /// List installed extensions
    #[command(visible_alias = "ls")]
    List,
}
