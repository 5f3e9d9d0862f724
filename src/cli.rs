//! CLI argument parsing using `clap`.

use crate::config::settings::{DEFAULT_PID_FILE, DEFAULT_TIMEOUT_SECS};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for `version-launcher`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "version-launcher",
    version,
    about = "Install and run several versions of a web application side by side.",
    long_about = None
)]
pub struct CliArgs {
    /// More output: once for diagnostics, twice for everything.
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never ask; answer yes to every confirmation.
    #[arg(short = 'n', long = "no-interaction", global = true)]
    pub no_interaction: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start one or more servers described by a JSON configuration file.
    ///
    /// The file holds an object with a single key, "servers": a list of
    /// objects with "version", "host", "port" and "config" keys. Each entry
    /// is installed under its own directory in the install path and started
    /// on its host and port.
    StartServers(StartArgs),

    /// Kill servers whose PIDs are listed in a PID file.
    KillServers(KillArgs),
}

/// Arguments for `start-servers`.
#[derive(Debug, Clone, Args)]
pub struct StartArgs {
    /// Path to the JSON configuration file listing the servers.
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Directory each version is installed under, one subdirectory per version.
    #[arg(long, value_name = "DIR")]
    pub install_path: PathBuf,

    /// Seconds a started server gets to accept connections.
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// File the PIDs of started servers are appended to.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PID_FILE)]
    pub pid_file: PathBuf,

    /// Router script to use instead of the built-in one.
    #[arg(long, value_name = "PATH")]
    pub router: Option<PathBuf>,

    /// PHP binary used to serve the installed versions.
    #[arg(long, value_name = "BIN", default_value = "php")]
    pub php: String,

    /// Command installing a version, with {version} and {destination} placeholders.
    ///
    /// Defaults to `composer create-project -n imbo/imbo {destination} {version}`.
    #[arg(long, value_name = "TEMPLATE")]
    pub provision_command: Option<String>,

    /// Kill started servers and remove install directories if any server fails.
    #[arg(long)]
    pub cleanup_on_failure: bool,
}

/// Arguments for `kill-servers`.
#[derive(Debug, Clone, Args)]
pub struct KillArgs {
    /// File that holds the PIDs.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PID_FILE)]
    pub pid_file: PathBuf,

    /// Only kill processes whose command line contains this text.
    #[arg(long = "match", value_name = "TEXT")]
    pub match_command: Option<String>,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
