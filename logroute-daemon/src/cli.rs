//! CLI argument definitions for logroute-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// logroute log routing daemon.
///
/// Loads the routing configuration (outputs and contexts), publishes the
/// resulting routing table, and reloads it on SIGHUP.
#[derive(Parser, Debug)]
#[command(name = "logroute-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to logroute.toml settings file.
    #[arg(short, long, default_value = "/etc/logroute/logroute.toml")]
    pub config: PathBuf,

    /// Override the routing configuration file path.
    ///
    /// Takes precedence over the settings file and environment variables.
    #[arg(long)]
    pub conf_file: Option<String>,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the settings file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the settings file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Override PID file path (takes precedence over the settings file).
    #[arg(long)]
    pub pid_file: Option<String>,

    /// Validate the routing configuration file and exit without starting
    /// the daemon.
    #[arg(long)]
    pub validate: bool,
}
