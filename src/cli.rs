use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file; built-in defaults are used without one
    #[arg(short, long, env = "CRYPTO_TRACKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Run a single fetch/write/analyze cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Append log lines to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Write the effective configuration to this path as TOML and exit
    #[arg(long, value_name = "PATH")]
    pub write_config: Option<PathBuf>,
}
