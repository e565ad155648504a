use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidmux")]
#[command(author, version, about = "Media container conversion tool")]
pub struct Cli {
    /// Input file or directory (omit to run interactively)
    pub input: Option<PathBuf>,

    /// Target container format
    #[arg(short, long, default_value = "mp4")]
    pub format: String,

    /// Convert batch items in parallel (default)
    #[arg(long, conflicts_with = "no_parallel")]
    pub parallel: bool,

    /// Convert batch items one at a time
    #[arg(long)]
    pub no_parallel: bool,

    /// Maximum number of parallel conversions (default: 4, or the config value)
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Batch items run in parallel unless `--no-parallel` was given.
    pub fn use_parallel(&self) -> bool {
        self.parallel || !self.no_parallel
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web service (upload, convert, download)
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Check that required external tools are available
    CheckTools,
}
