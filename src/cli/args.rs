// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Render test runner lifecycle events through pluggable reporters
#[derive(Parser, Debug)]
#[command(name = "reporthost")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render test runner lifecycle events through pluggable reporters", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(short = 'c', long, global = true, default_value_t = false)]
    pub no_color: bool,

    /// Show current configuration and exit
    #[arg(long, default_value_t = false)]
    pub config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Print shell completion script (bash, zsh, fish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "powershell"])]
    pub completion: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay recorded lifecycle events (NDJSON) through a reporter
    Replay(ReplayArgs),

    /// List available reporters
    List(ListArgs),

    /// Print the markup tags error renderers may use
    Tags,
}

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Event file, one JSON event per line ("-" for stdin)
    #[arg(required = true)]
    pub events: PathBuf,

    /// Reporter to use (see `reporthost list`)
    #[arg(short, long)]
    pub reporter: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Wrap long lines at the viewport width
    #[arg(long, default_value_t = false)]
    pub word_wrap: bool,

    /// Indent everything the reporter writes by N spaces
    #[arg(long, value_name = "N")]
    pub indent: Option<usize>,

    /// Viewport width in columns (defaults to the terminal width)
    #[arg(long, value_name = "COLUMNS")]
    pub width: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}
