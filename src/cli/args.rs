//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Red-black tree engine: insert/remove with step-by-step rebalancing traces
#[derive(Parser, Debug)]
#[command(name = "rbtrace")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .rbtrace.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Tree state file (overrides config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub state: Option<PathBuf>,

    /// Record a trace for every insert/remove
    #[arg(long, global = true)]
    pub trace: bool,

    /// Trace label (overrides config)
    #[arg(long, global = true)]
    pub label: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert values, rebalancing after each
    Insert {
        /// Values to insert, in order
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Remove values, rebalancing after each
    Remove {
        /// Values to remove, in order
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
    },

    /// Show the tree
    Show {
        /// Print the JSON document instead of the tree view
        #[arg(long)]
        json: bool,
    },

    /// Show size, height and black height
    Stats,

    /// Verify red-black invariants
    Check,

    /// Remove all nodes
    Clear,

    /// Inspect recorded traces
    Traces {
        #[command(subcommand)]
        command: TracesCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum TracesCommands {
    /// List trace files for the current label
    List,

    /// Show the steps of one trace file
    Show {
        /// Trace file name, e.g. insert_7_3.json
        name: String,
        /// Print the raw JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
