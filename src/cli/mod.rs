//! Command-line interface for taskdash
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in `dashboard`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod dashboard;

/// taskdash - task dashboard engine
///
/// Replays a session script into an in-memory task store, then shows the
/// filtered task list, the due-date trend, or the status counts.
#[derive(Parser, Debug)]
#[command(name = "taskdash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a config file (defaults to ./.taskdash.toml)
    #[arg(long, global = true, env = "TASKDASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a session script and print each step and the final tasks
    Replay {
        /// Session script (JSON Lines), or - for stdin
        script: PathBuf,
    },

    /// Replay a session script and print the filtered, sorted task list
    List {
        /// Session script (JSON Lines), or - for stdin
        script: PathBuf,

        /// Status filter: all, todo, in-progress, done
        #[arg(long)]
        status: Option<String>,

        /// Sort key: title, priority, status, dueDate
        #[arg(long)]
        sort: Option<String>,

        /// Sort direction: asc, desc
        #[arg(long = "dir")]
        direction: Option<String>,
    },

    /// Replay a session script and print tasks due per day
    Trend {
        /// Session script (JSON Lines), or - for stdin
        script: PathBuf,
    },

    /// Replay a session script and print task counts by status
    Stats {
        /// Session script (JSON Lines), or - for stdin
        script: PathBuf,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let options = dashboard::SessionOptions {
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };
        match self.command {
            Commands::Replay { script } => dashboard::run_replay(&script, options),
            Commands::List {
                script,
                status,
                sort,
                direction,
            } => dashboard::run_list(
                &script,
                dashboard::ListOptions {
                    status,
                    sort,
                    direction,
                },
                options,
            ),
            Commands::Trend { script } => dashboard::run_trend(&script, options),
            Commands::Stats { script } => dashboard::run_stats(&script, options),
        }
    }
}
