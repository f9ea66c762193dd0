// ABOUTME: CLI argument parsing and command routing for lazycontext
//
// Provides command-line interface for:
// - Checking repository status (status)
// - Cloning or pulling repositories (sync)
// - Editing the registry (add, remove)
// - Launching TUI (tui, default)

pub mod registry;
pub mod status;
pub mod sync;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::SettingsOverrides;

/// Keep local clones of the GitHub repositories your project leans on
#[derive(Parser)]
#[command(name = "lazycontext")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Extra settings file, applied after the user and project files
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the working copies
    #[arg(long, global = true)]
    pub target_dir: Option<PathBuf>,

    /// Registry JSON file
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            config: self.config.clone(),
            target_dir: self.target_dir.clone(),
            registry: self.registry.clone(),
        }
    }
}

/// Output format for commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Launch the TUI (default if no command given)
    Tui,

    /// Show the sync status of every tracked repository
    Status,

    /// Clone missing repositories and pull the rest
    Sync(SyncArgs),

    /// Track a GitHub repository
    Add(AddArgs),

    /// Stop tracking a repository (the working copy is kept)
    Remove(RemoveArgs),
}

/// Arguments for the sync command
#[derive(clap::Args, Debug, PartialEq, Eq)]
pub struct SyncArgs {
    /// Repository name; all repositories when omitted
    pub name: Option<String>,
}

/// Arguments for the add command
#[derive(clap::Args, Debug, PartialEq, Eq)]
pub struct AddArgs {
    /// https://github.com/owner/repo or git@github.com:owner/repo.git
    pub url: String,

    /// Only record the repository, do not clone it
    #[arg(long)]
    pub no_clone: bool,
}

/// Arguments for the remove command
#[derive(clap::Args, Debug, PartialEq, Eq)]
pub struct RemoveArgs {
    /// Repository name
    pub name: String,
}
