// ABOUTME: Git integration: URL parsing, process running, status classification and sync

pub mod runner;
pub mod service;
pub mod status;
pub mod sync;
pub mod url;

pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use service::{BatchReport, RepoEvent, RepoLocks, RepoService, SyncOutcome};
pub use status::StatusClassifier;
pub use sync::Syncer;
pub use url::{GithubRepo, ParseError, parse_github_url};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    /// A git command ran and exited non-zero
    #[error("git {operation} failed for {target}{}: {message}", exit_suffix(.exit_code))]
    CommandFailed {
        operation: String,
        target: String,
        exit_code: Option<i32>,
        message: String,
    },

    /// The process could not be started at all
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error("Invalid repository: {0}")]
    InvalidRepository(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map_or_else(
        || " (terminated by signal)".to_string(),
        |code| format!(" (exit code {})", code),
    )
}

impl GitError {
    pub(crate) fn command_failed(
        operation: &str,
        target: &str,
        output: &CommandOutput,
    ) -> Self {
        let stderr = output.stderr.trim();
        let message = if stderr.is_empty() {
            "no error output".to_string()
        } else {
            stderr.to_string()
        };
        Self::CommandFailed {
            operation: operation.to_string(),
            target: target.to_string(),
            exit_code: output.exit_code,
            message,
        }
    }
}
