// ABOUTME: Process runner seam used by every git operation, with a tokio-backed implementation

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::GitError;
use crate::models::LogEntry;

/// A process to run: program, arguments and optional working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// `git <args>`
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git", args)
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Whether this is `<program> <first arg> ...`, for matching in tests and logs
    pub fn is(&self, program: &str, first_arg: &str) -> bool {
        self.program == program && self.args.first().is_some_and(|a| a == first_arg)
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }

    /// Shell-like rendering for logs and error messages
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of a process that was started. `exit_code` is `None` when killed by a signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Runs external processes. `Err` only when the process could not be started;
/// a non-zero exit is reported through `CommandOutput::exit_code`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, std::io::Error>;
}

/// Run a command, turning a start failure into `GitError::Launch`
pub async fn launch(
    runner: &dyn CommandRunner,
    command: &CommandSpec,
) -> Result<CommandOutput, GitError> {
    runner
        .run(command)
        .await
        .map_err(|source| GitError::Launch {
            program: command.program.clone(),
            source,
        })
}

/// Runner backed by `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    observer: Option<UnboundedSender<LogEntry>>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a `Command` log entry for every process started
    pub fn with_observer(observer: UnboundedSender<LogEntry>) -> Self {
        Self {
            observer: Some(observer),
        }
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, std::io::Error> {
        debug!("Running: {}", command.display());
        if let Some(observer) = &self.observer {
            // Receiver gone means nobody is displaying the log anymore
            let _ = observer.send(LogEntry::command(&command.program, &command.args));
        }

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }

        let output = cmd.output().await?;
        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            "Finished: {} (exit {:?})",
            command.display(),
            result.exit_code
        );
        Ok(result)
    }
}
