// ABOUTME: Clone or fast-forward pull a tracked repository's working copy

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::runner::{CommandRunner, CommandSpec, launch};
use super::GitError;
use crate::models::{RepositoryRef, SyncOperation, SyncState};

/// Runs the mutating git commands. Never retries and never touches the registry.
#[derive(Clone)]
pub struct Syncer {
    runner: Arc<dyn CommandRunner>,
    clone_depth: Option<u32>,
}

impl Syncer {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            clone_depth: None,
        }
    }

    /// Shallow clone depth; `None` clones full history
    pub fn with_clone_depth(mut self, depth: Option<u32>) -> Self {
        self.clone_depth = depth.filter(|d| *d > 0);
        self
    }

    /// Clone when `assumed` is `Missing`, otherwise pull
    pub async fn sync(
        &self,
        repo: &RepositoryRef,
        target_dir: &Path,
        assumed: &SyncState,
    ) -> Result<SyncOperation, GitError> {
        let operation = SyncOperation::for_state(assumed);
        match operation {
            SyncOperation::Clone => self.clone_repo(repo, target_dir).await?,
            SyncOperation::Pull => self.pull(repo, target_dir).await?,
        }
        Ok(operation)
    }

    pub async fn clone_repo(&self, repo: &RepositoryRef, target_dir: &Path) -> Result<(), GitError> {
        let name = repo.resolved_name()?;
        let destination = target_dir.join(&name);
        tokio::fs::create_dir_all(target_dir).await?;

        let mut args = vec!["clone".to_string(), "--quiet".to_string()];
        if let Some(depth) = self.clone_depth {
            args.push("--depth".to_string());
            args.push(depth.to_string());
        }
        args.push(repo.url.clone());
        args.push(destination.display().to_string());

        info!("Cloning {} into {}", repo.url, destination.display());
        let output = launch(self.runner.as_ref(), &CommandSpec::git(args)).await?;
        if !output.success() {
            return Err(GitError::command_failed("clone", &name, &output));
        }
        Ok(())
    }

    pub async fn pull(&self, repo: &RepositoryRef, target_dir: &Path) -> Result<(), GitError> {
        let name = repo.resolved_name()?;
        let path = target_dir.join(&name).display().to_string();

        info!("Pulling {}", path);
        let cmd = CommandSpec::git(["-C", path.as_str(), "pull", "--quiet", "--ff-only"]);
        let output = launch(self.runner.as_ref(), &cmd).await?;
        if !output.success() {
            return Err(GitError::command_failed("pull", &name, &output));
        }
        Ok(())
    }
}
