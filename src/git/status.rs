// ABOUTME: Classifies a tracked repository's working copy into a SyncState

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use super::runner::{CommandRunner, CommandSpec, launch};
use super::GitError;
use crate::models::{RepositoryRef, SyncState};

pub const DEFAULT_FALLBACK_UPSTREAM: &str = "origin/HEAD";

/// Runs the read-only git checks that decide a repository's state
#[derive(Clone)]
pub struct StatusClassifier {
    runner: Arc<dyn CommandRunner>,
    fallback_upstream: String,
    fetch_before_status: bool,
}

impl StatusClassifier {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            fallback_upstream: DEFAULT_FALLBACK_UPSTREAM.to_string(),
            fetch_before_status: false,
        }
    }

    /// Ref compared against when the branch has no tracking upstream
    pub fn with_fallback_upstream(mut self, upstream: impl Into<String>) -> Self {
        self.fallback_upstream = upstream.into();
        self
    }

    pub fn with_fetch(mut self, fetch_before_status: bool) -> Self {
        self.fetch_before_status = fetch_before_status;
        self
    }

    /// Decide the state of `repo`'s working copy under `target_dir`.
    ///
    /// A missing directory short-circuits before any git command runs, and
    /// uncommitted changes win over the upstream comparison.
    pub async fn check_status(
        &self,
        repo: &RepositoryRef,
        target_dir: &Path,
    ) -> Result<SyncState, GitError> {
        let path = repo.local_path(target_dir)?;
        let path_arg = path.display().to_string();

        let exists = launch(
            self.runner.as_ref(),
            &CommandSpec::new("test", ["-d", path_arg.as_str()]),
        )
        .await?;
        if !exists.success() {
            debug!("{} has no working copy at {}", repo.display_name(), path_arg);
            return Ok(SyncState::Missing);
        }

        if self.fetch_before_status {
            self.fetch(&path_arg).await;
        }

        let status_cmd = CommandSpec::git(["-C", path_arg.as_str(), "status", "--porcelain"]);
        let status = launch(self.runner.as_ref(), &status_cmd).await?;
        if !status.success() {
            return Err(GitError::command_failed("status", &path_arg, &status));
        }
        if !status.stdout.trim().is_empty() {
            return Ok(SyncState::Modified);
        }

        let upstream = self.resolve_upstream(&path_arg).await?;
        let range = format!("HEAD..{}", upstream);
        let count_cmd = CommandSpec::git(["-C", path_arg.as_str(), "rev-list", "--count", &range]);
        let count = launch(self.runner.as_ref(), &count_cmd).await?;
        if !count.success() {
            return Err(GitError::command_failed("rev-list", &path_arg, &count));
        }

        let behind: u32 = count
            .stdout
            .trim()
            .parse()
            .map_err(|_| GitError::UnexpectedOutput {
                command: count_cmd.display(),
                output: count.stdout.clone(),
            })?;

        Ok(if behind == 0 {
            SyncState::UpToDate
        } else {
            SyncState::Behind { commits: behind }
        })
    }

    /// Tracking ref of the checked out branch, or the configured fallback
    async fn resolve_upstream(&self, path_arg: &str) -> Result<String, GitError> {
        let cmd = CommandSpec::git([
            "-C",
            path_arg,
            "rev-parse",
            "--abbrev-ref",
            "--symbolic-full-name",
            "@{u}",
        ]);
        let output = launch(self.runner.as_ref(), &cmd).await?;
        let upstream = output.stdout.trim();
        if output.success() && !upstream.is_empty() {
            Ok(upstream.to_string())
        } else {
            debug!(
                "No upstream for {}, using {}",
                path_arg, self.fallback_upstream
            );
            Ok(self.fallback_upstream.clone())
        }
    }

    async fn fetch(&self, path_arg: &str) {
        let cmd = CommandSpec::git(["-C", path_arg, "fetch", "--quiet"]);
        match launch(self.runner.as_ref(), &cmd).await {
            Ok(output) if output.success() => {}
            Ok(output) => warn!("Fetch failed for {}: {}", path_arg, output.stderr.trim()),
            Err(e) => warn!("Fetch failed for {}: {}", path_arg, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::runner::{CommandOutput, MockCommandRunner};
    use pretty_assertions::assert_eq;
    use std::io;

    fn exit(code: i32, stdout: &str) -> Result<CommandOutput, io::Error> {
        Ok(CommandOutput {
            exit_code: Some(code),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::with_name("effect", "https://github.com/Effect-TS/effect")
    }

    fn expect_dir(mock: &mut MockCommandRunner, code: i32) {
        mock.expect_run()
            .withf(|c| c.is("test", "-d"))
            .times(1)
            .returning(move |_| exit(code, ""));
    }

    fn expect_git(mock: &mut MockCommandRunner, subcommand: &'static str, code: i32, stdout: &'static str) {
        mock.expect_run()
            .withf(move |c| c.program == "git" && c.has_arg(subcommand))
            .times(1)
            .returning(move |_| exit(code, stdout));
    }

    fn classifier(mock: MockCommandRunner) -> StatusClassifier {
        StatusClassifier::new(Arc::new(mock))
    }

    async fn check(mock: MockCommandRunner) -> Result<SyncState, GitError> {
        classifier(mock).check_status(&repo(), Path::new(".context")).await
    }

    #[tokio::test]
    async fn test_missing_directory_runs_no_git() {
        let mut mock = MockCommandRunner::new();
        expect_dir(&mut mock, 1);
        mock.expect_run().withf(|c| c.program == "git").times(0);

        assert_eq!(check(mock).await.unwrap(), SyncState::Missing);
    }

    #[tokio::test]
    async fn test_dirty_tree_is_modified_without_rev_list() {
        let mut mock = MockCommandRunner::new();
        expect_dir(&mut mock, 0);
        expect_git(&mut mock, "status", 0, " M file.txt\n");
        mock.expect_run().withf(|c| c.has_arg("rev-list")).times(0);
        mock.expect_run().withf(|c| c.has_arg("rev-parse")).times(0);

        assert_eq!(check(mock).await.unwrap(), SyncState::Modified);
    }

    #[tokio::test]
    async fn test_untracked_file_is_modified() {
        let mut mock = MockCommandRunner::new();
        expect_dir(&mut mock, 0);
        expect_git(&mut mock, "status", 0, "?? notes.md\n");
        mock.expect_run().withf(|c| c.has_arg("rev-list")).times(0);
        mock.expect_run().withf(|c| c.has_arg("rev-parse")).times(0);

        assert_eq!(check(mock).await.unwrap(), SyncState::Modified);
    }

    #[tokio::test]
    async fn test_behind_count() {
        let mut mock = MockCommandRunner::new();
        expect_dir(&mut mock, 0);
        expect_git(&mut mock, "status", 0, "");
        expect_git(&mut mock, "rev-parse", 0, "origin/main\n");
        mock.expect_run()
            .withf(|c| c.has_arg("rev-list") && c.has_arg("HEAD..origin/main"))
            .times(1)
            .returning(|_| exit(0, "3\n"));

        assert_eq!(check(mock).await.unwrap(), SyncState::Behind { commits: 3 });
    }

    #[tokio::test]
    async fn test_zero_behind_is_up_to_date() {
        let mut mock = MockCommandRunner::new();
        expect_dir(&mut mock, 0);
        expect_git(&mut mock, "status", 0, "\n");
        expect_git(&mut mock, "rev-parse", 0, "origin/main\n");
        expect_git(&mut mock, "rev-list", 0, "0\n");

        assert_eq!(check(mock).await.unwrap(), SyncState::UpToDate);
    }

    #[tokio::test]
    async fn test_no_tracking_branch_uses_fallback() {
        let mut mock = MockCommandRunner::new();
        expect_dir(&mut mock, 0);
        expect_git(&mut mock, "status", 0, "");
        expect_git(&mut mock, "rev-parse", 128, "");
        mock.expect_run()
            .withf(|c| c.has_arg("rev-list") && c.has_arg("HEAD..upstream/trunk"))
            .times(1)
            .returning(|_| exit(0, "2\n"));

        let state = classifier(mock)
            .with_fallback_upstream("upstream/trunk")
            .check_status(&repo(), Path::new(".context"))
            .await
            .unwrap();
        assert_eq!(state, SyncState::Behind { commits: 2 });
    }

    #[tokio::test]
    async fn test_non_numeric_count_is_error() {
        let mut mock = MockCommandRunner::new();
        expect_dir(&mut mock, 0);
        expect_git(&mut mock, "status", 0, "");
        expect_git(&mut mock, "rev-parse", 0, "origin/main\n");
        expect_git(&mut mock, "rev-list", 0, "lots\n");

        let err = check(mock).await.unwrap_err();
        assert!(matches!(err, GitError::UnexpectedOutput { .. }));
    }

    #[tokio::test]
    async fn test_status_failure_is_error() {
        let mut mock = MockCommandRunner::new();
        expect_dir(&mut mock, 0);
        expect_git(&mut mock, "status", 128, "");

        let err = check(mock).await.unwrap_err();
        assert!(matches!(
            err,
            GitError::CommandFailed { exit_code: Some(128), .. }
        ));
    }

    #[tokio::test]
    async fn test_launch_failure_is_not_missing() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run()
            .times(1)
            .returning(|_| Err(io::Error::new(io::ErrorKind::NotFound, "no test binary")));

        let err = check(mock).await.unwrap_err();
        assert!(matches!(err, GitError::Launch { .. }));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_ignored() {
        let mut mock = MockCommandRunner::new();
        expect_dir(&mut mock, 0);
        expect_git(&mut mock, "fetch", 1, "");
        expect_git(&mut mock, "status", 0, "");
        expect_git(&mut mock, "rev-parse", 0, "origin/main\n");
        expect_git(&mut mock, "rev-list", 0, "0\n");

        let state = classifier(mock)
            .with_fetch(true)
            .check_status(&repo(), Path::new(".context"))
            .await
            .unwrap();
        assert_eq!(state, SyncState::UpToDate);
    }

    #[tokio::test]
    async fn test_unresolvable_name_is_invalid_repository() {
        let mock = MockCommandRunner::new();
        let repo = RepositoryRef {
            name: None,
            url: "https://example.com/a/b".to_string(),
        };
        let err = classifier(mock)
            .check_status(&repo, Path::new(".context"))
            .await
            .unwrap_err();
        assert!(matches!(err, GitError::InvalidRepository(_)));
    }

    #[tokio::test]
    async fn test_parent_dir_name_runs_nothing() {
        let mut mock = MockCommandRunner::new();
        mock.expect_run().times(0);
        let repo = RepositoryRef {
            name: None,
            url: "https://github.com/owner/..".to_string(),
        };
        let err = classifier(mock)
            .check_status(&repo, Path::new(".context"))
            .await
            .unwrap_err();
        assert!(matches!(err, GitError::InvalidRepository(_)));
    }

    #[tokio::test]
    async fn test_same_outputs_same_state() {
        for _ in 0..3 {
            let mut mock = MockCommandRunner::new();
            expect_dir(&mut mock, 0);
            expect_git(&mut mock, "status", 0, "");
            expect_git(&mut mock, "rev-parse", 0, "origin/main\n");
            expect_git(&mut mock, "rev-list", 0, "1\n");
            assert_eq!(check(mock).await.unwrap(), SyncState::Behind { commits: 1 });
        }
    }
}
