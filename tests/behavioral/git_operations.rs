// ABOUTME: Behavioral tests for status classification and sync using real temporary repos
// Tests verify missing detection, clone, fast-forward pull, dirty detection and pull failures

use anyhow::Result;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

use lazycontext::git::{
    CommandRunner, GitError, RepoService, StatusClassifier, Syncer, SystemRunner,
};
use lazycontext::models::{RepositoryRef, SyncOperation, SyncState};

use super::fixtures::{Upstream, commit_in};
use crate::require_git;

struct Workspace {
    _target: TempDir,
    service: RepoService,
    repo: RepositoryRef,
}

impl Workspace {
    fn new(upstream: &Upstream) -> Result<Self> {
        let target = TempDir::new()?;
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());
        let service = RepoService::new(
            StatusClassifier::new(Arc::clone(&runner)).with_fetch(true),
            Syncer::new(runner),
            target.path().join(".context"),
        );
        Ok(Self {
            _target: target,
            service,
            repo: RepositoryRef::with_name("upstream", upstream.url()),
        })
    }

    fn working_copy(&self) -> std::path::PathBuf {
        self.service.target_dir().join("upstream")
    }
}

/// No directory means Missing; syncing clones and the result is up to date
#[tokio::test]
async fn test_missing_then_clone_is_up_to_date() -> Result<()> {
    require_git!();
    let upstream = Upstream::new()?;
    let ws = Workspace::new(&upstream)?;

    assert_eq!(ws.service.check(&ws.repo).await?, SyncState::Missing);

    let outcome = ws.service.sync_and_refresh(&ws.repo, None).await?;

    assert_eq!(outcome.operation, SyncOperation::Clone);
    assert_eq!(outcome.state, SyncState::UpToDate);
    assert!(ws.working_copy().join("README.md").exists());
    Ok(())
}

/// New upstream commits show as Behind and a pull brings the copy level
#[tokio::test]
async fn test_behind_then_pull_is_up_to_date() -> Result<()> {
    require_git!();
    let upstream = Upstream::new()?;
    let ws = Workspace::new(&upstream)?;
    ws.service.sync_and_refresh(&ws.repo, None).await?;

    upstream.push_commit("a.txt", "a\n", "Add a")?;
    upstream.push_commit("b.txt", "b\n", "Add b")?;

    assert_eq!(
        ws.service.check(&ws.repo).await?,
        SyncState::Behind { commits: 2 }
    );

    let outcome = ws
        .service
        .sync_and_refresh(&ws.repo, Some(SyncState::Behind { commits: 2 }))
        .await?;

    assert_eq!(outcome.operation, SyncOperation::Pull);
    assert_eq!(outcome.state, SyncState::UpToDate);
    assert!(ws.working_copy().join("b.txt").exists());
    Ok(())
}

/// Tracked edits and untracked files both count as Modified
#[tokio::test]
async fn test_dirty_working_copy_is_modified() -> Result<()> {
    require_git!();
    let upstream = Upstream::new()?;
    let ws = Workspace::new(&upstream)?;
    ws.service.sync_and_refresh(&ws.repo, None).await?;

    fs::write(ws.working_copy().join("notes.txt"), "scratch\n")?;
    assert_eq!(ws.service.check(&ws.repo).await?, SyncState::Modified);

    fs::remove_file(ws.working_copy().join("notes.txt"))?;
    fs::write(ws.working_copy().join("README.md"), "# Changed\n")?;
    assert_eq!(ws.service.check(&ws.repo).await?, SyncState::Modified);
    Ok(())
}

/// A diverged copy cannot fast-forward; the error carries git's message
#[tokio::test]
async fn test_diverged_pull_fails_without_merging() -> Result<()> {
    require_git!();
    let upstream = Upstream::new()?;
    let ws = Workspace::new(&upstream)?;
    ws.service.sync_and_refresh(&ws.repo, None).await?;

    commit_in(&ws.working_copy(), "local.txt", "local\n", "Local work")?;
    upstream.push_commit("remote.txt", "remote\n", "Remote work")?;

    let err = ws
        .service
        .sync_and_refresh(&ws.repo, Some(SyncState::Behind { commits: 1 }))
        .await
        .unwrap_err();

    match err {
        GitError::CommandFailed {
            operation,
            exit_code,
            ..
        } => {
            assert_eq!(operation, "pull");
            assert_ne!(exit_code, Some(0));
        }
        other => panic!("expected a failed pull, got {other:?}"),
    }
    assert!(!ws.working_copy().join("remote.txt").exists());
    Ok(())
}

/// Sync all keeps going past a repository whose upstream does not exist
#[tokio::test]
async fn test_sync_all_reports_counts() -> Result<()> {
    require_git!();
    let upstream = Upstream::new()?;
    let ws = Workspace::new(&upstream)?;
    let broken = RepositoryRef::with_name("broken", "/nonexistent/lazycontext/upstream.git");

    let report = ws.service.sync_all(&[broken, ws.repo.clone()]).await;

    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.to_string(), "1 synced, 1 failed");
    assert_eq!(report.results[0].name, "broken");
    assert!(report.results[0].result.is_err());
    Ok(())
}
