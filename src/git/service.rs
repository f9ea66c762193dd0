// ABOUTME: Repository service: per-repo locking, sync-then-refresh and bounded "sync all" batches

use futures_util::stream::{self, StreamExt};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use super::runner::CommandRunner;
use super::status::StatusClassifier;
use super::sync::Syncer;
use super::GitError;
use crate::config::Settings;
use crate::models::{RepositoryRef, SyncOperation, SyncState};

/// Result of a successful sync followed by a fresh status check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub operation: SyncOperation,
    pub state: SyncState,
}

/// Per-repository result inside a batch, in registry order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSyncResult {
    pub name: String,
    pub result: Result<SyncOutcome, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<RepoSyncResult>,
}

impl BatchReport {
    fn from_results(results: Vec<RepoSyncResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.result.is_ok()).count();
        Self {
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} synced, {} failed", self.succeeded, self.failed)
    }
}

/// Notifications from the service to whoever presents results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoEvent {
    StatusChecked {
        name: String,
        result: Result<SyncState, String>,
    },
    SyncStarted {
        name: String,
        operation: SyncOperation,
    },
    SyncFinished {
        name: String,
        result: Result<SyncOutcome, String>,
    },
    BatchFinished(BatchReport),
}

/// One async mutex per repository name
#[derive(Debug, Default)]
pub struct RepoLocks {
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RepoLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(name.to_string()).or_default())
    }
}

/// Checks and syncs tracked repositories, never letting two operations on
/// the same repository overlap.
#[derive(Clone)]
pub struct RepoService {
    classifier: StatusClassifier,
    syncer: Syncer,
    target_dir: PathBuf,
    max_parallel: usize,
    locks: Arc<RepoLocks>,
    events: Option<UnboundedSender<RepoEvent>>,
}

impl RepoService {
    pub fn new(classifier: StatusClassifier, syncer: Syncer, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            classifier,
            syncer,
            target_dir: target_dir.into(),
            max_parallel: default_parallelism(),
            locks: Arc::new(RepoLocks::new()),
            events: None,
        }
    }

    pub fn from_settings(runner: Arc<dyn CommandRunner>, settings: &Settings) -> Self {
        let classifier = StatusClassifier::new(Arc::clone(&runner))
            .with_fallback_upstream(settings.fallback_upstream.clone())
            .with_fetch(settings.fetch_before_status);
        let syncer = Syncer::new(runner).with_clone_depth(settings.clone_depth);
        Self::new(classifier, syncer, settings.target_dir.clone())
            .with_max_parallel(settings.max_parallel_syncs)
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Publish results as `RepoEvent`s on `events`
    pub fn with_events(mut self, events: UnboundedSender<RepoEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub const fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    fn emit(&self, event: RepoEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    pub async fn check(&self, repo: &RepositoryRef) -> Result<SyncState, GitError> {
        let name = repo.display_name();
        let lock = self.locks.lock_for(&name);
        let _guard = lock.lock().await;

        let result = self.classifier.check_status(repo, &self.target_dir).await;
        if let Err(e) = &result {
            error!("Status check failed for {}: {}", name, e);
        }
        self.emit(RepoEvent::StatusChecked {
            name,
            result: result.as_ref().copied().map_err(ToString::to_string),
        });
        result
    }

    /// Sync a repository, then re-classify it.
    ///
    /// Without an `assumed` state the repository is classified first to pick
    /// clone or pull.
    pub async fn sync_and_refresh(
        &self,
        repo: &RepositoryRef,
        assumed: Option<SyncState>,
    ) -> Result<SyncOutcome, GitError> {
        let name = repo.display_name();
        let lock = self.locks.lock_for(&name);
        let _guard = lock.lock().await;

        let result = self.sync_locked(repo, &name, assumed).await;
        match &result {
            Ok(outcome) => info!("Synced {} ({}): {}", name, outcome.operation, outcome.state),
            Err(e) => error!("Sync failed for {}: {}", name, e),
        }
        self.emit(RepoEvent::SyncFinished {
            name,
            result: result.as_ref().copied().map_err(ToString::to_string),
        });
        result
    }

    async fn sync_locked(
        &self,
        repo: &RepositoryRef,
        name: &str,
        assumed: Option<SyncState>,
    ) -> Result<SyncOutcome, GitError> {
        let assumed = match assumed {
            Some(state) => state,
            None => self.classifier.check_status(repo, &self.target_dir).await?,
        };

        let operation = SyncOperation::for_state(&assumed);
        self.emit(RepoEvent::SyncStarted {
            name: name.to_string(),
            operation,
        });
        self.syncer.sync(repo, &self.target_dir, &assumed).await?;

        let state = self.classifier.check_status(repo, &self.target_dir).await?;
        Ok(SyncOutcome { operation, state })
    }

    /// Sync every repository with at most `max_parallel` in flight. Failures
    /// are collected, never abort the batch.
    pub async fn sync_all(&self, repos: &[RepositoryRef]) -> BatchReport {
        info!(
            "Syncing {} repositories ({} at a time)",
            repos.len(),
            self.max_parallel
        );
        let results: Vec<RepoSyncResult> = stream::iter(repos.iter().cloned())
            .map(|repo| {
                let service = self.clone();
                async move {
                    let result = service
                        .sync_and_refresh(&repo, None)
                        .await
                        .map_err(|e| e.to_string());
                    RepoSyncResult {
                        name: repo.display_name(),
                        result,
                    }
                }
            })
            .buffered(self.max_parallel)
            .collect()
            .await;

        let report = BatchReport::from_results(results);
        info!("Sync all finished: {}", report);
        self.emit(RepoEvent::BatchFinished(report.clone()));
        report
    }
}

pub fn default_parallelism() -> usize {
    std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get)
}
