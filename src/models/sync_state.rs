// ABOUTME: Sync state of a working copy relative to its upstream, plus the UI display status

use serde::Serialize;
use std::fmt;

/// Observed state of a tracked repository's working copy.
///
/// Always derived from a fresh look at the disk, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncState {
    /// No working copy at the expected path
    Missing,
    /// Clean and level with upstream
    UpToDate,
    /// Clean but upstream has commits we don't
    Behind { commits: u32 },
    /// Uncommitted changes, tracked or untracked
    Modified,
}

impl SyncState {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::UpToDate => "up to date",
            Self::Behind { .. } => "behind",
            Self::Modified => "modified",
        }
    }

    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Missing => "✗",
            Self::UpToDate => "✓",
            Self::Behind { .. } | Self::Modified => "…",
        }
    }

    pub const fn commits_behind(&self) -> Option<u32> {
        match self {
            Self::Behind { commits } => Some(*commits),
            _ => None,
        }
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Behind { commits } => write!(f, "{} behind", commits),
            other => f.write_str(other.label()),
        }
    }
}

/// Which mutating git command a sync ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    Clone,
    Pull,
}

impl SyncOperation {
    /// Pick the operation implied by the state a repository is believed to be in
    pub const fn for_state(state: &SyncState) -> Self {
        if state.is_missing() { Self::Clone } else { Self::Pull }
    }

    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::Pull => "pull",
        }
    }

    pub const fn progress_label(&self) -> &'static str {
        match self {
            Self::Clone => "cloning...",
            Self::Pull => "pulling...",
        }
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// What the dashboard shows for a row. Presentation only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayStatus {
    Loading,
    Syncing(SyncOperation),
    Ready(SyncState),
    Failed {
        message: String,
        last_known: Option<SyncState>,
    },
}

impl DisplayStatus {
    /// The last state actually observed, if any
    pub fn known_state(&self) -> Option<SyncState> {
        match self {
            Self::Ready(state) => Some(*state),
            Self::Failed { last_known, .. } => *last_known,
            Self::Loading | Self::Syncing(_) => None,
        }
    }

    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Syncing(_))
    }

    /// Badge text shown next to the repository name
    pub fn badge_text(&self) -> String {
        match self {
            Self::Loading => "loading...".to_string(),
            Self::Syncing(op) => op.progress_label().to_string(),
            Self::Ready(state) => state.to_string(),
            Self::Failed { last_known: Some(state), .. } => format!("{} (error)", state),
            Self::Failed { last_known: None, .. } => "error".to_string(),
        }
    }

    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Loading | Self::Syncing(_) => "◐",
            Self::Ready(state) => state.icon(),
            Self::Failed { .. } => "!",
        }
    }
}
