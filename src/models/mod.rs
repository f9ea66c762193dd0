// ABOUTME: Core data models for tracked repositories, sync states and the command log

pub mod log;
pub mod repository;
pub mod sync_state;

pub use log::{CommandLog, LogEntry, LogKind};
pub use repository::{RepositoryRef, validate_dir_name};
pub use sync_state::{DisplayStatus, SyncOperation, SyncState};
