// ABOUTME: Application state for the lazycontext dashboard and the async action loop that drives it

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info, warn};

use crate::config::{Registry, RegistryStore, Settings};
use crate::git::{CommandRunner, RepoEvent, RepoService, SystemRunner};
use crate::models::{
    CommandLog, DisplayStatus, LogEntry, RepositoryRef, SyncOperation, SyncState,
};

/// Notification system for TUI messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Error,
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Notification {
    pub fn success(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Success,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Error,
            created_at: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    pub fn info(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Info,
            created_at: Instant::now(),
            duration: Duration::from_secs(3),
        }
    }

    pub fn warning(message: String) -> Self {
        Self {
            message,
            notification_type: NotificationType::Warning,
            created_at: Instant::now(),
            duration: Duration::from_secs(4),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    AddRepo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One line message shown in the status bar until replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone)]
pub struct ConfirmationDialog {
    pub title: String,
    pub message: String,
    pub confirm_action: ConfirmAction,
    pub selected_option: bool, // true = Yes, false = No
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    RemoveRepo(String),
}

/// A tracked repository as shown in the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRow {
    pub repo: RepositoryRef,
    pub name: String,
    pub owner: Option<String>,
    pub status: DisplayStatus,
    /// Last state actually observed, kept while a sync is in flight
    pub last_known: Option<SyncState>,
}

impl RepoRow {
    pub fn new(repo: RepositoryRef) -> Self {
        let owner = repo.github().map(|gh| gh.owner);
        Self {
            name: repo.display_name(),
            owner,
            repo,
            status: DisplayStatus::Loading,
            last_known: None,
        }
    }

    pub const fn is_syncing(&self) -> bool {
        matches!(self.status, DisplayStatus::Syncing(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncAction {
    LoadRegistry,
    RefreshAll,
    SyncRepo(String),
    SyncAll,
    AddRepo(String),
    RemoveRepo(String),
}

#[derive(Debug)]
pub struct AppState {
    pub rows: Vec<RepoRow>,
    pub selected_index: usize,
    pub current_view: View,
    pub should_quit: bool,
    pub help_visible: bool,
    pub console_visible: bool,
    // Add repository input buffer
    pub url_input: String,
    pub confirmation_dialog: Option<ConfirmationDialog>,
    pub status_message: Option<StatusMessage>,
    pub notifications: Vec<Notification>,
    pub command_log: CommandLog,
    // Async action processing
    pub pending_async_action: Option<AsyncAction>,
    // A "sync all" batch is running
    pub batch_in_progress: bool,
    pub settings: Settings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            rows: Vec::new(),
            selected_index: 0,
            current_view: View::List,
            should_quit: false,
            help_visible: false,
            console_visible: false,
            url_input: String::new(),
            confirmation_dialog: None,
            status_message: None,
            notifications: Vec::new(),
            command_log: CommandLog::new(settings.log_capacity),
            pending_async_action: None,
            batch_in_progress: false,
            settings,
        }
    }

    /// Replace the rows with the registry contents, keeping statuses of repos still tracked
    pub fn set_repos(&mut self, registry: &Registry) {
        let mut previous = std::mem::take(&mut self.rows);
        self.rows = registry
            .repos
            .iter()
            .map(|repo| {
                let name = repo.display_name();
                previous
                    .iter()
                    .position(|row| row.name == name)
                    .map(|idx| previous.swap_remove(idx))
                    .filter(|row| row.repo == *repo)
                    .unwrap_or_else(|| RepoRow::new(repo.clone()))
            })
            .collect();
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.rows.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.rows.len() {
            self.selected_index = self.rows.len() - 1;
        }
    }

    pub fn selected_row(&self) -> Option<&RepoRow> {
        self.rows.get(self.selected_index)
    }

    pub fn row(&self, name: &str) -> Option<&RepoRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    fn row_mut(&mut self, name: &str) -> Option<&mut RepoRow> {
        self.rows.iter_mut().find(|row| row.name == name)
    }

    pub fn next_repo(&mut self) {
        if self.selected_index + 1 < self.rows.len() {
            self.selected_index += 1;
        }
    }

    pub fn previous_repo(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_index = self.rows.len().saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn toggle_console(&mut self) {
        self.console_visible = !self.console_visible;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Queue a sync of the selected repository unless one is already running
    pub fn request_sync_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.is_syncing() {
            debug!("Ignoring sync request for {}: already syncing", row.name);
            return;
        }
        self.pending_async_action = Some(AsyncAction::SyncRepo(row.name.clone()));
    }

    pub fn request_sync_all(&mut self) {
        if self.batch_in_progress {
            self.set_status("Sync all already running", StatusKind::Info);
            return;
        }
        if self.rows.is_empty() {
            self.set_status("No repositories to sync", StatusKind::Info);
            return;
        }
        self.pending_async_action = Some(AsyncAction::SyncAll);
    }

    pub fn start_add_repo(&mut self) {
        self.url_input.clear();
        self.current_view = View::AddRepo;
    }

    pub fn cancel_add_repo(&mut self) {
        self.url_input.clear();
        self.current_view = View::List;
    }

    /// Validate the typed URL before anything touches the registry
    pub fn submit_add_repo(&mut self) {
        let url = self.url_input.trim().to_string();
        match crate::git::parse_github_url(&url) {
            Ok(parsed) => {
                info!("Adding repository {}", parsed);
                self.pending_async_action = Some(AsyncAction::AddRepo(url));
                self.url_input.clear();
                self.current_view = View::List;
            }
            Err(e) => self.set_status(e.to_string(), StatusKind::Error),
        }
    }

    pub fn show_remove_confirmation(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let name = row.name.clone();
        self.confirmation_dialog = Some(ConfirmationDialog {
            title: "Remove Repository".to_string(),
            message: format!(
                "Stop tracking '{}'? The working copy on disk is kept.",
                name
            ),
            confirm_action: ConfirmAction::RemoveRepo(name),
            selected_option: false, // Default to "No"
        });
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    pub fn log(&mut self, entry: LogEntry) {
        self.command_log.push(entry);
    }

    /// Counts for the header: (up to date, total, missing)
    pub fn summary_counts(&self) -> (usize, usize, usize) {
        let synced = self
            .rows
            .iter()
            .filter(|row| row.status == DisplayStatus::Ready(SyncState::UpToDate))
            .count();
        let missing = self
            .rows
            .iter()
            .filter(|row| row.status == DisplayStatus::Ready(SyncState::Missing))
            .count();
        (synced, self.rows.len(), missing)
    }

    /// Fold a service event into the rows
    pub fn apply_repo_event(&mut self, event: RepoEvent) {
        match event {
            RepoEvent::StatusChecked { name, result } => {
                let Some(row) = self.row_mut(&name) else {
                    return;
                };
                match result {
                    Ok(state) if row.is_syncing() => {
                        row.last_known = Some(state);
                    }
                    Ok(state) => {
                        row.status = DisplayStatus::Ready(state);
                        row.last_known = Some(state);
                    }
                    Err(message) if row.is_syncing() => {
                        self.log(LogEntry::error(format!("Status check failed for {}", name))
                            .with_details(message));
                    }
                    Err(message) => {
                        row.status = DisplayStatus::Failed {
                            message: message.clone(),
                            last_known: None,
                        };
                        self.log(LogEntry::error(format!("Status check failed for {}", name))
                            .with_details(message));
                    }
                }
            }
            RepoEvent::SyncStarted { name, operation } => {
                if let Some(row) = self.row_mut(&name) {
                    row.status = DisplayStatus::Syncing(operation);
                }
                self.log(LogEntry::info(format!("{} {}", operation.progress_label(), name)));
            }
            RepoEvent::SyncFinished { name, result } => {
                let Some(row) = self.row_mut(&name) else {
                    return;
                };
                match result {
                    Ok(outcome) => {
                        row.status = DisplayStatus::Ready(outcome.state);
                        row.last_known = Some(outcome.state);
                        let verb = match outcome.operation {
                            SyncOperation::Clone => "Cloned",
                            SyncOperation::Pull => "Pulled",
                        };
                        let message = format!("{} {} ({})", verb, name, outcome.state);
                        self.log(LogEntry::success(message.clone()));
                        if !self.batch_in_progress {
                            self.set_status(message, StatusKind::Success);
                        }
                    }
                    Err(message) => {
                        let last_known = row.last_known;
                        row.status = DisplayStatus::Failed {
                            message: message.clone(),
                            last_known,
                        };
                        self.log(LogEntry::error(format!("Sync failed for {}", name))
                            .with_details(message.clone()));
                        if !self.batch_in_progress {
                            self.set_status(
                                format!("Sync failed for {}: {}", name, message),
                                StatusKind::Error,
                            );
                        }
                    }
                }
            }
            RepoEvent::BatchFinished(report) => {
                self.batch_in_progress = false;
                let kind = if report.failed == 0 {
                    StatusKind::Success
                } else {
                    StatusKind::Error
                };
                self.log(LogEntry::info(format!("Sync all: {}", report)));
                self.set_status(report.to_string(), kind);
            }
        }
    }

    /// Add a notification to the notification queue
    pub fn add_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn add_success_notification(&mut self, message: String) {
        self.add_notification(Notification::success(message));
    }

    pub fn add_error_notification(&mut self, message: String) {
        self.add_notification(Notification::error(message));
    }

    pub fn add_info_notification(&mut self, message: String) {
        self.add_notification(Notification::info(message));
    }

    pub fn add_warning_notification(&mut self, message: String) {
        self.add_notification(Notification::warning(message));
    }

    /// Remove expired notifications
    pub fn cleanup_expired_notifications(&mut self) {
        self.notifications.retain(|n| !n.is_expired());
    }

    /// Get current notifications (non-expired)
    pub fn get_current_notifications(&self) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| !n.is_expired()).collect()
    }
}

/// Owns the state plus everything needed to act on it
pub struct App {
    pub state: AppState,
    service: RepoService,
    store: RegistryStore,
    repo_events: UnboundedReceiver<RepoEvent>,
    log_entries: UnboundedReceiver<LogEntry>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let (log_tx, log_rx) = mpsc::unbounded_channel();
        let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::with_observer(log_tx));
        Self::build(settings, runner, log_rx)
    }

    /// App driven by a custom runner; command log entries come only from the app itself
    pub fn with_runner(settings: Settings, runner: Arc<dyn CommandRunner>) -> Self {
        let (_log_tx, log_rx) = mpsc::unbounded_channel();
        Self::build(settings, runner, log_rx)
    }

    fn build(
        settings: Settings,
        runner: Arc<dyn CommandRunner>,
        log_entries: UnboundedReceiver<LogEntry>,
    ) -> Self {
        let (event_tx, repo_events) = mpsc::unbounded_channel();
        let service = RepoService::from_settings(runner, &settings).with_events(event_tx);
        let store = settings.registry_store();
        Self {
            state: AppState::new(settings),
            service,
            store,
            repo_events,
            log_entries,
        }
    }

    pub async fn init(&mut self) {
        info!(
            "Starting dashboard (registry {}, target {})",
            self.store.path().display(),
            self.service.target_dir().display()
        );
        self.state.pending_async_action = Some(AsyncAction::LoadRegistry);
        if let Err(e) = self.process_async_action().await {
            warn!("Initial load failed: {}", e);
        }
    }

    pub async fn tick(&mut self) -> anyhow::Result<()> {
        self.state.cleanup_expired_notifications();

        // Drain results without blocking
        while let Ok(entry) = self.log_entries.try_recv() {
            self.state.log(entry);
        }
        while let Ok(event) = self.repo_events.try_recv() {
            self.state.apply_repo_event(event);
        }

        if let Err(e) = self.process_async_action().await {
            warn!("Error processing async action: {}", e);
            self.state.pending_async_action = None;
        }
        Ok(())
    }

    /// Run the queued action. Checks and syncs are spawned; only registry I/O happens inline.
    pub async fn process_async_action(&mut self) -> anyhow::Result<()> {
        let Some(action) = self.state.pending_async_action.take() else {
            return Ok(());
        };
        debug!("Processing async action: {:?}", action);

        match action {
            AsyncAction::LoadRegistry => self.load_registry(),
            AsyncAction::RefreshAll => self.refresh_all(),
            AsyncAction::SyncRepo(name) => self.sync_repo(&name),
            AsyncAction::SyncAll => self.sync_all(),
            AsyncAction::AddRepo(url) => self.add_repo(&url),
            AsyncAction::RemoveRepo(name) => self.remove_repo(&name),
        }
        Ok(())
    }

    fn load_registry(&mut self) {
        match self.store.load() {
            Ok(registry) => {
                info!("Loaded {} repositories", registry.len());
                self.state.set_repos(&registry);
                self.state
                    .log(LogEntry::info(format!("Loaded {} repositories", registry.len())));
                self.refresh_all();
            }
            Err(e) => {
                error!("Failed to load registry: {}", e);
                self.state.log(LogEntry::error("Failed to load registry").with_details(e.to_string()));
                self.state.set_status(e.to_string(), StatusKind::Error);
                self.state.add_error_notification(e.to_string());
            }
        }
    }

    fn refresh_all(&mut self) {
        let names: Vec<String> = self
            .state
            .rows
            .iter()
            .filter(|row| !row.is_syncing())
            .map(|row| row.name.clone())
            .collect();
        for name in names {
            self.spawn_check(&name);
        }
    }

    fn spawn_check(&mut self, name: &str) {
        let Some(row) = self.state.row_mut(name) else {
            return;
        };
        row.status = DisplayStatus::Loading;
        let repo = row.repo.clone();
        let service = self.service.clone();
        tokio::spawn(async move {
            // Result is published as a RepoEvent
            let _ = service.check(&repo).await;
        });
    }

    fn sync_repo(&mut self, name: &str) {
        let Some(row) = self.state.row_mut(name) else {
            return;
        };
        if row.is_syncing() {
            return;
        }
        let assumed = row.status.known_state();
        // Clone or pull is only decided once the service classifies an unknown row
        let operation = assumed.map_or(SyncOperation::Pull, |state| SyncOperation::for_state(&state));
        row.status = DisplayStatus::Syncing(operation);
        let repo = row.repo.clone();
        let service = self.service.clone();
        tokio::spawn(async move {
            let _ = service.sync_and_refresh(&repo, assumed).await;
        });
    }

    fn sync_all(&mut self) {
        if self.state.batch_in_progress {
            return;
        }
        let repos: Vec<RepositoryRef> = self
            .state
            .rows
            .iter()
            .filter(|row| !row.is_syncing())
            .map(|row| row.repo.clone())
            .collect();
        if repos.is_empty() {
            return;
        }

        self.state.batch_in_progress = true;
        self.state
            .set_status(format!("Syncing {} repositories...", repos.len()), StatusKind::Info);
        let service = self.service.clone();
        tokio::spawn(async move {
            service.sync_all(&repos).await;
        });
    }

    fn add_repo(&mut self, url: &str) {
        match self.store.add_repo(url) {
            Ok(registry) => {
                let before = self.state.rows.len();
                self.state.set_repos(&registry);
                if self.state.rows.len() == before {
                    self.state
                        .set_status(format!("{} is already tracked", url), StatusKind::Info);
                    self.state
                        .add_warning_notification(format!("{} is already tracked", url));
                    return;
                }

                let name = registry
                    .repos
                    .iter()
                    .find(|r| r.url.trim() == url.trim())
                    .map(RepositoryRef::display_name);
                if let Some(name) = name {
                    if let Some(idx) = self.state.rows.iter().position(|r| r.name == name) {
                        self.state.selected_index = idx;
                    }
                    self.state.add_success_notification(format!("Added {}", name));
                    self.state.log(LogEntry::success(format!("Added {}", name)));
                    // Clone right away; the classifier decides if a copy already exists
                    let service = self.service.clone();
                    if let Some(repo) = self.state.row(&name).map(|r| r.repo.clone()) {
                        tokio::spawn(async move {
                            let _ = service.sync_and_refresh(&repo, None).await;
                        });
                    }
                }
            }
            Err(e) => {
                error!("Failed to add {}: {}", url, e);
                self.state.log(LogEntry::error(format!("Failed to add {}", url)).with_details(e.to_string()));
                self.state.set_status(e.to_string(), StatusKind::Error);
                self.state.add_error_notification(e.to_string());
            }
        }
    }

    fn remove_repo(&mut self, name: &str) {
        match self.store.remove_repo(name) {
            Ok(registry) => {
                self.state.set_repos(&registry);
                self.state.add_info_notification(format!("Removed {}", name));
                self.state.log(LogEntry::info(format!("Removed {}", name)));
                self.state.set_status(
                    format!("Removed {} (working copy kept)", name),
                    StatusKind::Success,
                );
            }
            Err(e) => {
                error!("Failed to remove {}: {}", name, e);
                self.state.set_status(e.to_string(), StatusKind::Error);
                self.state.add_error_notification(e.to_string());
            }
        }
    }
}

// Include the test module inline
#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
