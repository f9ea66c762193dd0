// ABOUTME: Event handling system for keyboard input and app actions

use crate::app::{
    AppState,
    state::{AsyncAction, ConfirmAction, View},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    NextRepo,
    PreviousRepo,
    GoToTop,
    GoToBottom,
    SyncSelected,
    SyncAll,
    RefreshAll,
    StartAddRepo,
    RemoveSelected,
    ToggleHelp,
    ToggleConsole,
    CloseOverlay,
    // Add repository view events
    AddRepoInputChar(char),
    AddRepoBackspace,
    AddRepoSubmit,
    AddRepoCancel,
    // Confirmation dialog events
    ConfirmationToggle,        // Switch between Yes/No
    ConfirmationConfirm,       // Confirm highlighted option
    ConfirmationCancel,        // Cancel dialog
    ConfirmationChoose(bool),  // y/n shortcut
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if key_event.code == KeyCode::Char('c')
            && key_event.modifiers.contains(KeyModifiers::CONTROL)
        {
            return Some(AppEvent::Quit);
        }

        // Handle confirmation dialog first (highest priority)
        if state.confirmation_dialog.is_some() {
            return match key_event.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => Some(AppEvent::ConfirmationToggle),
                KeyCode::Enter => Some(AppEvent::ConfirmationConfirm),
                KeyCode::Esc => Some(AppEvent::ConfirmationCancel),
                KeyCode::Char('y' | 'Y') => Some(AppEvent::ConfirmationChoose(true)),
                KeyCode::Char('n' | 'N') => Some(AppEvent::ConfirmationChoose(false)),
                _ => None,
            };
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        if state.current_view == View::AddRepo {
            return Self::handle_add_repo_keys(key_event);
        }

        match key_event.code {
            KeyCode::Char('q') => Some(AppEvent::Quit),
            KeyCode::Esc => Some(AppEvent::CloseOverlay),
            KeyCode::Char('j') | KeyCode::Down => Some(AppEvent::NextRepo),
            KeyCode::Char('k') | KeyCode::Up => Some(AppEvent::PreviousRepo),
            KeyCode::Char('g') | KeyCode::Home => Some(AppEvent::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(AppEvent::GoToBottom),
            KeyCode::Enter => Some(AppEvent::SyncSelected),
            KeyCode::Char('s') => Some(AppEvent::SyncAll),
            KeyCode::Char('a') => Some(AppEvent::StartAddRepo),
            KeyCode::Char('d') => Some(AppEvent::RemoveSelected),
            KeyCode::Char('r') => Some(AppEvent::RefreshAll),
            KeyCode::Char('`') => Some(AppEvent::ToggleConsole),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            _ => None,
        }
    }

    fn handle_add_repo_keys(key_event: KeyEvent) -> Option<AppEvent> {
        match key_event.code {
            KeyCode::Esc => Some(AppEvent::AddRepoCancel),
            KeyCode::Enter => Some(AppEvent::AddRepoSubmit),
            KeyCode::Backspace => Some(AppEvent::AddRepoBackspace),
            KeyCode::Char(ch) => Some(AppEvent::AddRepoInputChar(ch)),
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::ToggleConsole => state.toggle_console(),
            AppEvent::CloseOverlay => {
                // Esc in the list closes the console, otherwise does nothing
                if state.console_visible {
                    state.toggle_console();
                }
            }
            AppEvent::NextRepo => state.next_repo(),
            AppEvent::PreviousRepo => state.previous_repo(),
            AppEvent::GoToTop => state.select_first(),
            AppEvent::GoToBottom => state.select_last(),
            AppEvent::SyncSelected => state.request_sync_selected(),
            AppEvent::SyncAll => state.request_sync_all(),
            AppEvent::RefreshAll => {
                // Mark for async processing to re-check every repository
                state.pending_async_action = Some(AsyncAction::RefreshAll);
            }
            AppEvent::StartAddRepo => state.start_add_repo(),
            AppEvent::RemoveSelected => state.show_remove_confirmation(),
            AppEvent::AddRepoInputChar(ch) => state.url_input.push(ch),
            AppEvent::AddRepoBackspace => {
                state.url_input.pop();
            }
            AppEvent::AddRepoSubmit => state.submit_add_repo(),
            AppEvent::AddRepoCancel => state.cancel_add_repo(),
            AppEvent::ConfirmationToggle => {
                if let Some(ref mut dialog) = state.confirmation_dialog {
                    dialog.selected_option = !dialog.selected_option;
                }
            }
            AppEvent::ConfirmationConfirm => {
                if let Some(dialog) = state.confirmation_dialog.take() {
                    if dialog.selected_option {
                        Self::run_confirmed(dialog.confirm_action, state);
                    }
                    // If not confirmed, just close the dialog
                }
            }
            AppEvent::ConfirmationChoose(confirmed) => {
                if let Some(dialog) = state.confirmation_dialog.take() {
                    if confirmed {
                        Self::run_confirmed(dialog.confirm_action, state);
                    }
                }
            }
            AppEvent::ConfirmationCancel => {
                debug!("Confirmation dialog cancelled");
                state.confirmation_dialog = None;
            }
        }
    }

    fn run_confirmed(action: ConfirmAction, state: &mut AppState) {
        match action {
            ConfirmAction::RemoveRepo(name) => {
                info!("Removal of {} confirmed", name);
                state.pending_async_action = Some(AsyncAction::RemoveRepo(name));
            }
        }
    }
}
