// ABOUTME: Test UI display components including header counts, badges and the status bar

use lazycontext::app::AppState;
use lazycontext::app::state::{StatusKind, View};
use lazycontext::components::LayoutComponent;
use lazycontext::config::Registry;
use lazycontext::git::RepoEvent;
use lazycontext::models::{LogEntry, RepositoryRef, SyncOperation, SyncState};
use ratatui::{Terminal, backend::TestBackend};

fn state_with_statuses() -> AppState {
    let mut state = AppState::default();
    state.set_repos(&Registry::new(vec![
        RepositoryRef::from_url("https://github.com/Effect-TS/effect").unwrap(),
        RepositoryRef::from_url("https://github.com/ratatui/ratatui").unwrap(),
        RepositoryRef::from_url("https://github.com/tokio-rs/tokio").unwrap(),
        RepositoryRef::from_url("https://github.com/serde-rs/serde").unwrap(),
    ]));
    let results = [
        ("effect", SyncState::UpToDate),
        ("ratatui", SyncState::Behind { commits: 3 }),
        ("tokio", SyncState::Missing),
        ("serde", SyncState::Modified),
    ];
    for (name, state_value) in results {
        state.apply_repo_event(RepoEvent::StatusChecked {
            name: name.to_string(),
            result: Ok(state_value),
        });
    }
    state
}

fn render(state: &mut AppState, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut layout = LayoutComponent::new();

    terminal
        .draw(|frame| {
            layout.render(frame, state);
        })
        .unwrap();

    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(ratatui::buffer::Cell::symbol).collect()
}

#[test]
fn test_header_shows_counts() {
    let mut state = state_with_statuses();
    let content = render(&mut state, 120, 30);

    assert!(content.contains("1/4"), "missing synced/total in: {content}");
    assert!(content.contains("1 missing"), "missing count absent in: {content}");
}

#[test]
fn test_rows_show_owner_name_and_badges() {
    let mut state = state_with_statuses();
    let content = render(&mut state, 120, 30);

    assert!(content.contains("Effect-TS / effect"));
    assert!(content.contains("✓ up to date"));
    assert!(content.contains("3 behind"));
    assert!(content.contains("✗ missing"));
    assert!(content.contains("modified"));
}

#[test]
fn test_syncing_and_error_badges() {
    let mut state = state_with_statuses();
    state.apply_repo_event(RepoEvent::SyncStarted {
        name: "tokio".to_string(),
        operation: SyncOperation::Clone,
    });
    state.apply_repo_event(RepoEvent::SyncFinished {
        name: "ratatui".to_string(),
        result: Err("fatal: Not possible to fast-forward".to_string()),
    });

    let content = render(&mut state, 120, 30);
    assert!(content.contains("cloning..."));
    assert!(content.contains("3 behind (error)"));
}

#[test]
fn test_status_bar_shows_hints_message_and_version() {
    let mut state = state_with_statuses();
    state.set_status("Pulled effect (up to date)", StatusKind::Success);
    let content = render(&mut state, 140, 30);

    assert!(content.contains("Pulled effect (up to date)"));
    assert!(content.contains("sync all"));
    assert!(content.contains("efresh"));
    assert!(content.contains("help"));
    assert!(content.contains(&format!("lazycontext v{}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_empty_registry_hint() {
    let mut state = AppState::default();
    let content = render(&mut state, 100, 20);
    assert!(content.contains("No repositories tracked"));
    assert!(content.contains("0/0"));
}

#[test]
fn test_console_shows_log_entries() {
    let mut state = state_with_statuses();
    state.log(LogEntry::command(
        "git",
        &["-C".to_string(), ".context/effect".to_string(), "pull".to_string()],
    ));
    state.log(LogEntry::error("Sync failed for ratatui").with_details("fatal: boom"));
    state.console_visible = true;

    let content = render(&mut state, 140, 40);
    assert!(content.contains("Command Log"));
    assert!(content.contains("CMD"));
    assert!(content.contains("git -C .context/effect pull"));
    assert!(content.contains("ERR"));
    assert!(content.contains("fatal: boom"));
}

#[test]
fn test_add_repo_overlay() {
    let mut state = AppState::default();
    state.current_view = View::AddRepo;
    state.url_input = "https://github.com/owner/re".to_string();

    let content = render(&mut state, 120, 30);
    assert!(content.contains("Add Repository"));
    assert!(content.contains("https://github.com/owner/re"));
}

#[test]
fn test_help_and_confirmation_overlays() {
    let mut state = state_with_statuses();
    state.help_visible = true;
    let content = render(&mut state, 120, 40);
    assert!(content.contains("Help - Press ? or Esc to close"));
    assert!(content.contains("Toggle command log"));

    state.help_visible = false;
    state.show_remove_confirmation();
    let content = render(&mut state, 120, 40);
    assert!(content.contains("Remove Repository"));
    assert!(content.contains("[Y]es"));
    assert!(content.contains("[N]o"));
}
