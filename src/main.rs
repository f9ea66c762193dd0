// ABOUTME: Main entry point for lazycontext with TUI and CLI support
//
// Binary: lazycontext
// Usage: lazycontext [COMMAND]
// - No command: launches TUI
// - status: show the state of every tracked repository
// - sync: clone or pull repositories
// - add / remove: edit the registry

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, prelude::*};
use std::{
    io::{self, IsTerminal},
    process::ExitCode,
    sync::Arc,
    time::{Duration, Instant},
};

use lazycontext::app::{App, EventHandler};
use lazycontext::cli;
use lazycontext::components::LayoutComponent;
use lazycontext::config::Settings;
use lazycontext::git::{CommandRunner, RepoService, SystemRunner};

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Unified terminal cleanup that works with a terminal instance
fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = setup_logging() {
        eprintln!("Logging disabled: {e:#}");
    }
    setup_panic_handler();

    let args = cli::Cli::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            // Ensure terminal is cleaned up on any error
            cleanup_terminal();
            tracing::error!("{:#}", e);
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: cli::Cli) -> Result<ExitCode> {
    let settings = Settings::load(&args.overrides())?;
    tracing::debug!("Settings: {:?}", settings);

    let store = settings.registry_store();
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::new());
    let service = RepoService::from_settings(runner, &settings);

    match args.command {
        // CLI commands
        Some(cli::Commands::Status) => {
            let registry = store.load()?;
            cli::status::execute(&service, &registry, args.format).await?;
        }
        Some(cli::Commands::Sync(sync_args)) => {
            let registry = store.load()?;
            let report =
                cli::sync::execute(&service, &registry, sync_args.name.as_deref(), args.format)
                    .await?;
            if report.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Some(cli::Commands::Add(add_args)) => {
            cli::registry::add(&store, &service, &add_args, args.format).await?;
        }
        Some(cli::Commands::Remove(remove_args)) => {
            cli::registry::remove(&store, &remove_args, args.format)?;
        }

        // TUI mode (explicit or default)
        Some(cli::Commands::Tui) | None => {
            let mut app = App::new(settings);
            app.init().await;
            let mut layout = LayoutComponent::new();

            // Flush any pending terminal events to prevent stray keypresses
            while event::poll(Duration::from_millis(10)).unwrap_or(false) {
                let _ = event::read();
            }

            run_tui(&mut app, &mut layout).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn run_tui(app: &mut App, layout: &mut LayoutComponent) -> Result<()> {
    // Check if we have a proper TTY
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Use 'lazycontext status' or 'lazycontext sync' for scripted use."
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Ensure terminal cleanup happens even if there's an error
    let result = run_tui_loop(app, layout, &mut terminal).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        tracing::error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    layout: &mut LayoutComponent,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &mut app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                // Windows reports releases too
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) =
                        EventHandler::handle_key_event(key_event, &mut app.state)
                    {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                    // Start queued work right away instead of waiting for the tick
                    app.process_async_action().await?;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick().await?;
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            tracing::info!("Quit requested, leaving dashboard");
            break;
        }
    }

    Ok(())
}

/// JSON lines to `~/.lazycontext/logs`; the terminal belongs to the TUI
fn setup_logging() -> Result<()> {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = Settings::user_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;

    let log_file = log_dir.join(format!(
        "lazycontext-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazycontext=info".into()),
        )
        .init();
    Ok(())
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        cleanup_terminal();

        tracing::error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check ~/.lazycontext/logs for more details.");
    }));
}
