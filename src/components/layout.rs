// ABOUTME: Main layout component: header counts, repo list, optional console, status bar and overlays

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

// Premium color palette (TUI Style Guide)
const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const WARNING_ORANGE: Color = Color::Rgb(255, 165, 0);
const ERROR_RED: Color = Color::Rgb(230, 100, 100);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);

const CONSOLE_HEIGHT: u16 = 10;

use super::{
    AddRepoComponent, CommandLogComponent, ConfirmationDialogComponent, HelpComponent,
    RepoListComponent, StatusBarComponent,
};
use crate::app::{
    AppState,
    state::{NotificationType, View},
};

pub struct LayoutComponent {
    repo_list: RepoListComponent,
    command_log: CommandLogComponent,
    status_bar: StatusBarComponent,
    help: HelpComponent,
    add_repo: AddRepoComponent,
    confirmation_dialog: ConfirmationDialogComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            repo_list: RepoListComponent::new(),
            command_log: CommandLogComponent::new(),
            status_bar: StatusBarComponent::new(),
            help: HelpComponent::new(),
            add_repo: AddRepoComponent::new(),
            confirmation_dialog: ConfirmationDialogComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &mut AppState) {
        let mut constraints = vec![
            Constraint::Length(3), // Header counts
            Constraint::Min(3),    // Repository list
        ];
        if state.console_visible {
            constraints.push(Constraint::Length(CONSOLE_HEIGHT));
        }
        constraints.push(Constraint::Length(4)); // Status bar (2 lines + borders)

        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(frame.size());

        self.render_header(frame, main_layout[0], state);
        self.repo_list.render(frame, main_layout[1], state);
        if state.console_visible {
            self.command_log.render(frame, main_layout[2], &state.command_log);
        }
        self.status_bar.render(frame, main_layout[main_layout.len() - 1], state);

        if state.current_view == View::AddRepo {
            self.add_repo.render(frame, frame.size(), state);
        }

        if state.help_visible {
            self.help.render(frame, frame.size());
        }

        // Confirmation dialog sits above everything but notifications
        if let Some(dialog) = &state.confirmation_dialog {
            self.confirmation_dialog.render(frame, frame.size(), dialog);
        }

        self.render_notifications(frame, frame.size(), state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let (synced, total, missing) = state.summary_counts();
        let synced_color = if total > 0 && synced == total {
            SELECTION_GREEN
        } else {
            SOFT_WHITE
        };

        let mut spans = vec![
            Span::styled(format!("{}/{}", synced, total), Style::default().fg(synced_color).add_modifier(Modifier::BOLD)),
            Span::styled(" synced", Style::default().fg(MUTED_GRAY)),
        ];
        if missing > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(SUBDUED_BORDER)));
            spans.push(Span::styled(format!("{} missing", missing), Style::default().fg(ERROR_RED)));
        }
        if state.batch_in_progress {
            spans.push(Span::styled("  │  ", Style::default().fg(SUBDUED_BORDER)));
            spans.push(Span::styled("syncing all...", Style::default().fg(CORNFLOWER_BLUE)));
        }
        spans.push(Span::styled("  │  ", Style::default().fg(SUBDUED_BORDER)));
        spans.push(Span::styled(
            state.settings.target_dir.display().to_string(),
            Style::default().fg(MUTED_GRAY),
        ));

        let header = Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(CORNFLOWER_BLUE))
                    .style(Style::default().bg(DARK_BG))
                    .title(Span::styled(
                        " lazycontext ",
                        Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
                    )),
            )
            .alignment(Alignment::Left);

        frame.render_widget(header, area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let notifications = state.get_current_notifications();
        if notifications.is_empty() {
            return;
        }

        // Position notifications in the top-right corner
        let notification_width = 50.min(area.width);
        let notification_height = notifications.len() as u16 * 3; // 3 lines per notification

        let notification_area = Rect {
            x: area.width.saturating_sub(notification_width + 2),
            y: 1,
            width: notification_width,
            height: notification_height.min(area.height.saturating_sub(2)),
        };

        for (i, notification) in notifications.iter().enumerate() {
            let y_offset = i as u16 * 3;
            if y_offset >= notification_area.height {
                break;
            }

            let single_notification_area = Rect {
                x: notification_area.x,
                y: notification_area.y + y_offset,
                width: notification_area.width,
                height: 3.min(notification_area.height - y_offset),
            };

            let (icon, color) = match notification.notification_type {
                NotificationType::Success => ("✓ ", SELECTION_GREEN),
                NotificationType::Error => ("✗ ", ERROR_RED),
                NotificationType::Warning => ("⚠ ", WARNING_ORANGE),
                NotificationType::Info => ("ℹ ", CORNFLOWER_BLUE),
            };

            let notification_line = Line::from(vec![
                Span::styled(icon, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(notification.message.as_str(), Style::default().fg(color)),
            ]);

            let notification_widget = Paragraph::new(notification_line)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(color))
                        .style(Style::default().bg(PANEL_BG)),
                )
                .wrap(ratatui::widgets::Wrap { trim: true });

            frame.render_widget(ratatui::widgets::Clear, single_notification_area);
            frame.render_widget(notification_widget, single_notification_area);
        }
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper function to create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
