// ABOUTME: Add repository popup with a single URL input field

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const ERROR_RED: Color = Color::Rgb(230, 100, 100);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);

use super::layout::centered_rect;
use crate::app::{AppState, state::StatusKind};

pub struct AddRepoComponent;

impl AddRepoComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let dialog_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, dialog_area);

        let outer_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(CORNFLOWER_BLUE))
            .style(Style::default().bg(PANEL_BG))
            .title(Span::styled(
                " Add Repository ",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ));
        let inner_area = outer_block.inner(dialog_area);
        frame.render_widget(outer_block, dialog_area);

        let inner_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Input field
                Constraint::Length(1), // Validation error
                Constraint::Min(1),    // Instructions
            ])
            .split(inner_area);

        let input_line = Line::from(vec![
            Span::styled(state.url_input.as_str(), Style::default().fg(SOFT_WHITE)),
            Span::styled("█", Style::default().fg(SELECTION_GREEN)),
        ]);
        let input = Paragraph::new(input_line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(SELECTION_GREEN))
                .style(Style::default().bg(DARK_BG))
                .title(Span::styled(" GitHub URL ", Style::default().fg(GOLD))),
        );
        frame.render_widget(input, inner_layout[0]);

        if let Some(message) = state
            .status_message
            .as_ref()
            .filter(|m| m.kind == StatusKind::Error)
        {
            let error = Paragraph::new(Span::styled(message.text.as_str(), Style::default().fg(ERROR_RED)));
            frame.render_widget(error, inner_layout[1]);
        }

        let help = Paragraph::new(vec![
            Line::from(Span::styled(
                "https://github.com/owner/repo or git@github.com:owner/repo.git",
                Style::default().fg(MUTED_GRAY),
            )),
            Line::from(vec![
                Span::styled("Enter", Style::default().fg(SELECTION_GREEN).add_modifier(Modifier::BOLD)),
                Span::styled(" add & clone  ", Style::default().fg(MUTED_GRAY)),
                Span::styled("Esc", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                Span::styled(" cancel", Style::default().fg(MUTED_GRAY)),
            ]),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(help, inner_layout[2]);
    }
}

impl Default for AddRepoComponent {
    fn default() -> Self {
        Self::new()
    }
}
