// ABOUTME: Bottom status bar with the latest status message, key hints and version

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const ERROR_RED: Color = Color::Rgb(230, 100, 100);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);

use crate::app::{
    AppState,
    state::{StatusKind, View},
};

const LIST_HINTS: &[(&str, &str)] = &[
    ("↵", " sync "),
    ("s", " sync all "),
    ("a", "dd "),
    ("d", " remove "),
    ("r", "efresh "),
    ("`", " log "),
    ("?", " help "),
    ("q", "uit"),
];

const ADD_HINTS: &[(&str, &str)] = &[("↵", " add "), ("Esc", " cancel")];

pub struct StatusBarComponent;

impl StatusBarComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let message_line = match &state.status_message {
            Some(message) => {
                let color = match message.kind {
                    StatusKind::Info => CORNFLOWER_BLUE,
                    StatusKind::Success => SELECTION_GREEN,
                    StatusKind::Error => ERROR_RED,
                };
                Line::from(Span::styled(message.text.clone(), Style::default().fg(color)))
            }
            None => Line::from(Span::styled("Ready", Style::default().fg(MUTED_GRAY))),
        };

        let hints = if state.current_view == View::AddRepo {
            ADD_HINTS
        } else {
            LIST_HINTS
        };
        let mut hint_spans = Vec::with_capacity(hints.len() * 2);
        for (key, label) in hints {
            hint_spans.push(Span::styled(*key, Style::default().fg(GOLD).add_modifier(Modifier::BOLD)));
            hint_spans.push(Span::styled(*label, Style::default().fg(MUTED_GRAY)));
        }

        let version = Line::from(Span::styled(
            format!(" lazycontext v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(SOFT_WHITE),
        ))
        .alignment(Alignment::Right);

        let bar = Paragraph::new(vec![message_line, Line::from(hint_spans)]).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(SUBDUED_BORDER))
                .style(Style::default().bg(PANEL_BG))
                .title_bottom(version),
        );

        frame.render_widget(bar, area);
    }
}

impl Default for StatusBarComponent {
    fn default() -> Self {
        Self::new()
    }
}
