// ABOUTME: Debug console listing the command log, newest entry first

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
};

const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const ERROR_RED: Color = Color::Rgb(230, 100, 100);
const PANEL_BG: Color = Color::Rgb(30, 30, 40);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);

use crate::models::{CommandLog, LogEntry, LogKind};

pub struct CommandLogComponent;

impl CommandLogComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, log: &CommandLog) {
        let visible = area.height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = log.entries().take(visible).map(Self::build_item).collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(SUBDUED_BORDER))
                .style(Style::default().bg(PANEL_BG))
                .title(Line::from(vec![
                    Span::styled(" Command Log ", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("({}/{}) ", log.len(), log.capacity()),
                        Style::default().fg(MUTED_GRAY),
                    ),
                ])),
        );

        frame.render_widget(list, area);
    }

    fn build_item(entry: &LogEntry) -> ListItem<'static> {
        let label_color = match entry.kind {
            LogKind::Info => CORNFLOWER_BLUE,
            LogKind::Success => SELECTION_GREEN,
            LogKind::Error => ERROR_RED,
            LogKind::Command => GOLD,
        };

        let mut spans = vec![
            Span::styled(
                entry.timestamp.format("%H:%M:%S ").to_string(),
                Style::default().fg(MUTED_GRAY),
            ),
            Span::styled(
                format!("{:<3} ", entry.kind.label()),
                Style::default().fg(label_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(entry.message.clone(), Style::default().fg(SOFT_WHITE)),
        ];
        if let Some(details) = &entry.details {
            // Only the first line fits
            let first = details.lines().next().unwrap_or_default();
            spans.push(Span::styled(format!("  {}", first), Style::default().fg(MUTED_GRAY)));
        }

        ListItem::new(Line::from(spans))
    }
}

impl Default for CommandLogComponent {
    fn default() -> Self {
        Self::new()
    }
}
