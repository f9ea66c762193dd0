// ABOUTME: Repository list component showing each tracked repo with a colored status badge

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
};

// Premium color palette (TUI Style Guide)
const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
const GOLD: Color = Color::Rgb(255, 215, 0);
const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
const WARNING_YELLOW: Color = Color::Rgb(230, 200, 80);
const ERROR_RED: Color = Color::Rgb(230, 100, 100);
const DARK_BG: Color = Color::Rgb(25, 25, 35);
const LIST_HIGHLIGHT_BG: Color = Color::Rgb(40, 40, 60);
const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);

use crate::app::{AppState, state::RepoRow};
use crate::models::{DisplayStatus, SyncState};

/// Badge color for a row status
pub fn status_color(status: &DisplayStatus) -> Color {
    match status {
        DisplayStatus::Loading | DisplayStatus::Syncing(_) => CORNFLOWER_BLUE,
        DisplayStatus::Ready(SyncState::UpToDate) => SELECTION_GREEN,
        DisplayStatus::Ready(SyncState::Behind { .. } | SyncState::Modified) => WARNING_YELLOW,
        DisplayStatus::Ready(SyncState::Missing) | DisplayStatus::Failed { .. } => ERROR_RED,
    }
}

pub struct RepoListComponent {
    list_state: ListState,
}

impl Default for RepoListComponent {
    fn default() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }
}

impl RepoListComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if state.rows.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(state.selected_index));
        }

        let items: Vec<ListItem> = if state.rows.is_empty() {
            vec![ListItem::new(Line::from(vec![
                Span::styled("No repositories tracked. Press ", Style::default().fg(MUTED_GRAY)),
                Span::styled("a", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                Span::styled(" to add one.", Style::default().fg(MUTED_GRAY)),
            ]))]
        } else {
            state.rows.iter().map(Self::build_item).collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(SUBDUED_BORDER))
                    .style(Style::default().bg(DARK_BG))
                    .title(Line::from(vec![
                        Span::styled(" Repositories ", Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
                        Span::styled(
                            format!("({}) ", state.rows.len()),
                            Style::default().fg(CORNFLOWER_BLUE),
                        ),
                    ])),
            )
            .highlight_style(Style::default().bg(LIST_HIGHLIGHT_BG).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn build_item(row: &RepoRow) -> ListItem<'static> {
        let color = status_color(&row.status);
        let mut spans = Vec::with_capacity(5);

        if let Some(owner) = &row.owner {
            spans.push(Span::styled(owner.clone(), Style::default().fg(MUTED_GRAY)));
            spans.push(Span::styled(" / ", Style::default().fg(MUTED_GRAY)));
        }
        spans.push(Span::styled(
            row.name.clone(),
            Style::default().fg(SOFT_WHITE).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} {}", row.status.icon(), row.status.badge_text()),
            Style::default().fg(color),
        ));

        ListItem::new(Line::from(spans))
    }
}
