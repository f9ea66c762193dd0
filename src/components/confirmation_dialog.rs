// ABOUTME: Confirmation dialog component for yes/no prompts with keyboard navigation

use crate::app::state::ConfirmationDialog;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct ConfirmationDialogComponent;

impl ConfirmationDialogComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, dialog: &ConfirmationDialog) {
        let dialog_width = 60.min(area.width.saturating_sub(4));
        let dialog_height = 8.min(area.height);

        let dialog_area = Rect {
            x: area.x + (area.width - dialog_width) / 2,
            y: area.y + (area.height - dialog_height) / 2,
            width: dialog_width,
            height: dialog_height,
        };

        // Clear only the dialog area
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(dialog.title.clone())
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Black));
        let inner_area = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Message
                Constraint::Length(2), // Buttons
            ])
            .split(inner_area);

        let message = Paragraph::new(dialog.message.clone())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White));
        frame.render_widget(message, chunks[0]);

        let button_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let selected = Style::default().fg(Color::Black).bg(Color::White);
        let unselected = Style::default().fg(Color::White);

        let (yes_style, no_style) = if dialog.selected_option {
            (selected, unselected)
        } else {
            (unselected, selected)
        };

        let yes_button = Paragraph::new("[Y]es").style(yes_style).alignment(Alignment::Center);
        frame.render_widget(yes_button, button_chunks[0]);

        let no_button = Paragraph::new("[N]o").style(no_style).alignment(Alignment::Center);
        frame.render_widget(no_button, button_chunks[1]);
    }
}

impl Default for ConfirmationDialogComponent {
    fn default() -> Self {
        Self::new()
    }
}
