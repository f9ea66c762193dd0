// ABOUTME: Help overlay component displaying keyboard shortcuts

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem},
};

use super::layout::centered_rect;

pub struct HelpComponent;

impl HelpComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 70, area);

        frame.render_widget(Clear, popup_area);

        let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let help_items = vec![
            ListItem::new("Navigation:").style(heading),
            ListItem::new("  j/↓        Move down"),
            ListItem::new("  k/↑        Move up"),
            ListItem::new("  g          Go to top"),
            ListItem::new("  G          Go to bottom"),
            ListItem::new(""),
            ListItem::new("Repositories:").style(heading),
            ListItem::new("  Enter      Sync selected (clone or pull)"),
            ListItem::new("  s          Sync all"),
            ListItem::new("  a          Add repository"),
            ListItem::new("  d          Remove selected (keeps files)"),
            ListItem::new("  r          Refresh all statuses"),
            ListItem::new(""),
            ListItem::new("General:").style(heading),
            ListItem::new("  `          Toggle command log"),
            ListItem::new("  ?          Toggle this help"),
            ListItem::new("  Esc        Close overlay / cancel"),
            ListItem::new("  q/Ctrl+C   Quit"),
        ];

        let help_list = List::new(help_items).block(
            Block::default()
                .title("Help - Press ? or Esc to close")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(help_list, popup_area);
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}
