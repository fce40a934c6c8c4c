use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Actions that can be returned from the help widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpAction {
    None,
    Exit,
}

/// (section, [(keys, description)])
const HELP_SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Focus",
        &[
            ("Click", "Focus the clicked cell"),
            ("Tab", "Focus the first cell when nothing is focused"),
            ("Arrows", "Move focus one cell (stops at the edges)"),
            ("h j k l", "Move focus (vim_mode = true)"),
        ],
    ),
    (
        "Editing",
        &[
            ("Enter", "Edit the focused cell"),
            ("Enter (popup)", "Write the new value"),
            ("Esc (popup)", "Close the popup, keep the old value"),
        ],
    ),
    (
        "Columns",
        &[
            ("1-9", "Show or hide the n-th column"),
            ("Click [x]", "Show or hide that column"),
            ("< >", "Narrow or widen the focused column"),
            ("Drag │", "Resize the column left of the grip"),
        ],
    ),
    (
        "Other",
        &[
            ("F1 / ?", "Toggle this help"),
            ("F12", "Toggle the log view"),
            ("q / Ctrl+C", "Quit"),
        ],
    ),
];

/// Keyboard reference overlay
#[derive(Debug, Default)]
pub struct HelpWidget {
    scroll_offset: u16,
}

impl HelpWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> HelpAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(1) | KeyCode::Char('?') => {
                HelpAction::Exit
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = self.scroll_offset.saturating_add(1).min(self.max_scroll());
                HelpAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                HelpAction::None
            }
            KeyCode::Home => {
                self.scroll_offset = 0;
                HelpAction::None
            }
            _ => HelpAction::None,
        }
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    fn max_scroll(&self) -> u16 {
        let line_count: usize = HELP_SECTIONS.iter().map(|(_, keys)| keys.len() + 2).sum();
        u16::try_from(line_count).unwrap_or(u16::MAX)
    }

    fn build_text() -> Text<'static> {
        let mut lines = Vec::new();
        for (section, keys) in HELP_SECTIONS {
            lines.push(Line::from(Span::styled(
                *section,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, description) in keys.iter() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<14}", key), Style::default().fg(Color::Cyan)),
                    Span::raw(*description),
                ]));
            }
            lines.push(Line::from(""));
        }
        Text::from(lines)
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let help = Paragraph::new(Self::build_text())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Esc/F1 to close, ↑↓ to scroll")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset, 0))
            .wrap(Wrap { trim: false });

        f.render_widget(Clear, area);
        f.render_widget(help, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_exit_keys() {
        let mut widget = HelpWidget::new();
        for code in [KeyCode::Esc, KeyCode::F(1), KeyCode::Char('?')] {
            assert_eq!(
                widget.handle_key(KeyEvent::new(code, KeyModifiers::NONE)),
                HelpAction::Exit
            );
        }
    }

    #[test]
    fn test_scroll_stays_in_range() {
        let mut widget = HelpWidget::new();
        widget.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        assert_eq!(widget.scroll_offset(), 0);

        for _ in 0..200 {
            widget.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        }
        assert_eq!(widget.scroll_offset(), widget.max_scroll());
    }
}
