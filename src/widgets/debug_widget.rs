use crate::logging::LogBuffer;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// How many log lines the view pulls from the ring buffer
const DEBUG_LINES: usize = 500;

/// Log view overlay, fed from the in-memory tracing buffer
#[derive(Debug, Default)]
pub struct DebugWidget {
    lines: Vec<String>,
    scroll_offset: usize,
}

impl DebugWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the recent log entries and jump to the newest
    pub fn refresh(&mut self, buffer: &LogBuffer) {
        self.lines = buffer
            .recent(DEBUG_LINES)
            .iter()
            .map(|record| record.display_line())
            .collect();
        self.scroll_to_bottom();
    }

    /// Set custom content
    pub fn set_content(&mut self, content: &str) {
        self.lines = content.lines().map(str::to_string).collect();
        self.scroll_offset = 0;
    }

    /// Returns true when the view should close
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(10),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.scroll_offset = 0,
            KeyCode::End | KeyCode::Char('G') => self.scroll_to_bottom(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(12) => return true,
            _ => {}
        }
        false
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize;
        let start = self.scroll_offset.min(self.lines.len());
        let end = (start + visible_height).min(self.lines.len());

        let text = Text::from(
            self.lines[start..end]
                .iter()
                .map(|line| Line::from(line.clone()))
                .collect::<Vec<_>>(),
        );

        let title = format!(
            "Log - Lines {}-{} of {} (↑↓/jk: scroll, Home/g: top, End/G: bottom, Esc/F12: close)",
            if end == 0 { 0 } else { start + 1 },
            end,
            self.lines.len()
        );

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }

    fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(self.max_scroll());
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    // Leave a screenful visible at the bottom
    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(10)
    }
}
