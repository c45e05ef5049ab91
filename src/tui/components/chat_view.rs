use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::chat::{Speaker, Transcript, TranscriptEntry};
use crate::tui::{components::Component, Event, Theme};

pub struct ChatView {
    entries: Vec<TranscriptEntry>,
    pending: Option<String>,
    assistant_label: String,
    show_timestamps: bool,
    is_focused: bool,
    auto_scroll: bool,
    scroll_offset: usize,
}

impl ChatView {
    pub fn new(assistant_label: impl Into<String>, show_timestamps: bool) -> Self {
        Self {
            entries: Vec::new(),
            pending: None,
            assistant_label: assistant_label.into(),
            show_timestamps,
            is_focused: false,
            auto_scroll: true,
            scroll_offset: 0,
        }
    }

    pub fn focus(&mut self) {
        self.is_focused = true;
    }

    pub fn unfocus(&mut self) {
        self.is_focused = false;
    }

    /// Copies entries the view has not seen yet. The transcript only grows, so
    /// everything before our length is already displayed.
    pub fn sync(&mut self, transcript: &Transcript) {
        let seen = self.entries.len().min(transcript.len());
        self.entries.extend_from_slice(&transcript.entries()[seen..]);
        if self.auto_scroll {
            self.scroll_to_bottom();
        }
    }

    /// Message shown while its reply is still on the way.
    pub fn set_pending(&mut self, message: Option<String>) {
        self.pending = message;
        if self.auto_scroll {
            self.scroll_to_bottom();
        }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn scroll_up(&mut self) {
        if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
            self.auto_scroll = false;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
        // clamped (and auto-scroll restored) in render
        self.auto_scroll = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = usize::MAX; // Will be clamped in render
        self.auto_scroll = true;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
        self.auto_scroll = false;
    }

    fn speaker_header(&self, speaker: Speaker, theme: &Theme) -> (String, Style) {
        match speaker {
            Speaker::User => (format!("{}:", speaker.label()), theme.accent()),
            Speaker::Assistant => (format!("{}:", self.assistant_label), theme.highlight()),
        }
    }

    fn push_message_lines<'a>(
        &self,
        lines: &mut Vec<Line<'a>>,
        speaker: Speaker,
        message: &str,
        timestamp: Option<String>,
        width: usize,
        theme: &Theme,
    ) {
        let (label, label_style) = self.speaker_header(speaker, theme);
        let mut header = vec![Span::styled(label, label_style)];
        if let Some(timestamp) = timestamp {
            header.push(Span::raw(" "));
            header.push(Span::styled(timestamp, theme.secondary()));
        }
        lines.push(Line::from(header));

        let content_style = match speaker {
            Speaker::User => theme.normal(),
            Speaker::Assistant => theme.assistant_message(),
        };
        for line in wrap_text(message, width.saturating_sub(2)) {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(line, content_style),
            ]));
        }

        lines.push(Line::from(""));
    }
}

pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width < 10 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for line in text.lines() {
        if line.chars().count() <= width {
            lines.push(line.to_string());
            continue;
        }

        let mut current_line = String::new();
        for word in line.split_whitespace() {
            let current_len = current_line.chars().count();
            if current_len + word.chars().count() < width {
                if !current_line.is_empty() {
                    current_line.push(' ');
                }
                current_line.push_str(word);
            } else {
                if !current_line.is_empty() {
                    lines.push(current_line);
                }
                current_line = word.to_string();
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

impl Component for ChatView {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let border_style = if self.is_focused {
            theme.accent()
        } else {
            theme.border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Conversation ");

        if self.entries.is_empty() && self.pending.is_none() {
            let empty_message = Paragraph::new("No messages yet. Ask the assistant anything!")
                .block(block)
                .alignment(Alignment::Center)
                .style(theme.secondary());

            frame.render_widget(empty_message, area);
            return;
        }

        let content_width = area.width.saturating_sub(4) as usize;
        let content_height = area.height.saturating_sub(2) as usize;

        let mut all_lines: Vec<Line> = Vec::new();
        for entry in &self.entries {
            let timestamp = self
                .show_timestamps
                .then(|| entry.timestamp().format("%H:%M").to_string());
            self.push_message_lines(
                &mut all_lines,
                entry.speaker(),
                entry.message(),
                timestamp,
                content_width,
                theme,
            );
        }
        if let Some(pending) = &self.pending {
            self.push_message_lines(
                &mut all_lines,
                Speaker::User,
                pending,
                None,
                content_width,
                theme,
            );
            all_lines.push(Line::from(Span::styled(
                "Assistant is typing...",
                theme.secondary(),
            )));
        }

        let total_lines = all_lines.len();
        let max_scroll = total_lines.saturating_sub(content_height);

        if self.auto_scroll || self.scroll_offset >= max_scroll {
            self.scroll_offset = max_scroll;
            self.auto_scroll = true;
        }

        let visible_lines: Vec<Line> = if total_lines <= content_height {
            all_lines
        } else {
            let start = self.scroll_offset;
            let end = (start + content_height).min(total_lines);
            all_lines[start..end].to_vec()
        };

        let paragraph = Paragraph::new(visible_lines).block(block);
        frame.render_widget(paragraph, area);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.is_focused {
            return false;
        }

        match event {
            Event::Key(KeyEvent { code, .. }) => match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.scroll_up();
                    true
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.scroll_down();
                    true
                }
                KeyCode::Home | KeyCode::Char('g') => {
                    self.scroll_to_top();
                    true
                }
                KeyCode::End | KeyCode::Char('G') => {
                    self.scroll_to_bottom();
                    true
                }
                KeyCode::PageUp => {
                    for _ in 0..10 {
                        self.scroll_up();
                    }
                    true
                }
                KeyCode::PageDown => {
                    for _ in 0..10 {
                        self.scroll_down();
                    }
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatSession;
    use crate::chat::session::test_support::StubProvider;
    use std::sync::Arc;

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four five six seven", 12);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
        assert_eq!(lines.join(" "), "one two three four five six seven");

        assert_eq!(wrap_text("", 20), vec![String::new()]);
        assert_eq!(wrap_text("narrow", 3), vec!["narrow".to_string()]);
    }

    #[tokio::test]
    async fn test_sync_appends_only_new_entries() {
        let mut session = ChatSession::new(Arc::new(StubProvider::replying("Hi there!")));
        let mut view = ChatView::new("Assistant", false);

        session.submit("Hello").await.unwrap();
        view.sync(session.transcript());
        view.sync(session.transcript());
        assert_eq!(view.entries().len(), 2);

        session.submit("Rates?").await.unwrap();
        view.sync(session.transcript());
        let pairs: Vec<_> = view.entries().iter().map(|e| e.as_pair()).collect();
        assert_eq!(
            pairs,
            vec![
                (Speaker::User, "Hello"),
                (Speaker::Assistant, "Hi there!"),
                (Speaker::User, "Rates?"),
                (Speaker::Assistant, "Hi there!"),
            ]
        );
    }
}
