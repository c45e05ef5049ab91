use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::tui::{components::Component, Event, Theme};

#[derive(Debug, Clone)]
pub struct InputBox {
    input: Input,
    is_focused: bool,
    placeholder: String,
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            input: Input::default(),
            is_focused: false,
            placeholder: "Type your message... (Enter: Send)".to_string(),
        }
    }

    pub fn focus(&mut self) {
        self.is_focused = true;
    }

    pub fn unfocus(&mut self) {
        self.is_focused = false;
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    pub fn get_content(&self) -> String {
        self.input.value().to_string()
    }

    pub fn set_content(&mut self, content: String) {
        self.input = Input::new(content);
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().trim().is_empty()
    }

    /// Takes the typed text for sending, leaving the box empty. Blank input
    /// is left in place and yields `None`.
    pub fn take_submission(&mut self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let content = self.get_content();
        self.clear();
        Some(content)
    }
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let border_style = if self.is_focused {
            theme.accent()
        } else {
            theme.border()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" You ");

        // Width available for text, excluding borders
        let available_width = area.width.saturating_sub(2) as usize;

        if self.input.value().is_empty() {
            let content = Line::from(Span::styled(&self.placeholder, theme.secondary()));
            let paragraph = Paragraph::new(content).block(block).style(theme.normal());
            frame.render_widget(paragraph, area);
            if self.is_focused {
                frame.set_cursor(area.x + 1, area.y + 1);
            }
            return;
        }

        let cursor_pos = self.input.visual_cursor();
        let scroll_offset = if cursor_pos >= available_width {
            cursor_pos.saturating_sub(available_width) + 1
        } else {
            0
        };

        // Slice by chars so multi-byte input never splits
        let chars: Vec<char> = self.input.value().chars().collect();
        let start = scroll_offset.min(chars.len());
        let end = (start + available_width).min(chars.len());
        let visible_text: String = chars[start..end].iter().collect();

        let paragraph = Paragraph::new(Line::from(visible_text))
            .block(block)
            .style(theme.normal());
        frame.render_widget(paragraph, area);

        if self.is_focused {
            let cursor_x = area.x + 1 + cursor_pos.saturating_sub(scroll_offset) as u16;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                frame.set_cursor(cursor_x, cursor_y);
            }
        }
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        if !self.is_focused {
            return false;
        }

        match event {
            Event::Key(key) => match key.code {
                // Enter and Tab belong to the parent
                KeyCode::Enter | KeyCode::Tab | KeyCode::BackTab => false,
                _ => {
                    // Let global hotkeys pass through
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        || key.modifiers.contains(KeyModifiers::ALT)
                    {
                        false
                    } else {
                        self.input
                            .handle_event(&crossterm::event::Event::Key(*key));
                        true
                    }
                }
            },
            _ => false,
        }
    }
}
