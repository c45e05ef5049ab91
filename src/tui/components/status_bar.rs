use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::{components::Component, Event, Theme};

pub struct StatusBar {
    status_message: String,
    model_info: String,
    connection_status: ConnectionStatus,
    key_hints: Vec<KeyHint>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Idle,
    Error(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyHint {
    pub key: String,
    pub action: String,
}

impl KeyHint {
    pub fn new(key: &str, action: &str) -> Self {
        Self {
            key: key.to_string(),
            action: action.to_string(),
        }
    }
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            status_message: "Ready".to_string(),
            model_info: "No model selected".to_string(),
            connection_status: ConnectionStatus::Idle,
            key_hints: Vec::new(),
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn status(&self) -> &str {
        &self.status_message
    }

    pub fn set_model_info(&mut self, provider: &str, model: &str) {
        self.model_info = format!("{}: {}", provider, model);
    }

    pub fn set_connection_status(&mut self, status: ConnectionStatus) {
        self.connection_status = status;
    }

    pub fn connection_status(&self) -> &ConnectionStatus {
        &self.connection_status
    }

    pub fn set_key_hints(&mut self, hints: Vec<KeyHint>) {
        self.key_hints = hints;
    }

    fn get_connection_indicator(&self, theme: &Theme) -> (&'static str, Style) {
        match &self.connection_status {
            ConnectionStatus::Connected => ("●", theme.success()),
            ConnectionStatus::Connecting => ("◐", theme.warning()),
            ConnectionStatus::Idle => ("○", theme.secondary()),
            ConnectionStatus::Error(_) => ("●", theme.error()),
        }
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (conn_symbol, conn_style) = self.get_connection_indicator(theme);
        let conn_text = match &self.connection_status {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Connecting => "Waiting for reply...",
            ConnectionStatus::Idle => "Idle",
            ConnectionStatus::Error(err) => err.as_str(),
        };

        let mut spans = vec![
            Span::styled(conn_symbol, conn_style),
            Span::raw(" "),
            Span::styled(self.status_message.as_str(), theme.normal()),
            Span::raw(" | "),
            Span::styled(self.model_info.as_str(), theme.accent()),
            Span::raw(" | "),
            Span::styled(conn_text, theme.secondary()),
        ];

        for hint in &self.key_hints {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(hint.key.as_str(), theme.highlight()));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(hint.action.as_str(), theme.secondary()));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::NONE))
            .alignment(Alignment::Left);

        frame.render_widget(paragraph, area);
    }

    fn handle_event(&mut self, _event: &Event) -> bool {
        false // Status bar doesn't handle events
    }
}
