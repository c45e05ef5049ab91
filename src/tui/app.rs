use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::app::UIConfig;
use crate::chat::{ChatSession, TurnOutcome};
use crate::error::Error;
use crate::tui::{
    components::{
        status_bar::KeyHint, ChatView, Component, ConnectionStatus, HelpPopup, InputBox,
        StatusBar,
    },
    Event, Theme,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FocusedPanel {
    ChatView,
    InputBox,
}

pub struct App {
    // Components
    chat_view: ChatView,
    input_box: InputBox,
    status_bar: StatusBar,
    help_popup: HelpPopup,

    // State
    title: String,
    focused_panel: FocusedPanel,
    theme: Theme,
    should_quit: bool,
    awaiting_reply: bool,

    session: ChatSession,
    event_sender: mpsc::UnboundedSender<Event>,
}

impl App {
    pub fn new(
        session: ChatSession,
        ui: &UIConfig,
        event_sender: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let mut status_bar = StatusBar::new();
        status_bar.set_model_info(session.provider_name(), session.model_id());

        let mut app = Self {
            chat_view: ChatView::new(ui.assistant_label.clone(), ui.show_timestamps),
            input_box: InputBox::new(),
            status_bar,
            help_popup: HelpPopup::new(),
            title: ui.title.clone(),
            focused_panel: FocusedPanel::InputBox,
            theme: Theme::from_name(&ui.theme),
            should_quit: false,
            awaiting_reply: false,
            session,
            event_sender,
        };

        app.chat_view.sync(app.session.transcript());
        app.update_focus();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub async fn handle_event(&mut self, event: Event) {
        // Help popup takes priority
        if self.help_popup.is_visible() && self.help_popup.handle_event(&event) {
            return;
        }

        match event {
            Event::Key(key) => {
                if self.handle_global_keys(key) {
                    return;
                }
                self.handle_panel_specific_keys(key);
            }
            Event::SendMessage(content) => {
                self.send_message(content).await;
            }
            Event::Tick | Event::Resize(_, _) => {}
        }
    }

    fn handle_global_keys(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
                true
            }
            (KeyCode::F(1), _) => {
                self.help_popup.toggle();
                true
            }
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                self.next_panel();
                true
            }
            (KeyCode::Esc, _) => {
                self.set_focused_panel(FocusedPanel::InputBox);
                true
            }
            _ => false,
        }
    }

    fn handle_panel_specific_keys(&mut self, key: KeyEvent) {
        let handled = match self.focused_panel {
            FocusedPanel::ChatView => self.chat_view.handle_event(&Event::Key(key)),
            FocusedPanel::InputBox => self.input_box.handle_event(&Event::Key(key)),
        };

        if handled || self.focused_panel != FocusedPanel::InputBox || key.code != KeyCode::Enter {
            return;
        }

        // One reply at a time; the typed text stays in the box until then.
        if self.awaiting_reply {
            self.status_bar
                .set_status("Still waiting for the previous reply...");
            return;
        }

        if let Some(content) = self.input_box.take_submission() {
            self.awaiting_reply = true;
            self.chat_view.set_pending(Some(content.clone()));
            self.status_bar.set_status("Assistant is typing...");
            self.status_bar
                .set_connection_status(ConnectionStatus::Connecting);
            if self.event_sender.send(Event::SendMessage(content)).is_err() {
                warn!("Event channel closed, dropping message");
                self.finish_turn();
            }
        }
    }

    async fn send_message(&mut self, content: String) {
        debug!("Sending message ({} chars)", content.chars().count());

        match self.session.submit(&content).await {
            Ok(TurnOutcome::Replied) => {
                self.status_bar
                    .set_connection_status(ConnectionStatus::Connected);
                self.status_bar.set_status("Ready");
            }
            Ok(TurnOutcome::Fallback { reason }) => {
                self.status_bar
                    .set_connection_status(ConnectionStatus::Error("Request failed".to_string()));
                self.status_bar
                    .set_status(format!("Last request failed: {}", reason));
            }
            Err(Error::Validation(msg)) => {
                self.status_bar.set_status(format!("Not sent: {}", msg));
            }
            Err(e) => {
                self.status_bar.set_status(format!("Error: {}", e));
            }
        }

        self.finish_turn();
    }

    fn finish_turn(&mut self) {
        self.awaiting_reply = false;
        self.chat_view.set_pending(None);
        self.chat_view.sync(self.session.transcript());
    }

    fn next_panel(&mut self) {
        let next = match self.focused_panel {
            FocusedPanel::ChatView => FocusedPanel::InputBox,
            FocusedPanel::InputBox => FocusedPanel::ChatView,
        };
        self.set_focused_panel(next);
    }

    fn set_focused_panel(&mut self, panel: FocusedPanel) {
        self.focused_panel = panel;
        self.update_focus();
    }

    fn update_focus(&mut self) {
        self.chat_view.unfocus();
        self.input_box.unfocus();

        let key_hints = match self.focused_panel {
            FocusedPanel::ChatView => {
                self.chat_view.focus();
                vec![
                    KeyHint::new("↑/↓", "Scroll"),
                    KeyHint::new("Tab", "Input"),
                    KeyHint::new("F1", "Help"),
                ]
            }
            FocusedPanel::InputBox => {
                self.input_box.focus();
                vec![
                    KeyHint::new("Enter", "Send"),
                    KeyHint::new("Tab", "Scroll"),
                    KeyHint::new("F1", "Help"),
                    KeyHint::new("Ctrl+Q", "Quit"),
                ]
            }
        };
        self.status_bar.set_key_hints(key_hints);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(Line::from(Span::styled(
            self.title.as_str(),
            self.theme.highlight(),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(self.theme.border()),
        );
        frame.render_widget(header, area);
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(1),    // Chat view
                Constraint::Length(3), // Input box
                Constraint::Length(1), // Status bar
            ])
            .split(frame.size());

        self.render_header(frame, chunks[0]);
        self.chat_view.render(frame, chunks[1], &self.theme);
        self.input_box.render(frame, chunks[2], &self.theme);
        self.status_bar.render(frame, chunks[3], &self.theme);

        // Help popup last (on top)
        self.help_popup.render(frame, frame.size(), &self.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppConfig;
    use crate::chat::session::test_support::StubProvider;
    use crate::chat::{Speaker, FALLBACK_MESSAGE};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn test_app(provider: StubProvider) -> (App, mpsc::UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let session = ChatSession::new(Arc::new(provider));
        let app = App::new(session, &AppConfig::default().ui, sender);
        (app, receiver)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_enter_queues_submission() {
        let (mut app, mut receiver) = test_app(StubProvider::replying("Hi there!"));
        app.input_box.set_content("Hello".to_string());

        app.handle_event(key(KeyCode::Enter)).await;

        assert!(app.is_awaiting_reply());
        assert_eq!(app.status_bar.status(), "Assistant is typing...");
        assert_eq!(
            receiver.try_recv().unwrap(),
            Event::SendMessage("Hello".to_string())
        );
        assert!(app.input_box.is_empty());
        // nothing recorded until the submission is processed
        assert!(app.session().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_blank_input_sends_nothing() {
        let (mut app, mut receiver) = test_app(StubProvider::replying("Hi there!"));
        app.input_box.set_content("   ".to_string());

        app.handle_event(key(KeyCode::Enter)).await;

        assert!(!app.is_awaiting_reply());
        assert!(receiver.try_recv().is_err());
        assert!(app.session().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_second_enter_waits_for_reply() {
        let (mut app, mut receiver) = test_app(StubProvider::replying("Hi there!"));
        app.input_box.set_content("first".to_string());
        app.handle_event(key(KeyCode::Enter)).await;

        app.input_box.set_content("second".to_string());
        app.handle_event(key(KeyCode::Enter)).await;

        assert_eq!(receiver.try_recv().unwrap(), Event::SendMessage("first".to_string()));
        assert!(receiver.try_recv().is_err());
        assert_eq!(app.input_box.get_content(), "second");
    }

    #[tokio::test]
    async fn test_send_message_updates_view() {
        let (mut app, mut receiver) = test_app(StubProvider::replying("Hi there!"));
        app.input_box.set_content("Hello".to_string());
        app.handle_event(key(KeyCode::Enter)).await;

        let event = receiver.try_recv().unwrap();
        app.handle_event(event).await;

        assert!(!app.is_awaiting_reply());
        assert_eq!(
            app.status_bar.connection_status(),
            &ConnectionStatus::Connected
        );
        let pairs: Vec<_> = app.chat_view.entries().iter().map(|e| e.as_pair()).collect();
        assert_eq!(
            pairs,
            vec![(Speaker::User, "Hello"), (Speaker::Assistant, "Hi there!")]
        );
    }

    #[tokio::test]
    async fn test_failed_reply_shows_fallback() {
        let (mut app, _receiver) = test_app(StubProvider::failing());

        app.handle_event(Event::SendMessage("Hello".to_string())).await;

        let last = app.session().transcript().last().unwrap();
        assert_eq!(last.message(), FALLBACK_MESSAGE);
        assert!(app.status_bar.status().starts_with("Last request failed"));
        assert!(matches!(
            app.status_bar.connection_status(),
            ConnectionStatus::Error(_)
        ));
    }

    #[tokio::test]
    async fn test_render_shows_transcript_in_order() {
        let (mut app, _receiver) = test_app(StubProvider::replying("Hi there!"));
        app.handle_event(Event::SendMessage("Hello".to_string())).await;

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Bank Sales Assistant"));
        let user = text.find("Hello").unwrap();
        let assistant = text.find("Hi there!").unwrap();
        assert!(user < assistant);
    }

    #[tokio::test]
    async fn test_quit_and_help_keys() {
        let (mut app, _receiver) = test_app(StubProvider::replying("unused"));

        app.handle_event(key(KeyCode::F(1))).await;
        assert!(app.help_popup.is_visible());
        app.handle_event(key(KeyCode::Esc)).await;
        assert!(!app.help_popup.is_visible());

        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CONTROL,
        )))
        .await;
        assert!(app.should_quit());
    }
}
