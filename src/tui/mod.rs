pub mod app;
pub mod components;
pub mod events;
pub mod theme;

pub use app::App;
pub use events::{Event, EventHandler};
pub use theme::Theme;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::app::UIConfig;
use crate::chat::ChatSession;
use crate::error::Result;

/// Runs the interactive chat until the user quits, restoring the terminal on
/// the way out.
pub async fn run(session: ChatSession, ui: &UIConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Restore the terminal before the panic message is printed
    let restore_panic_hook = install_panic_cleanup(|| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    });

    let mut events = EventHandler::new(Duration::from_millis(ui.tick_rate_ms));
    let mut app = App::new(session, ui, events.sender());
    info!("Chat UI started");

    let result = run_loop(&mut terminal, &mut app, &mut events).await;
    restore_panic_hook();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(
        turns = app.session().transcript().turn_count(),
        "Chat UI closed"
    );
    result
}

/// Chains `cleanup` in front of the current panic hook. Calling the returned
/// closure puts the previous hook back.
fn install_panic_cleanup(cleanup: impl Fn() + Send + Sync + 'static) -> impl FnOnce() {
    let previous = Arc::new(std::panic::take_hook());
    let chained = Arc::clone(&previous);
    std::panic::set_hook(Box::new(move |info| {
        cleanup();
        (**chained)(info);
    }));

    move || {
        // dropping our hook releases its handle on `previous`
        drop(std::panic::take_hook());
        match Arc::try_unwrap(previous) {
            Ok(hook) => std::panic::set_hook(hook),
            Err(shared) => std::panic::set_hook(Box::new(move |info| (**shared)(info))),
        }
    }
}

/// Draws, then handles one event. A submission is processed as its own event,
/// so the "typing" frame is on screen while the reply is awaited and no second
/// submission can start before it finishes.
async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame))?;

        if let Some(event) = events.next().await {
            app.handle_event(event).await;
        }
    }
    Ok(())
}
