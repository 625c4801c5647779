use crate::tui::app::App;
use crate::tui::draw::draw_app;
use crossterm::event::{self, Event};
use std::io;
use std::time::Duration;

pub mod app;
pub mod draw;

/// Puts the terminal back into cooked mode when dropped.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

pub fn run(mut app: App) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let _guard = TerminalGuard;

    while app.running {
        terminal.draw(|frame| draw_app(frame, &app))?;

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
