//! The terminal front end: keypad input, the screen and the log pane.
use std::io;

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

pub mod display;
pub mod input;
pub mod logger;

pub use display::TermDisplay;
pub use input::{Command, TermKeyboard};

/// Switches the terminal into raw mode on the alternate screen and
/// restores it when dropped.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen) {
            log::warn!("could not leave the alternate screen: {}", err);
        }
        if let Err(err) = terminal::disable_raw_mode() {
            log::warn!("could not disable the raw mode: {}", err);
        }
    }
}
