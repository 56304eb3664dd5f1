//! Terminal session: raw mode plus the alternate screen for as long as the
//! explorer runs.
//!
//! Teardown happens once, through [`Tui::restore`], on drop, or from the
//! panic hook, whichever comes first.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::{AppError, Result};

type Backend = CrosstermBackend<Stdout>;

pub struct Tui {
    terminal: Terminal<Backend>,
    active: bool,
}

impl Tui {
    /// Switch the terminal into full-screen mode.
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()
            .map_err(|e| AppError::Terminal(format!("cannot enable raw mode: {e}")))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        tracing::debug!("terminal session started");
        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Give the terminal back to the shell. Calling it twice is harmless.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        leave(self.terminal.backend_mut())?;
        tracing::debug!("terminal session ended");
        Ok(())
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<Backend> {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "terminal restore failed");
        }
    }
}

/// Undo everything [`Tui::new`] set up.
fn leave(out: &mut impl Write) -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen, cursor::Show)
}

/// Restore the terminal before the default hook prints the panic.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = leave(&mut io::stdout());
        default_hook(info);
    }));
}
