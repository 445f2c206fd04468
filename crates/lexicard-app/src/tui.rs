use std::io::{self, Stdout};

use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type Backend = CrosstermBackend<Stdout>;

/// Full-screen raw-mode terminal, restored on drop and on panic.
pub struct Tui {
    pub terminal: Terminal<Backend>,
}

fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
}

impl Tui {
    pub fn enter() -> anyhow::Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("enter alternate screen")?;

        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore();
            hook(info);
        }));

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("create terminal")?;
        tracing::debug!("Terminal initialized");
        Ok(Self { terminal })
    }

    /// Current terminal size as `(width, height)`.
    pub fn size(&self) -> (u16, u16) {
        match self.terminal.size() {
            Ok(size) => (size.width, size.height),
            Err(e) => {
                tracing::warn!("Terminal size unavailable: {e}");
                (80, 24)
            }
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        restore();
        let _ = self.terminal.show_cursor();
        tracing::debug!("Terminal restored");
    }
}
