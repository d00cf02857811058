//! Input and output collaborators of a [`Terminal`](super::Terminal).

use std::{
    io::{self, IsTerminal, Write},
    time::Duration,
};

use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal,
};
use log::trace;

use crate::keys::KeyEvent;

/// A source of decoded key events.
pub trait Input {
    /// Switches to raw mode, remembering the mode that was active before.
    fn enable_raw_mode(&mut self) -> io::Result<()>;

    /// Restores the mode active before [`Input::enable_raw_mode`].
    fn restore_mode(&mut self) -> io::Result<()>;

    /// Waits up to `timeout` (forever when `None`) for the next key.
    ///
    /// Returns `Ok(None)` on timeout or for events that are not keys.
    fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>>;
}

/// A sink for rendered text that knows the terminal width.
pub trait Output: Write {
    /// Current column width, or 0 when it cannot be determined.
    fn columns(&self) -> usize;
}

impl Output for io::Stdout {
    fn columns(&self) -> usize {
        terminal::size().map_or(0, |(columns, _)| usize::from(columns))
    }
}

/// Reads keys from the process terminal through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermInput {
    /// Raw mode state before we touched it; `None` when untouched
    prior_raw: Option<bool>,
}

impl CrosstermInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Input for CrosstermInput {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if !io::stdin().is_terminal() {
            return Ok(());
        }
        if self.prior_raw.is_none() {
            self.prior_raw = Some(terminal::is_raw_mode_enabled()?);
        }
        terminal::enable_raw_mode()
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        match self.prior_raw.take() {
            Some(false) => terminal::disable_raw_mode(),
            _ => Ok(()),
        }
    }

    fn read_key(&mut self, timeout: Option<Duration>) -> io::Result<Option<KeyEvent>> {
        if let Some(timeout) = timeout
            && !event::poll(timeout)?
        {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key.into())),
            other => {
                trace!("ignoring terminal event {other:?}");
                Ok(None)
            }
        }
    }
}
