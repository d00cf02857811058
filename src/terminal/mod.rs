//! The controller that drives one interactive prompt session.

mod future;
mod io;
mod throttle;

#[cfg(test)]
mod terminal_tests;

pub use future::{Outcome, ResultFuture};
pub use io::{CrosstermInput, Input, Output};
pub use throttle::Throttled;

use std::{io::Write as _, process, time::Instant};

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use log::{debug, trace, warn};

use crate::{
    clear::{clear, push},
    config::Options,
    keys::{Action, KeyEvent, action},
    prompt::{CursorState, Prompt, Status, TerminalHandle},
};
use future::{Resolver, oneshot};

/// Called on Ctrl+C instead of writing the interrupt marker and exiting.
pub type InterruptHook = Box<dyn FnOnce(&mut dyn Input, &mut dyn Output)>;

/// The text last handed to the writer and the width it was laid out for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub text: String,
    pub columns: usize,
}

/// Runs the lifecycle of one prompt: `Idle` until a submit or abort key,
/// redrawing in place whenever the prompt asks for a layout.
///
/// Raw mode is enabled on construction and restored on every exit path,
/// including drop. Dropping a terminal whose prompt is still attached detaches
/// it first, so observers can show the cursor again.
pub struct Terminal<P: Prompt, I: Input, O: Output> {
    prompt: P,
    input: I,
    writer: Throttled<O>,
    status: Status,
    /// Latest requested frame
    snapshot: Option<RenderSnapshot>,
    /// Frame physically written; differs from `snapshot` while a write is pending
    on_screen: Option<RenderSnapshot>,
    resolver: Option<Resolver<P::Output>>,
    interrupt: Option<InterruptHook>,
    interrupt_marker: String,
    interrupt_exit_code: i32,
    subscribed: bool,
}

impl<P: Prompt, I: Input, O: Output> Terminal<P, I, O> {
    /// Enables raw mode, attaches `prompt` and returns the terminal together
    /// with the future its outcome is delivered through.
    pub fn new(
        prompt: P,
        mut input: I,
        output: O,
        options: &Options,
        interrupt: Option<InterruptHook>,
    ) -> Result<(Self, ResultFuture<P::Output>)> {
        input
            .enable_raw_mode()
            .context("Unable to enable raw input mode")?;

        let (resolver, future) = oneshot();
        let mut terminal = Self {
            prompt,
            input,
            writer: Throttled::new(output, options.throttle()),
            status: Status::Idle,
            snapshot: None,
            on_screen: None,
            resolver: Some(resolver),
            interrupt,
            interrupt_marker: options.interrupt_marker.clone(),
            interrupt_exit_code: options.interrupt_exit_code,
            subscribed: true,
        };

        debug!("attaching prompt");
        let mut handle = TerminalHandle::default();
        terminal.prompt.events().emit_attach(&mut handle);
        terminal.apply(&handle)?;

        Ok((terminal, future))
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&RenderSnapshot> {
        self.snapshot.as_ref()
    }

    /// True until a terminal transition tears the session down.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Renders the prompt and schedules erase-plus-frame on the writer.
    ///
    /// Does nothing once the session has been torn down.
    pub fn request_layout(&mut self) -> Result<()> {
        if !self.subscribed {
            trace!("dropping layout after teardown");
            return Ok(());
        }
        let columns = self.writer.get_ref().columns();
        let text = self.prompt.render(self.status);

        let erase = self
            .on_screen
            .as_ref()
            .filter(|previous| !previous.text.is_empty())
            .map(|previous| clear(&previous.text, columns))
            .unwrap_or_default();

        trace!("layout for {} at {columns} columns", self.status);
        self.writer.schedule(format!("{erase}{text}"));
        self.snapshot = Some(RenderSnapshot { text, columns });
        Ok(())
    }

    pub fn toggle_cursor(&mut self, state: CursorState) -> Result<()> {
        if !self.subscribed {
            trace!("dropping cursor {state:?} after teardown");
            return Ok(());
        }
        let mut sequence = String::new();
        match state {
            CursorState::Hide => push(&mut sequence, Hide),
            CursorState::Show => push(&mut sequence, Show),
        }
        self.flush()?;
        self.writer
            .write_through(sequence.as_bytes())
            .context("Unable to write cursor state")
    }

    /// Handles one key event to completion.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<()> {
        if !self.subscribed {
            trace!("dropping key after teardown");
            return Ok(());
        }
        trace!("key {:?}", key.name);

        if key.ctrl && key.is("c") {
            return self.interrupt();
        }

        match action(key) {
            Some(Action::Exit) => self.finish(Status::Aborted),
            Some(Action::Submit) => self.finish(Status::Submitted),
            _ => {
                let text = (!key.sequence.is_empty()).then_some(key.sequence.as_str());
                let mut handle = TerminalHandle::default();
                self.prompt.events().emit_input(text, key, &mut handle);
                self.apply(&handle)
            }
        }
    }

    /// Reads and handles keys until the session ends, flushing frames as
    /// the throttle allows.
    pub fn run(&mut self) -> Result<()> {
        while self.subscribed {
            let timeout = self.writer.delay(Instant::now());
            let key = self
                .input
                .read_key(timeout)
                .context("Failed to read key event")?;
            if let Some(key) = key {
                self.handle_key(&key)?;
            }
            self.tick(Instant::now())?;
        }
        Ok(())
    }

    /// Flushes the pending frame if the throttle interval has elapsed.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        if self
            .writer
            .poll(now)
            .context("Unable to write prompt frame")?
        {
            self.on_screen.clone_from(&self.snapshot);
        }
        Ok(())
    }

    /// Writes the pending frame regardless of the throttle.
    pub fn flush(&mut self) -> Result<()> {
        if self.writer.flush().context("Unable to write prompt frame")? {
            self.on_screen.clone_from(&self.snapshot);
        }
        Ok(())
    }

    fn apply(&mut self, handle: &TerminalHandle) -> Result<()> {
        if let Some(state) = handle.cursor() {
            self.toggle_cursor(state)?;
        }
        if handle.layout_requested() {
            self.request_layout()?;
        }
        Ok(())
    }

    fn finish(&mut self, status: Status) -> Result<()> {
        debug!("prompt {status}");
        self.status = status;
        self.request_layout()?;
        self.flush()?;
        self.detach()?;
        self.teardown()?;

        let outcome = match status {
            Status::Submitted => Outcome::Submitted(self.prompt.result()),
            Status::Idle | Status::Aborted => Outcome::Aborted,
        };
        if let Some(resolver) = self.resolver.take() {
            resolver.resolve(outcome);
        }
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        debug!("detaching prompt");
        let mut handle = TerminalHandle::default();
        self.prompt.events().emit_detach(&mut handle);
        self.apply(&handle)?;
        self.flush()
    }

    fn teardown(&mut self) -> Result<()> {
        self.subscribed = false;
        self.input
            .restore_mode()
            .context("Unable to restore input mode")
    }

    /// Ctrl+C: a deliberate non-graceful exit that never resolves the future.
    fn interrupt(&mut self) -> Result<()> {
        debug!("hard interrupt");
        self.request_layout()?;
        self.flush()?;
        self.detach()?;
        self.teardown()?;
        drop(self.resolver.take());

        match self.interrupt.take() {
            Some(hook) => {
                hook(&mut self.input, self.writer.get_mut());
                Ok(())
            }
            None => self.exit_interrupted(),
        }
    }

    #[allow(clippy::exit)]
    fn exit_interrupted(&mut self) -> Result<()> {
        let code = self.write_interrupt_marker()?;
        process::exit(code)
    }

    /// Writes the interrupt marker and returns the code to exit with.
    fn write_interrupt_marker(&mut self) -> Result<i32> {
        let out = self.writer.get_mut();
        out.write_all(self.interrupt_marker.as_bytes())
            .and_then(|()| out.flush())
            .context("Unable to write interrupt marker")?;
        Ok(self.interrupt_exit_code)
    }
}

impl<P: Prompt, I: Input, O: Output> Drop for Terminal<P, I, O> {
    fn drop(&mut self) {
        if self.subscribed {
            // Attempt to restore terminal state, ignoring errors during cleanup
            if self.prompt.events().is_attached()
                && let Err(e) = self.detach()
            {
                warn!("unable to detach prompt: {e:#}");
            }
            if let Err(e) = self.input.restore_mode() {
                warn!("unable to restore input mode: {e}");
            }
        }
    }
}
