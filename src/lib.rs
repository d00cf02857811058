//! Inline, re-drawing interactive prompts for the terminal.
//!
//! A [`Prompt`] renders itself as plain text (ANSI styling allowed). The
//! [`Terminal`] reads keys in raw mode, routes submit/abort/interrupt itself
//! and forwards everything else to the prompt's observers, then erases the
//! previous frame (accounting for line wrapping) and draws the new one.
//!
//! ```ignore
//! let select = Select::new("Pick a color", vec!["red", "green", "blue"])?;
//! match render(select)?.wait() {
//!     Some(Outcome::Submitted(color)) => println!("{color}"),
//!     Some(Outcome::Aborted) | None => {}
//! }
//! ```

mod clear;
mod config;
mod keys;
mod logging;
mod prompt;
mod select;
mod terminal;
mod theme;

use std::io::{self, Write};

use anyhow::{Context, Result};

pub use clear::{clear, rows, strip_ansi, visible_width};
pub use config::{DEFAULT_INTERRUPT_EXIT_CODE, DEFAULT_INTERRUPT_MARKER, DEFAULT_THROTTLE_MS, Options};
pub use keys::{Action, KeyEvent, action};
pub use logging::Logging;
pub use prompt::{CursorState, Prompt, PromptEvents, Status, TerminalHandle, View};
pub use select::{Select, SelectState};
pub use terminal::{
    CrosstermInput, Input, InterruptHook, Outcome, Output, RenderSnapshot, ResultFuture, Terminal,
    Throttled,
};
pub use theme::Theme;

/// Runs `prompt` on the process terminal with default options.
///
/// Ctrl+C writes the interrupt marker and exits the process.
pub fn render<P: Prompt>(prompt: P) -> Result<ResultFuture<P::Output>> {
    render_with(prompt, &Options::default(), None)
}

/// Runs `prompt` on the process terminal until it is submitted or aborted.
///
/// When `interrupt` is given, Ctrl+C calls it instead of exiting, and the
/// returned future never resolves.
pub fn render_with<P: Prompt>(
    prompt: P,
    options: &Options,
    interrupt: Option<InterruptHook>,
) -> Result<ResultFuture<P::Output>> {
    let (mut terminal, future) =
        Terminal::new(prompt, CrosstermInput::new(), io::stdout(), options, interrupt)?;
    terminal.request_layout()?;
    terminal.run()?;
    Ok(future)
}

/// Writes static content followed by a newline to stdout.
pub fn print<V: View + ?Sized>(view: &V) -> Result<()> {
    print_to(&mut io::stdout(), view)
}

pub fn print_to<W: Write, V: View + ?Sized>(out: &mut W, view: &V) -> Result<()> {
    out.write_all(view.render().as_bytes())
        .and_then(|()| out.write_all(b"\n"))
        .and_then(|()| out.flush())
        .context("Unable to write output")
}
