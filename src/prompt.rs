//! The prompt contract and its observer registry.
//!
//! A prompt does not subclass anything. It renders itself from its own state,
//! and exposes three observer lists (attach, detach, input) that auxiliary
//! state objects such as [`SelectState`](crate::SelectState) subscribe to.

use std::fmt;

use derive_more::Display;

use crate::keys::KeyEvent;

/// Lifecycle of one interactive session.
///
/// Starts `Idle` and moves exactly once to `Submitted` or `Aborted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Status {
    #[display("idle")]
    Idle,
    #[display("submitted")]
    Submitted,
    #[display("aborted")]
    Aborted,
}

impl Status {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Hide,
    Show,
}

/// Requests an observer makes of the terminal it is attached to.
///
/// The terminal applies them once the observers have returned.
#[derive(Debug, Default)]
pub struct TerminalHandle {
    layout: bool,
    cursor: Option<CursorState>,
}

impl TerminalHandle {
    /// Asks for the prompt to be rendered again.
    pub fn request_layout(&mut self) {
        self.layout = true;
    }

    pub fn toggle_cursor(&mut self, state: CursorState) {
        self.cursor = Some(state);
    }

    #[must_use]
    pub fn layout_requested(&self) -> bool {
        self.layout
    }

    #[must_use]
    pub fn cursor(&self) -> Option<CursorState> {
        self.cursor
    }
}

type LifecycleObserver = Box<dyn FnMut(&mut TerminalHandle)>;
type InputObserver = Box<dyn FnMut(Option<&str>, &KeyEvent, &mut TerminalHandle)>;

/// Observer lists for a prompt's attach, detach and input events.
#[derive(Default)]
pub struct PromptEvents {
    attach: Vec<LifecycleObserver>,
    detach: Vec<LifecycleObserver>,
    input: Vec<InputObserver>,
    attached: bool,
}

impl PromptEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_attach(&mut self, observer: impl FnMut(&mut TerminalHandle) + 'static) {
        self.attach.push(Box::new(observer));
    }

    pub fn on_detach(&mut self, observer: impl FnMut(&mut TerminalHandle) + 'static) {
        self.detach.push(Box::new(observer));
    }

    pub fn on_input(
        &mut self,
        observer: impl FnMut(Option<&str>, &KeyEvent, &mut TerminalHandle) + 'static,
    ) {
        self.input.push(Box::new(observer));
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn emit_attach(&mut self, terminal: &mut TerminalHandle) {
        self.attached = true;
        for observer in &mut self.attach {
            observer(terminal);
        }
    }

    pub fn emit_detach(&mut self, terminal: &mut TerminalHandle) {
        for observer in &mut self.detach {
            observer(terminal);
        }
        self.attached = false;
    }

    /// Forwards a key to the input observers. Ignored while detached.
    pub fn emit_input(&mut self, text: Option<&str>, key: &KeyEvent, terminal: &mut TerminalHandle) {
        if !self.attached {
            return;
        }
        for observer in &mut self.input {
            observer(text, key, terminal);
        }
    }
}

impl fmt::Debug for PromptEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptEvents")
            .field("attach", &self.attach.len())
            .field("detach", &self.detach.len())
            .field("input", &self.input.len())
            .field("attached", &self.attached)
            .finish()
    }
}

/// An interactive view driven by a [`Terminal`](crate::Terminal).
pub trait Prompt {
    type Output;

    /// Display text for the given status. Must not perform I/O.
    fn render(&self, status: Status) -> String;

    /// The submitted value. Only called once status is `Submitted`.
    fn result(&mut self) -> Self::Output;

    fn events(&mut self) -> &mut PromptEvents;
}

/// Static, non-interactive content.
pub trait View {
    fn render(&self) -> String;
}

impl View for str {
    fn render(&self) -> String {
        self.to_owned()
    }
}

impl View for String {
    fn render(&self) -> String {
        self.clone()
    }
}
