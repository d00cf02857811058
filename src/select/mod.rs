//! Single selection prompt.

mod state;


pub use state::SelectState;

use std::{cell::RefCell, fmt::Display, fmt::Write, rc::Rc};

use anyhow::Result;

use crate::{
    prompt::{CursorState, Prompt, PromptEvents, Status},
    theme::Theme,
};

const DEFAULT_HELP: &str = "↑↓ navigate, Enter select, Esc cancel";

/// A single selection prompt rendered inline.
///
/// The cursor is hidden while the prompt is attached.
pub struct Select<T> {
    title: String,
    help_message: Option<String>,
    state: Rc<RefCell<SelectState<T>>>,
    events: PromptEvents,
    theme: Theme,
}

impl<T: Display + Clone + 'static> Select<T> {
    /// Creates a new select prompt with the given title and items.
    ///
    /// # Errors
    ///
    /// Returns an error if `items` is empty.
    pub fn new(title: impl Into<String>, items: Vec<T>) -> Result<Self> {
        let state = Rc::new(RefCell::new(SelectState::new(items)?));

        let mut events = PromptEvents::new();
        SelectState::bind(&state, &mut events);
        events.on_attach(|terminal| terminal.toggle_cursor(CursorState::Hide));
        events.on_detach(|terminal| terminal.toggle_cursor(CursorState::Show));

        Ok(Self {
            title: title.into(),
            help_message: None,
            state,
            events,
            theme: Theme::default(),
        })
    }

    /// Sets the help message displayed below the list.
    #[must_use]
    pub fn with_help_message(mut self, message: impl Into<String>) -> Self {
        self.help_message = Some(message.into());
        self
    }

    /// Sets the initial cursor position.
    #[must_use]
    pub fn with_starting_cursor(self, index: usize) -> Self {
        self.state.replace_with(|state| state.clone().with_selected(index));
        self
    }

    /// Sets a custom theme for the select.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn selected_idx(&self) -> usize {
        self.state.borrow().selected_idx()
    }

    fn render_list(&self, state: &SelectState<T>) -> String {
        let mut out = format!(
            "{} {} {}",
            self.theme.pending_symbol(),
            self.theme.title(&self.title),
            self.theme.help("›")
        );

        for (idx, item) in state.items().iter().enumerate() {
            let label = item.to_string();
            if idx == state.selected_idx() {
                let _ = write!(
                    out,
                    "\n{} {}",
                    self.theme.selected(self.theme.indicator),
                    self.theme.selected(&label)
                );
            } else {
                let _ = write!(out, "\n  {label}");
            }
        }

        let help = self.help_message.as_deref().unwrap_or(DEFAULT_HELP);
        let _ = write!(out, "\n{}", self.theme.help(help));
        out
    }
}

impl<T: Display + Clone + 'static> Prompt for Select<T> {
    type Output = T;

    fn render(&self, status: Status) -> String {
        let state = self.state.borrow();
        match status {
            Status::Idle => self.render_list(&state),
            Status::Submitted => format!(
                "{} {} {} {}\n",
                self.theme.success_symbol(),
                self.theme.title(&self.title),
                self.theme.help("›"),
                self.theme.selected(&state.selected().to_string())
            ),
            Status::Aborted => format!(
                "{} {}\n",
                self.theme.error_symbol(),
                self.theme.title(&self.title)
            ),
        }
    }

    fn result(&mut self) -> T {
        self.state.borrow().selected().clone()
    }

    fn events(&mut self) -> &mut PromptEvents {
        &mut self.events
    }
}
