use std::{cell::RefCell, rc::Rc};

use anyhow::{Result, bail};

use crate::{keys::KeyEvent, prompt::PromptEvents};

/// List navigation state shared between a prompt and its input observer.
///
/// `selected_idx` always stays within `items`, wrapping at both ends.
#[derive(Debug, Clone)]
pub struct SelectState<T> {
    items: Vec<T>,
    selected_idx: usize,
}

impl<T> SelectState<T> {
    /// Creates a state with the first item selected.
    ///
    /// # Errors
    ///
    /// Returns an error if `items` is empty.
    pub fn new(items: Vec<T>) -> Result<Self> {
        if items.is_empty() {
            bail!("A selection needs at least one item");
        }
        Ok(Self {
            items,
            selected_idx: 0,
        })
    }

    /// Sets the initial cursor position, clamped to the last item.
    #[must_use]
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected_idx = index.min(self.items.len().saturating_sub(1));
        self
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn selected_idx(&self) -> usize {
        self.selected_idx
    }

    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn selected(&self) -> &T {
        // in bounds: items is non-empty and every update wraps
        &self.items[self.selected_idx]
    }

    /// Applies a key to the selection. Returns true if the index changed.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn consume(&mut self, key: &KeyEvent) -> bool {
        let len = self.items.len();
        match key.name.as_deref() {
            Some("down") => {
                self.selected_idx = (self.selected_idx + 1) % len;
                true
            }
            Some("up") => {
                self.selected_idx = if self.selected_idx == 0 {
                    len - 1
                } else {
                    self.selected_idx - 1
                };
                true
            }
            _ => false,
        }
    }
}

impl<T: 'static> SelectState<T> {
    /// Subscribes `state` to a prompt's input events, requesting a layout
    /// whenever a key moves the selection.
    pub fn bind(state: &Rc<RefCell<Self>>, events: &mut PromptEvents) {
        let state = Rc::clone(state);
        events.on_input(move |_, key, terminal| {
            if state.borrow_mut().consume(key) {
                terminal.request_layout();
            }
        });
    }
}
