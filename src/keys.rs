//! Key events and the mapping from raw keystrokes to semantic actions.

use crossterm::event::{self, KeyCode, KeyModifiers};

/// One decoded keystroke.
///
/// `name` follows the readline vocabulary (`return`, `escape`, `up`, `a`, ...)
/// and is `None` for keys that have no symbolic name, such as punctuation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// The raw sequence the terminal sent for this key
    pub sequence: String,
    /// Symbolic key name
    pub name: Option<String>,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyEvent {
    /// Creates an unmodified key event with the given symbolic name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = sequence.into();
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Returns true if the key carries the given symbolic name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// The meaning of a keystroke, independent of the physical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Submit,
    Abort,
    Exit,
    First,
    Last,
    Reset,
    Delete,
    DeleteForward,
    Next,
    NextPage,
    PrevPage,
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
}

/// Maps a key event to its semantic action.
///
/// Meta combinations are unhandled except for escape. Ctrl combinations are
/// checked before the plain name table, so `ctrl+a` is `First` rather than
/// falling through to a letter.
#[must_use]
pub fn action(key: &KeyEvent) -> Option<Action> {
    let name = key.name.as_deref()?;

    if key.meta && name != "escape" {
        return None;
    }

    if key.ctrl {
        match name {
            "a" => return Some(Action::First),
            "c" | "d" => return Some(Action::Abort),
            "e" => return Some(Action::Last),
            "g" => return Some(Action::Reset),
            _ => {}
        }
    }

    match name {
        "return" | "enter" => Some(Action::Submit),
        "backspace" => Some(Action::Delete),
        "delete" => Some(Action::DeleteForward),
        "abort" => Some(Action::Abort),
        "escape" => Some(Action::Exit),
        "tab" => Some(Action::Next),
        "pagedown" => Some(Action::NextPage),
        "pageup" => Some(Action::PrevPage),
        "home" => Some(Action::Home),
        "end" => Some(Action::End),
        "up" => Some(Action::Up),
        "down" => Some(Action::Down),
        "left" => Some(Action::Left),
        "right" => Some(Action::Right),
        _ => None,
    }
}

impl From<event::KeyEvent> for KeyEvent {
    fn from(key: event::KeyEvent) -> Self {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let meta = key
            .modifiers
            .intersects(KeyModifiers::ALT | KeyModifiers::META);
        let mut shift = key.modifiers.contains(KeyModifiers::SHIFT);

        let (name, sequence): (Option<String>, String) = match key.code {
            // Ctrl+J and Ctrl+H arrive as bare line feed and backspace bytes,
            // which readline names `enter` and `backspace`
            KeyCode::Char(c @ ('j' | 'h')) if ctrl => {
                let (name, sequence) = if c == 'j' { ("enter", "\n") } else { ("backspace", "\x08") };
                return Self {
                    sequence: sequence.into(),
                    name: Some(name.into()),
                    ctrl: false,
                    meta,
                    shift,
                };
            }
            KeyCode::Char(' ') => (Some("space".into()), " ".into()),
            KeyCode::Char(c) => {
                if c.is_ascii_uppercase() {
                    shift = true;
                }
                let name = c
                    .is_ascii_alphanumeric()
                    .then(|| c.to_ascii_lowercase().to_string());
                let sequence = if ctrl && c.is_ascii_alphabetic() {
                    control_byte(c).to_string()
                } else {
                    c.to_string()
                };
                (name, sequence)
            }
            KeyCode::BackTab => {
                shift = true;
                (Some("tab".into()), "\x1b[Z".into())
            }
            KeyCode::F(n) => (Some(format!("f{n}")), String::new()),
            code => match named_key(code) {
                Some((name, sequence)) => (Some(name.into()), sequence.into()),
                None => (None, String::new()),
            },
        };

        Self {
            sequence,
            name,
            ctrl,
            meta,
            shift,
        }
    }
}

fn named_key(code: KeyCode) -> Option<(&'static str, &'static str)> {
    let key = match code {
        KeyCode::Enter => ("return", "\r"),
        KeyCode::Backspace => ("backspace", "\x7f"),
        KeyCode::Delete => ("delete", "\x1b[3~"),
        KeyCode::Esc => ("escape", "\x1b"),
        KeyCode::Tab => ("tab", "\t"),
        KeyCode::PageUp => ("pageup", "\x1b[5~"),
        KeyCode::PageDown => ("pagedown", "\x1b[6~"),
        KeyCode::Home => ("home", "\x1b[H"),
        KeyCode::End => ("end", "\x1b[F"),
        KeyCode::Insert => ("insert", "\x1b[2~"),
        KeyCode::Up => ("up", "\x1b[A"),
        KeyCode::Down => ("down", "\x1b[B"),
        KeyCode::Right => ("right", "\x1b[C"),
        KeyCode::Left => ("left", "\x1b[D"),
        _ => return None,
    };
    Some(key)
}

/// C0 control character produced by Ctrl plus an ASCII letter.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
fn control_byte(c: char) -> char {
    char::from(c.to_ascii_lowercase() as u8 - b'a' + 1)
}
