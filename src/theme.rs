//! Theme configuration for consistent styling across prompts.

use colored::{Color, ColoredString, Colorize};

const ACCENT: Color = Color::TrueColor {
    r: 34,
    g: 211,
    b: 238,
}; // #22d3ee
const MUTED: Color = Color::TrueColor {
    r: 156,
    g: 163,
    b: 175,
}; // #9ca3af

/// Colors and symbols used by the built-in prompts.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Color for the highlighted item and submitted answer
    pub selected: Color,
    /// Color for help text and separators
    pub help: Color,
    pub success: Color,
    pub error: Color,
    /// Marker in front of the highlighted item
    pub indicator: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            selected: ACCENT,
            help: MUTED,
            success: Color::Green,
            error: Color::Red,
            indicator: "❯",
        }
    }
}

impl Theme {
    #[must_use]
    pub fn title(&self, text: &str) -> ColoredString {
        text.bold()
    }

    #[must_use]
    pub fn selected(&self, text: &str) -> ColoredString {
        text.color(self.selected)
    }

    #[must_use]
    pub fn help(&self, text: &str) -> ColoredString {
        text.color(self.help)
    }

    /// Leading symbol for each status line: `?` pending, `✔` submitted, `✖` aborted.
    #[must_use]
    pub fn pending_symbol(&self) -> ColoredString {
        "?".color(self.selected).bold()
    }

    #[must_use]
    pub fn success_symbol(&self) -> ColoredString {
        "✔".color(self.success)
    }

    #[must_use]
    pub fn error_symbol(&self) -> ColoredString {
        "✖".color(self.error)
    }
}
