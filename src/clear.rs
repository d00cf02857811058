//! Erasing previously rendered text.
//!
//! A prompt redraws in place: before writing a new frame, the rows the
//! previous frame occupied are erased. Lines longer than the terminal wrap,
//! so the row count depends on the visible width of each line, which in turn
//! requires skipping ANSI escape sequences:
//! - CSI sequences: `ESC [` (or the 8-bit `U+009B`) ... final byte (0x40-0x7E)
//! - OSC sequences: `ESC ]` ... BEL or ST (`ESC \`)
//! - DCS/PM/APC sequences: `ESC P`/`ESC ^`/`ESC _` ... ST
//! - Other escapes: `ESC`, intermediates (0x20-0x2F), one final byte

use std::{borrow::Cow, iter::Peekable, str::Chars};

use crossterm::{
    Command,
    cursor::{MoveToColumn, MoveUp},
    terminal::{Clear, ClearType},
};
use unicode_width::UnicodeWidthChar;

const ESC: char = '\x1b';
const CSI: char = '\u{9b}';
const BEL: char = '\x07';

/// Strips ANSI escape sequences from `s`.
///
/// Returns `Cow::Borrowed` when `s` contains no escape introducer.
#[must_use]
pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains([ESC, CSI]) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESC => skip_escape(&mut chars),
            CSI => skip_csi(&mut chars),
            _ => out.push(c),
        }
    }

    Cow::Owned(out)
}

/// Skips the remainder of a sequence whose `ESC` was already consumed.
fn skip_escape(chars: &mut Peekable<Chars<'_>>) {
    match chars.peek() {
        Some('[') => {
            chars.next();
            skip_csi(chars);
        }
        Some(']' | 'P' | '^' | '_') => {
            chars.next();
            skip_string(chars);
        }
        Some(_) => {
            while chars.next_if(|c| ('\x20'..='\x2f').contains(c)).is_some() {}
            chars.next();
        }
        None => {}
    }
}

/// Parameter bytes (0x30-0x3F), intermediate bytes (0x20-0x2F), final byte
/// (0x40-0x7E). An out-of-range byte ends the sequence without being consumed.
fn skip_csi(chars: &mut Peekable<Chars<'_>>) {
    while let Some(&c) = chars.peek() {
        if ('\x40'..='\x7e').contains(&c) {
            chars.next();
            return;
        }
        if !('\x20'..='\x3f').contains(&c) {
            return;
        }
        chars.next();
    }
}

/// Consumes through BEL or ST.
fn skip_string(chars: &mut Peekable<Chars<'_>>) {
    while let Some(c) = chars.next() {
        if c == BEL {
            return;
        }
        if c == ESC && chars.next_if_eq(&'\\').is_some() {
            return;
        }
    }
}

/// Number of terminal columns `line` occupies once escape sequences are removed.
#[must_use]
pub fn visible_width(line: &str) -> usize {
    strip_ansi(line)
        .chars()
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Number of terminal rows `text` occupies at `per_line` columns.
///
/// A line exactly as wide as the terminal does not wrap onto an extra row.
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn rows(text: &str, per_line: usize) -> usize {
    let lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));

    if per_line == 0 {
        return lines.count();
    }

    lines
        .map(|line| 1 + visible_width(line).saturating_sub(1) / per_line)
        .sum()
}

/// Escape sequence that erases `text` and returns the cursor to the render origin.
///
/// Assumes the cursor sits at the end of `text`. With an unknown width
/// (`per_line == 0`) only the current line can be erased.
#[must_use]
pub fn clear(text: &str, per_line: usize) -> String {
    let mut out = String::new();

    if per_line == 0 {
        push(&mut out, Clear(ClearType::CurrentLine));
        push(&mut out, MoveToColumn(0));
        return out;
    }

    erase_lines(&mut out, rows(text, per_line));
    out
}

#[allow(clippy::arithmetic_side_effects)]
fn erase_lines(out: &mut String, count: usize) {
    for i in 0..count {
        push(out, Clear(ClearType::CurrentLine));
        if i + 1 < count {
            push(out, MoveUp(1));
        }
    }
    if count > 0 {
        push(out, MoveToColumn(0));
    }
}

/// Appends the ANSI form of `command` to `out`.
pub(crate) fn push(out: &mut String, command: impl Command) {
    // writing into a String cannot fail
    let _ = command.write_ansi(out);
}
