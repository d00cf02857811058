use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    io::{self, Write},
    rc::Rc,
    time::{Duration, Instant},
};

use super::{Input, Outcome, Output, Terminal};
use crate::{
    config::Options,
    keys::KeyEvent,
    prompt::{CursorState, Prompt, PromptEvents, Status},
    select::Select,
};

const ERASE_ONE_ROW: &str = "\x1b[2K\x1b[1G";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

#[derive(Clone, Default)]
struct Screen {
    bytes: Rc<RefCell<Vec<u8>>>,
    columns: usize,
}

impl Screen {
    fn with_columns(columns: usize) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }
}

impl Write for Screen {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Output for Screen {
    fn columns(&self) -> usize {
        self.columns
    }
}

#[derive(Default)]
struct Script {
    keys: VecDeque<KeyEvent>,
    raw: Rc<Cell<bool>>,
}

impl Input for Script {
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        self.raw.set(true);
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        self.raw.set(false);
        Ok(())
    }

    fn read_key(&mut self, _timeout: Option<Duration>) -> io::Result<Option<KeyEvent>> {
        self.keys
            .pop_front()
            .map(Some)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

/// Collects typed characters and renders them after the status.
struct Echo {
    text: Rc<RefCell<String>>,
    results: Rc<Cell<usize>>,
    events: PromptEvents,
}

impl Echo {
    fn new() -> Self {
        let text = Rc::new(RefCell::new(String::new()));
        let mut events = PromptEvents::new();
        let t = Rc::clone(&text);
        events.on_input(move |sequence, _, terminal| {
            if let Some(sequence) = sequence {
                t.borrow_mut().push_str(sequence);
                terminal.request_layout();
            }
        });
        Self {
            text,
            results: Rc::new(Cell::new(0)),
            events,
        }
    }
}

impl Prompt for Echo {
    type Output = String;

    fn render(&self, status: Status) -> String {
        format!("{status}: {}", self.text.borrow())
    }

    fn result(&mut self) -> String {
        self.results.set(self.results.get() + 1);
        self.text.borrow().clone()
    }

    fn events(&mut self) -> &mut PromptEvents {
        &mut self.events
    }
}

fn typed(c: &str) -> KeyEvent {
    KeyEvent::named(c).with_sequence(c)
}

fn instant() -> Options {
    Options::builder().throttle_ms(0).build()
}

#[test]
fn test_new_attaches_and_enables_raw_mode() {
    let attached = Rc::new(Cell::new(false));
    let mut prompt = Echo::new();
    let a = Rc::clone(&attached);
    prompt.events().on_attach(move |_| a.set(true));

    let input = Script::default();
    let raw = Rc::clone(&input.raw);
    let screen = Screen::with_columns(80);

    let (terminal, _future) = Terminal::new(prompt, input, screen.clone(), &instant(), None).unwrap();

    assert!(attached.get());
    assert!(raw.get());
    assert_eq!(terminal.status(), Status::Idle);
    assert!(terminal.is_subscribed());
    assert!(screen.contents().is_empty());
}

#[test]
fn test_first_layout_has_no_erase() {
    let screen = Screen::with_columns(80);
    let (mut terminal, _future) =
        Terminal::new(Echo::new(), Script::default(), screen.clone(), &instant(), None).unwrap();

    terminal.request_layout().unwrap();
    terminal.tick(Instant::now()).unwrap();

    assert_eq!(screen.contents(), "idle: ");
    let snapshot = terminal.snapshot().unwrap();
    assert_eq!(snapshot.text, "idle: ");
    assert_eq!(snapshot.columns, 80);
}

#[test]
fn test_input_redraws_over_previous_frame() {
    let screen = Screen::with_columns(80);
    let (mut terminal, _future) =
        Terminal::new(Echo::new(), Script::default(), screen.clone(), &instant(), None).unwrap();

    terminal.request_layout().unwrap();
    terminal.tick(Instant::now()).unwrap();
    terminal.handle_key(&typed("a")).unwrap();
    terminal.tick(Instant::now()).unwrap();

    assert_eq!(screen.contents(), format!("idle: {ERASE_ONE_ROW}idle: a"));
}

#[test]
fn test_erase_accounts_for_wrapping() {
    let screen = Screen::with_columns(10);
    let (mut terminal, _future) =
        Terminal::new(Echo::new(), Script::default(), screen.clone(), &instant(), None).unwrap();

    for _ in 0..20 {
        terminal.handle_key(&typed("x")).unwrap();
        terminal.tick(Instant::now()).unwrap();
    }
    let before = screen.contents().len();
    terminal.handle_key(&typed("y")).unwrap();
    terminal.tick(Instant::now()).unwrap();

    // "idle: " plus 20 x's is 26 columns: three rows at width 10
    let written = &screen.contents()[before..];
    let expected_erase = "\x1b[2K\x1b[1A\x1b[2K\x1b[1A\x1b[2K\x1b[1G";
    assert_eq!(written, format!("{expected_erase}idle: {}y", "x".repeat(20)));
}

#[test]
fn test_unknown_width_erases_current_line() {
    let screen = Screen::with_columns(0);
    let (mut terminal, _future) =
        Terminal::new(Echo::new(), Script::default(), screen.clone(), &instant(), None).unwrap();

    terminal.request_layout().unwrap();
    terminal.flush().unwrap();
    terminal.handle_key(&typed("a")).unwrap();
    terminal.flush().unwrap();

    assert_eq!(screen.contents(), format!("idle: {ERASE_ONE_ROW}idle: a"));
}

#[test]
fn test_submit_resolves_once_with_result() {
    let prompt = Echo::new();
    let results = Rc::clone(&prompt.results);
    let input = Script::default();
    let raw = Rc::clone(&input.raw);
    let screen = Screen::with_columns(80);

    let (mut terminal, future) = Terminal::new(prompt, input, screen.clone(), &instant(), None).unwrap();
    terminal.request_layout().unwrap();
    terminal.handle_key(&typed("o")).unwrap();
    terminal.handle_key(&typed("k")).unwrap();
    terminal.handle_key(&KeyEvent::named("return")).unwrap();

    assert_eq!(terminal.status(), Status::Submitted);
    assert!(!terminal.is_subscribed());
    assert!(!raw.get());
    assert_eq!(results.get(), 1);
    assert!(screen.contents().ends_with("submitted: ok"));

    terminal.handle_key(&KeyEvent::named("return")).unwrap();
    assert_eq!(results.get(), 1);

    assert_eq!(future.try_get(), Some(Outcome::Submitted("ok".to_string())));
    assert_eq!(future.try_get(), None);
}

#[test]
fn test_enter_also_submits() {
    let (mut terminal, future) =
        Terminal::new(Echo::new(), Script::default(), Screen::default(), &instant(), None).unwrap();
    terminal.handle_key(&KeyEvent::named("enter")).unwrap();
    assert_eq!(future.wait(), Some(Outcome::Submitted(String::new())));
}

#[test]
fn test_escape_aborts_and_silences_observers() {
    let calls = Rc::new(Cell::new(0));
    let mut prompt = Echo::new();
    let c = Rc::clone(&calls);
    prompt.events().on_input(move |_, _, _| c.set(c.get() + 1));
    let results = Rc::clone(&prompt.results);
    let screen = Screen::with_columns(80);

    let (mut terminal, future) =
        Terminal::new(prompt, Script::default(), screen.clone(), &instant(), None).unwrap();
    terminal.handle_key(&typed("a")).unwrap();
    assert_eq!(calls.get(), 1);

    terminal.handle_key(&KeyEvent::named("escape")).unwrap();
    assert_eq!(terminal.status(), Status::Aborted);
    assert!(screen.contents().ends_with("aborted: a"));

    terminal.handle_key(&typed("b")).unwrap();
    terminal.handle_key(&KeyEvent::named("down")).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(results.get(), 0);

    assert_eq!(future.wait(), Some(Outcome::Aborted));
}

#[test]
fn test_other_actions_are_forwarded() {
    let keys = Rc::new(RefCell::new(Vec::new()));
    let mut prompt = Echo::new();
    let k = Rc::clone(&keys);
    prompt
        .events()
        .on_input(move |_, key, _| k.borrow_mut().push(key.clone()));

    let (mut terminal, future) =
        Terminal::new(prompt, Script::default(), Screen::default(), &instant(), None).unwrap();

    let ctrl_d = KeyEvent::named("d").with_ctrl();
    let tab = KeyEvent::named("tab");
    terminal.handle_key(&ctrl_d).unwrap();
    terminal.handle_key(&tab).unwrap();

    assert_eq!(*keys.borrow(), vec![ctrl_d, tab]);
    assert_eq!(terminal.status(), Status::Idle);
    assert_eq!(future.try_get(), None);
}

#[test]
fn test_interrupt_runs_hook_without_resolving() {
    let prompt = Echo::new();
    let results = Rc::clone(&prompt.results);
    let input = Script::default();
    let raw = Rc::clone(&input.raw);
    let screen = Screen::with_columns(80);
    let hooked = Rc::new(Cell::new(false));

    let h = Rc::clone(&hooked);
    let hook: super::InterruptHook = Box::new(move |_input, output| {
        h.set(true);
        let _ = output.write_all(b"<bye>");
    });

    let (mut terminal, future) =
        Terminal::new(prompt, input, screen.clone(), &instant(), Some(hook)).unwrap();
    terminal.handle_key(&typed("a")).unwrap();
    terminal.handle_key(&KeyEvent::named("c").with_ctrl()).unwrap();

    assert!(hooked.get());
    assert!(!raw.get());
    assert!(!terminal.is_subscribed());
    assert_eq!(terminal.status(), Status::Idle);
    assert_eq!(results.get(), 0);
    assert!(screen.contents().ends_with("idle: a<bye>"));

    drop(terminal);
    assert_eq!(future.wait(), None);
}

#[test]
fn test_throttle_coalesces_and_final_frame_erases_what_is_on_screen() {
    let screen = Screen::with_columns(80);
    let options = Options::builder().throttle_ms(60_000).build();
    let (mut terminal, future) =
        Terminal::new(Echo::new(), Script::default(), screen.clone(), &options, None).unwrap();

    let now = Instant::now();
    terminal.request_layout().unwrap();
    terminal.tick(now).unwrap();
    terminal.handle_key(&typed("a")).unwrap();
    terminal.handle_key(&typed("b")).unwrap();
    terminal.tick(now).unwrap();
    assert_eq!(screen.contents(), "idle: ");
    assert_eq!(terminal.snapshot().unwrap().text, "idle: ab");

    terminal.handle_key(&KeyEvent::named("return")).unwrap();
    assert_eq!(
        screen.contents(),
        format!("idle: {ERASE_ONE_ROW}submitted: ab")
    );
    assert_eq!(future.wait(), Some(Outcome::Submitted("ab".to_string())));
}

#[test]
fn test_run_drives_script_to_submit() {
    let input = Script {
        keys: [typed("h"), typed("i"), KeyEvent::named("return")].into(),
        ..Script::default()
    };
    let screen = Screen::with_columns(80);
    let (mut terminal, future) = Terminal::new(Echo::new(), input, screen.clone(), &instant(), None).unwrap();

    terminal.request_layout().unwrap();
    terminal.run().unwrap();

    assert!(!terminal.is_subscribed());
    assert!(screen.contents().ends_with("submitted: hi"));
    assert_eq!(future.wait(), Some(Outcome::Submitted("hi".to_string())));
}

#[test]
fn test_run_propagates_input_errors() {
    let (mut terminal, _future) =
        Terminal::new(Echo::new(), Script::default(), Screen::default(), &instant(), None).unwrap();
    let err = terminal.run().unwrap_err();
    assert!(err.to_string().contains("Failed to read key event"));
}

#[test]
fn test_drop_restores_input_mode() {
    let input = Script::default();
    let raw = Rc::clone(&input.raw);
    let (terminal, future) =
        Terminal::new(Echo::new(), input, Screen::default(), &instant(), None).unwrap();
    assert!(raw.get());

    drop(terminal);
    assert!(!raw.get());
    assert_eq!(future.wait(), None);
}

#[test]
fn test_no_writes_after_submit() {
    let screen = Screen::with_columns(80);
    let (mut terminal, _future) =
        Terminal::new(Echo::new(), Script::default(), screen.clone(), &instant(), None).unwrap();
    terminal.handle_key(&KeyEvent::named("return")).unwrap();
    assert_eq!(screen.contents(), "submitted: ");

    terminal.request_layout().unwrap();
    terminal.flush().unwrap();
    terminal.toggle_cursor(CursorState::Hide).unwrap();

    assert_eq!(screen.contents(), "submitted: ");
    assert_eq!(terminal.snapshot().unwrap().text, "submitted: ");
}

#[test]
fn test_drop_after_failed_run_shows_cursor() {
    let select = Select::new("Pick", vec!["a", "b"]).unwrap();
    let input = Script::default();
    let raw = Rc::clone(&input.raw);
    let screen = Screen::with_columns(80);

    let (mut terminal, future) = Terminal::new(select, input, screen.clone(), &instant(), None).unwrap();
    assert_eq!(screen.contents(), HIDE_CURSOR);

    assert!(terminal.run().is_err());
    drop(terminal);

    assert!(screen.contents().starts_with(HIDE_CURSOR));
    assert!(screen.contents().ends_with(SHOW_CURSOR));
    assert!(!raw.get());
    assert_eq!(future.wait(), None);
}

#[test]
fn test_drop_after_submit_does_not_detach_twice() {
    let detached = Rc::new(Cell::new(0));
    let mut prompt = Echo::new();
    let d = Rc::clone(&detached);
    prompt.events().on_detach(move |terminal| {
        d.set(d.get() + 1);
        terminal.toggle_cursor(CursorState::Show);
    });
    let screen = Screen::with_columns(80);

    let (mut terminal, _future) =
        Terminal::new(prompt, Script::default(), screen.clone(), &instant(), None).unwrap();
    terminal.handle_key(&KeyEvent::named("escape")).unwrap();
    drop(terminal);

    assert_eq!(detached.get(), 1);
    assert_eq!(screen.contents().matches(SHOW_CURSOR).count(), 1);
}

#[test]
fn test_interrupt_marker_and_exit_code() {
    let screen = Screen::with_columns(80);
    let options = Options::builder()
        .throttle_ms(0)
        .interrupt_marker("^C!\n")
        .interrupt_exit_code(2)
        .build();
    let (mut terminal, _future) =
        Terminal::new(Echo::new(), Script::default(), screen.clone(), &options, None).unwrap();
    terminal.handle_key(&typed("a")).unwrap();
    terminal.flush().unwrap();

    assert_eq!(terminal.write_interrupt_marker().unwrap(), 2);
    assert_eq!(screen.contents(), "idle: a^C!\n");
}

#[test]
fn test_default_interrupt_marker_and_exit_code() {
    let screen = Screen::with_columns(80);
    let (mut terminal, _future) =
        Terminal::new(Echo::new(), Script::default(), screen.clone(), &instant(), None).unwrap();

    assert_eq!(terminal.write_interrupt_marker().unwrap(), 130);
    assert_eq!(screen.contents(), "^C\n");
}
