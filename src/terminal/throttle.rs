//! Trailing-edge rate limiting for screen writes.

use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

use log::trace;

/// Wraps a writer so that at most one payload is written per `interval`.
///
/// Only the most recent payload is kept: scheduling replaces anything still
/// pending, so a stale frame is never written after a newer one.
#[derive(Debug)]
pub struct Throttled<W> {
    inner: W,
    interval: Duration,
    pending: Option<String>,
    last_flush: Option<Instant>,
}

impl<W: Write> Throttled<W> {
    #[must_use]
    pub fn new(inner: W, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            pending: None,
            last_flush: None,
        }
    }

    /// Replaces the pending payload.
    pub fn schedule(&mut self, payload: String) {
        if self.pending.replace(payload).is_some() {
            trace!("coalesced pending frame");
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time until the pending payload may be written, `None` if nothing is pending.
    #[must_use]
    pub fn delay(&self, now: Instant) -> Option<Duration> {
        self.pending.as_ref()?;
        let Some(last) = self.last_flush else {
            return Some(Duration::ZERO);
        };
        let due = last.checked_add(self.interval).unwrap_or(last);
        Some(due.saturating_duration_since(now))
    }

    /// Writes the pending payload if the interval has elapsed.
    ///
    /// Returns true if something was written.
    pub fn poll(&mut self, now: Instant) -> io::Result<bool> {
        match self.delay(now) {
            Some(delay) if delay.is_zero() => self.write_pending(now),
            _ => Ok(false),
        }
    }

    /// Writes the pending payload immediately.
    ///
    /// Returns true if something was written.
    pub fn flush(&mut self) -> io::Result<bool> {
        self.write_pending(Instant::now())
    }

    fn write_pending(&mut self, now: Instant) -> io::Result<bool> {
        let Some(payload) = self.pending.take() else {
            return Ok(false);
        };
        trace!("flushing {} bytes", payload.len());
        self.inner.write_all(payload.as_bytes())?;
        self.inner.flush()?;
        self.last_flush = Some(now);
        Ok(true)
    }

    /// Writes `bytes` right away, after any pending payload.
    pub fn write_through(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.flush()?;
        self.inner.write_all(bytes)?;
        self.inner.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }
}
