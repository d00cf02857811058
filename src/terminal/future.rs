//! One-shot handoff of a session's outcome to the caller.

use std::sync::mpsc::{self, Receiver, SyncSender};

use log::debug;

use crate::prompt::Status;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Submitted(T),
    Aborted,
}

impl<T> Outcome<T> {
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::Submitted(_) => Status::Submitted,
            Self::Aborted => Status::Aborted,
        }
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Submitted(data) => Some(data),
            Self::Aborted => None,
        }
    }

    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Submitted(data) => Some(data),
            Self::Aborted => None,
        }
    }
}

/// Producer half. Resolving consumes it.
#[derive(Debug)]
pub struct Resolver<T> {
    tx: SyncSender<Outcome<T>>,
}

impl<T> Resolver<T> {
    pub fn resolve(self, outcome: Outcome<T>) {
        debug!("resolving session as {}", outcome.status());
        if self.tx.send(outcome).is_err() {
            debug!("result receiver already dropped");
        }
    }
}

/// Consumer half: the outcome of a session, delivered at most once.
#[derive(Debug)]
pub struct ResultFuture<T> {
    rx: Receiver<Outcome<T>>,
}

impl<T> ResultFuture<T> {
    /// Takes the outcome if it has been delivered.
    #[must_use]
    pub fn try_get(&self) -> Option<Outcome<T>> {
        self.rx.try_recv().ok()
    }

    /// Blocks until the outcome is delivered.
    ///
    /// Returns `None` if the session ended without resolving, which is what a
    /// hard interrupt handled by a custom hook looks like.
    #[must_use]
    pub fn wait(self) -> Option<Outcome<T>> {
        self.rx.recv().ok()
    }
}

#[must_use]
pub fn oneshot<T>() -> (Resolver<T>, ResultFuture<T>) {
    let (tx, rx) = mpsc::sync_channel(1);
    (Resolver { tx }, ResultFuture { rx })
}
