//! Single-slot, overwrite-latest mailbox.
//!
//! The input actor posts complete touch samples; the coordinator takes them
//! with a timed wait. An unconsumed sample is replaced by a newer one, so the
//! coordinator only ever sees the latest touch and sees it exactly once.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use std::time::Duration;
use thiserror::Error;

/// Every sender has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("mailbox closed: the producer has gone away")]
pub struct MailboxClosed;

/// Creates a connected sender/receiver pair.
#[must_use]
pub fn mailbox<T>() -> (MailboxSender<T>, MailboxReceiver<T>) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    (
        MailboxSender {
            tx,
            evict: rx.clone(),
        },
        MailboxReceiver { rx },
    )
}

/// Producer half. Dropping it closes the mailbox.
#[derive(Debug)]
pub struct MailboxSender<T> {
    tx: Sender<T>,
    evict: Receiver<T>,
}

impl<T> MailboxSender<T> {
    /// Stores `value`, replacing any sample the consumer has not taken yet.
    pub fn post(&self, value: T) {
        let mut value = value;
        loop {
            match self.tx.try_send(value) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(rejected)) => {
                    if self.evict.try_recv().is_ok() {
                        tracing::trace!("replaced unconsumed sample");
                    }
                    value = rejected;
                }
            }
        }
    }
}

/// Consumer half.
#[derive(Debug)]
pub struct MailboxReceiver<T> {
    rx: Receiver<T>,
}

impl<T> MailboxReceiver<T> {
    /// Waits up to `timeout` for a sample.
    ///
    /// # Errors
    ///
    /// Returns [`MailboxClosed`] once the sender is gone and the slot is empty.
    pub fn wait(&self, timeout: Duration) -> Result<Option<T>, MailboxClosed> {
        match self.rx.recv_timeout(timeout) {
            Ok(value) => Ok(Some(value)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(MailboxClosed),
        }
    }

    /// Discards a pending sample. Returns how many were dropped.
    pub fn drain(&self) -> usize {
        self.rx.try_iter().count()
    }
}
