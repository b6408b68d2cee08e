//! Touch input: device access, the capture actor and its handoff to the coordinator.
//!
//! # Modules
//!
//! - `touch`: [`TouchSource`] trait and the evdev implementation
//! - `capture`: Actor turning axis reports into touch samples
//! - `mailbox`: Single-slot overwrite-latest handoff

pub mod capture;
pub mod mailbox;
pub mod touch;

pub use capture::{run_capture, spawn_capture};
pub use mailbox::{mailbox, MailboxClosed, MailboxReceiver, MailboxSender};
pub use touch::{AbsEvent, EvdevTouchSource, TouchSource};
