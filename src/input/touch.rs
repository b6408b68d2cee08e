//! Touch panel event sources.
//!
//! The panel reports absolute multi-touch positions through a Linux evdev node.
//! [`TouchSource`] hides the device so the capture actor can be driven by a
//! scripted source in tests.

use crate::domain::{Result, TagsyncError};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const EV_ABS: u16 = 0x03;
pub const ABS_MT_POSITION_X: u16 = 0x35;
pub const ABS_MT_POSITION_Y: u16 = 0x36;

/// Size of a kernel `input_event`: a `timeval` of two longs, then type, code and value.
///
/// Assumes `long` has the width of `usize`, which holds on the player (32-bit
/// ARM with a 32-bit `time_t`) and on 64-bit Linux. 32-bit targets built with a
/// 64-bit `time_t` use a 16-byte `timeval` and are not supported.
pub const INPUT_EVENT_SIZE: usize = 2 * std::mem::size_of::<usize>() + 8;

/// One absolute-axis report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsEvent {
    pub code: u16,
    pub value: i32,
}

/// Source of absolute-axis events.
pub trait TouchSource: Send {
    /// Waits up to `timeout` for the next event.
    ///
    /// # Errors
    ///
    /// Returns [`TagsyncError::Input`] when the device is gone; the source is
    /// unusable afterwards.
    fn next_event(&mut self, timeout: Duration) -> Result<Option<AbsEvent>>;
}

/// Decodes one raw `input_event` record, keeping only `EV_ABS` reports.
#[must_use]
pub fn decode_event(record: &[u8]) -> Option<AbsEvent> {
    let tail = record.get(INPUT_EVENT_SIZE - 8..INPUT_EVENT_SIZE)?;
    let kind = u16::from_ne_bytes([tail[0], tail[1]]);
    if kind != EV_ABS {
        return None;
    }
    Some(AbsEvent {
        code: u16::from_ne_bytes([tail[2], tail[3]]),
        value: i32::from_ne_bytes([tail[4], tail[5], tail[6], tail[7]]),
    })
}

/// Reads a Linux evdev node.
///
/// Blocking reads happen on a detached reader thread; events reach the caller
/// through a channel so every wait is bounded. The reader thread ends when the
/// device fails or this source is dropped and the next event cannot be delivered.
///
/// The reader thread is not one of the actors and is never joined. After
/// shutdown it stays parked in `read` until the next touch arrives or the
/// process exits and reclaims it.
pub struct EvdevTouchSource {
    device: PathBuf,
    events: Receiver<AbsEvent>,
}

impl EvdevTouchSource {
    /// Opens the device and starts its reader thread.
    ///
    /// # Errors
    ///
    /// Returns [`TagsyncError::Input`] if the node cannot be opened or the
    /// reader thread cannot be spawned.
    pub fn open(device: impl AsRef<Path>) -> Result<Self> {
        let device = device.as_ref().to_path_buf();
        let file = File::open(&device)
            .map_err(|e| TagsyncError::Input(format!("cannot open {}: {e}", device.display())))?;

        let (tx, events) = crossbeam_channel::unbounded();
        let name = device.display().to_string();
        std::thread::Builder::new()
            .name("evdev-reader".to_string())
            .spawn(move || read_events(file, &name, &tx))
            .map_err(|e| TagsyncError::Input(format!("cannot spawn reader: {e}")))?;

        tracing::info!(device = ?device, "touch device opened");
        Ok(Self { device, events })
    }
}

fn read_events(mut file: File, device: &str, tx: &crossbeam_channel::Sender<AbsEvent>) {
    let mut record = [0u8; INPUT_EVENT_SIZE];
    loop {
        if let Err(e) = file.read_exact(&mut record) {
            tracing::error!(device, error = %e, "touch device read failed");
            return;
        }
        if let Some(event) = decode_event(&record) {
            if tx.send(event).is_err() {
                return;
            }
        }
    }
}

impl TouchSource for EvdevTouchSource {
    fn next_event(&mut self, timeout: Duration) -> Result<Option<AbsEvent>> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(TagsyncError::Input(format!(
                "{} stopped delivering events",
                self.device.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(kind: u16, code: u16, value: i32) -> Vec<u8> {
        let mut bytes = vec![0u8; INPUT_EVENT_SIZE - 8];
        bytes.extend_from_slice(&kind.to_ne_bytes());
        bytes.extend_from_slice(&code.to_ne_bytes());
        bytes.extend_from_slice(&value.to_ne_bytes());
        bytes
    }

    #[test]
    fn input_event_matches_the_kernel_layout() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(INPUT_EVENT_SIZE, 24);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(INPUT_EVENT_SIZE, 16);
    }

    #[test]
    fn decodes_absolute_reports_only() {
        assert_eq!(
            decode_event(&record(EV_ABS, ABS_MT_POSITION_Y, 431)),
            Some(AbsEvent {
                code: ABS_MT_POSITION_Y,
                value: 431
            })
        );
        assert_eq!(decode_event(&record(0x01, 0x14a, 1)), None);
        assert_eq!(decode_event(&[0u8; 4]), None);
    }

    #[test]
    fn file_backed_source_replays_then_reports_loss() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&record(EV_ABS, ABS_MT_POSITION_X, 200)).unwrap();
        file.write_all(&record(0x00, 0x00, 0)).unwrap();
        file.write_all(&record(EV_ABS, ABS_MT_POSITION_Y, 450)).unwrap();
        file.flush().unwrap();

        let mut source = EvdevTouchSource::open(file.path()).unwrap();
        let wait = Duration::from_secs(1);
        assert_eq!(source.next_event(wait).unwrap().map(|e| e.value), Some(200));
        assert_eq!(source.next_event(wait).unwrap().map(|e| e.value), Some(450));
        assert!(source.next_event(wait).is_err());
    }

    #[test]
    fn missing_device_is_an_input_error() {
        let err = EvdevTouchSource::open("/nonexistent/event9").err().unwrap();
        assert!(matches!(err, TagsyncError::Input(_)));
    }
}
