//! Input capture actor.
//!
//! Translates raw axis reports into touch samples. An X report only updates the
//! shared X cell; a Y report completes the sample, updates the Y cell and posts
//! the pair to the coordinator's mailbox.

use crate::app::SharedState;
use crate::input::mailbox::MailboxSender;
use crate::input::touch::{TouchSource, ABS_MT_POSITION_X, ABS_MT_POSITION_Y};
use crate::ui::layout::TouchPoint;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Runs the capture loop until exit is requested or the source fails.
///
/// The mailbox sender is dropped on return, which the coordinator sees as a
/// closed mailbox.
pub fn run_capture<S: TouchSource>(
    mut source: S,
    shared: &SharedState,
    mailbox: MailboxSender<TouchPoint>,
    poll: Duration,
) {
    let _span = tracing::debug_span!("input_capture").entered();

    while !shared.exit_requested() {
        let event = match source.next_event(poll) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::error!(error = %e, "touch input lost");
                break;
            }
        };

        let value = u32::try_from(event.value).unwrap_or(0);
        match event.code {
            ABS_MT_POSITION_X => shared.set_touch_x(value),
            ABS_MT_POSITION_Y => {
                shared.set_touch_y(value);
                let point = TouchPoint {
                    x: shared.touch_x(),
                    y: value,
                };
                tracing::trace!(x = point.x, y = point.y, "touch");
                mailbox.post(point);
            }
            _ => {}
        }
    }

    tracing::debug!("input capture stopped");
    drop(mailbox);
}

/// Spawns [`run_capture`] on a named thread.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_capture<S: TouchSource + 'static>(
    source: S,
    shared: Arc<SharedState>,
    mailbox: MailboxSender<TouchPoint>,
    poll: Duration,
) -> std::io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("input".to_string())
        .spawn(move || run_capture(source, &shared, mailbox, poll))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Result, TagsyncError};
    use crate::input::mailbox::{mailbox, MailboxClosed};
    use crate::input::touch::AbsEvent;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<AbsEvent>);

    impl TouchSource for Scripted {
        fn next_event(&mut self, _timeout: Duration) -> Result<Option<AbsEvent>> {
            self.0
                .pop_front()
                .map(Some)
                .ok_or_else(|| TagsyncError::Input("script finished".to_string()))
        }
    }

    fn abs(code: u16, value: i32) -> AbsEvent {
        AbsEvent { code, value }
    }

    #[test]
    fn y_report_completes_a_sample() {
        let shared = SharedState::new();
        let (tx, rx) = mailbox();
        let source = Scripted(VecDeque::from([
            abs(ABS_MT_POSITION_X, 200),
            abs(0x30, 5),
            abs(ABS_MT_POSITION_Y, 150),
        ]));

        run_capture(source, &shared, tx, Duration::from_millis(1));

        assert_eq!(shared.touch_x(), 200);
        assert_eq!(shared.touch_y(), 150);
        let wait = Duration::from_millis(10);
        assert_eq!(rx.wait(wait), Ok(Some(TouchPoint { x: 200, y: 150 })));
        assert_eq!(rx.wait(wait), Err(MailboxClosed));
    }

    #[test]
    fn x_alone_posts_nothing() {
        let shared = SharedState::new();
        let (tx, rx) = mailbox();
        run_capture(
            Scripted(VecDeque::from([abs(ABS_MT_POSITION_X, 42)])),
            &shared,
            tx,
            Duration::from_millis(1),
        );
        assert_eq!(rx.wait(Duration::from_millis(10)), Err(MailboxClosed));
    }

    #[test]
    fn stops_when_exit_requested() {
        let shared = SharedState::new();
        shared.request_exit();
        let (tx, rx) = mailbox();
        run_capture(
            Scripted(VecDeque::from([abs(ABS_MT_POSITION_Y, 1)])),
            &shared,
            tx,
            Duration::from_millis(1),
        );
        assert_eq!(rx.wait(Duration::from_millis(10)), Err(MailboxClosed));
    }
}
