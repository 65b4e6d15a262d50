//! Terminal input and frame pacing in one background task.
//!
//! A single frame clock drives redraws; every `frames_per_tick`-th frame
//! also advances animations (throbbers), so both stay in lockstep.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// Time to redraw. `animate` is set on frames that also step spinners.
    Frame { animate: bool },
}

/// Whether frame number `frame` (counted from zero) advances animations.
fn animates(frame: u64, frames_per_tick: u64) -> bool {
    frame % frames_per_tick.max(1) == 0
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new(frame_rate: Duration, frames_per_tick: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, cancel.clone(), frame_rate, frames_per_tick));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    frame_rate: Duration,
    frames_per_tick: u64,
) {
    let mut input = EventStream::new();
    let mut clock = tokio::time::interval(frame_rate);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame: u64 = 0;

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,

            _ = clock.tick() => {
                let animate = animates(frame, frames_per_tick);
                frame = frame.wrapping_add(1);
                Event::Frame { animate }
            }

            Some(Ok(raw)) = input.next() => match raw {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                _ => continue,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}
