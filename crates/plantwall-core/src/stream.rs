// ── Reactive panel streams ──
//
// Subscription types for consuming panel state changes outside the
// owning frontend loop (e.g. `plantwall status --watch`).

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::panel::{PanelKind, PanelState};

/// A subscription to one panel's state: change notification via
/// `changed()`, or a `Stream` through `into_stream()`.
pub struct PanelStream<K: PanelKind> {
    receiver: watch::Receiver<PanelState<K>>,
}

impl<K: PanelKind> PanelStream<K> {
    pub(crate) fn new(receiver: watch::Receiver<PanelState<K>>) -> Self {
        Self { receiver }
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the panel itself has been dropped.
    pub async fn changed(&mut self) -> Option<PanelState<K>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> PanelWatchStream<K> {
        PanelWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current snapshot first, then one per state change.
pub struct PanelWatchStream<K: PanelKind> {
    inner: WatchStream<PanelState<K>>,
}

impl<K: PanelKind> Stream for PanelWatchStream<K> {
    type Item = PanelState<K>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
