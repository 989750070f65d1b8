//! Change event types.

use std::path::PathBuf;
use std::sync::mpsc;

/// Kind of filesystem change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was created.
    Created,
    /// File was modified.
    Modified,
    /// File was removed.
    Removed,
}

/// A debounced change to a watched path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Path as reported by the watcher (under one of the watched folders).
    pub path: PathBuf,
    /// Kind of change.
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Receiver for change events.
///
/// Wraps a [`std::sync::mpsc::Receiver`]. Yields `None` once the watcher
/// has shut down.
pub struct ChangeReceiver {
    rx: mpsc::Receiver<ChangeEvent>,
}

impl ChangeReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event (blocking).
    ///
    /// Returns `None` when the sender is dropped.
    #[must_use]
    pub fn recv(&self) -> Option<ChangeEvent> {
        self.rx.recv().ok()
    }

    /// Try to receive an event without blocking.
    #[must_use]
    pub fn try_recv(&self) -> Option<ChangeEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event, then take everything else already queued.
    ///
    /// Returns `None` when the sender is dropped.
    pub fn recv_batch(&self) -> Option<Vec<ChangeEvent>> {
        let first = self.recv()?;
        let mut batch = vec![first];
        batch.extend(std::iter::from_fn(|| self.try_recv()));
        Some(batch)
    }
}

/// Handle to stop watching.
///
/// Dropping the handle stops the watcher: the shutdown sender is dropped,
/// which ends the drain thread and closes the [`ChangeReceiver`].
pub struct WatchHandle {
    _shutdown: Option<mpsc::Sender<()>>,
}

impl WatchHandle {
    pub(crate) fn new(shutdown: mpsc::Sender<()>) -> Self {
        Self {
            _shutdown: Some(shutdown),
        }
    }

    /// Stop watching immediately (consumes the handle).
    pub fn stop(mut self) {
        self._shutdown.take();
    }
}
