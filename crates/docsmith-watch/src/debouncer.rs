//! Event debouncing.
//!
//! Editors often emit several events per save (truncate, write, rename).
//! The debouncer folds events per path and releases each path once it has
//! been quiet for the debounce window.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::event::{ChangeEvent, ChangeKind};

struct PendingEvent {
    kind: ChangeKind,
    deadline: Instant,
}

/// Thread-safe per-path event debouncer.
pub(crate) struct EventDebouncer {
    pending: Mutex<HashMap<PathBuf, PendingEvent>>,
    window: Duration,
}

impl EventDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// Record an event, folding it into any pending event for the same path.
    ///
    /// Callable from watcher callbacks on any thread.
    pub fn record(&self, path: PathBuf, kind: ChangeKind) {
        use std::collections::hash_map::Entry;

        let mut pending = self.lock();
        let deadline = Instant::now() + self.window;

        match pending.entry(path) {
            Entry::Vacant(entry) => {
                entry.insert(PendingEvent { kind, deadline });
            }
            Entry::Occupied(mut entry) => match coalesce(entry.get().kind, kind) {
                Some(kind) => {
                    let event = entry.get_mut();
                    event.kind = kind;
                    event.deadline = deadline;
                }
                // Created then removed: the file never existed for us.
                None => {
                    entry.remove();
                }
            },
        }
    }

    /// Take every event whose quiet window has elapsed, sorted by path.
    pub fn drain_ready(&self) -> Vec<ChangeEvent> {
        let now = Instant::now();
        let mut ready: Vec<ChangeEvent> = self
            .lock()
            .extract_if(|_, event| event.deadline <= now)
            .map(|(path, event)| ChangeEvent {
                path,
                kind: event.kind,
            })
            .collect();
        ready.sort_by(|a, b| a.path.cmp(&b.path));
        ready
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, PendingEvent>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fold a new event kind into a pending one.
///
/// Returns `None` when both should be discarded.
#[allow(clippy::match_same_arms)]
fn coalesce(existing: ChangeKind, new: ChangeKind) -> Option<ChangeKind> {
    use ChangeKind::{Created, Modified, Removed};

    match (existing, new) {
        (Created, Created) => Some(Created),
        (Created, Modified) => Some(Created),
        (Created, Removed) => None,

        (Modified, Created) => Some(Created),
        (Modified, Modified) => Some(Modified),
        (Modified, Removed) => Some(Removed),

        (Removed, Created) => Some(Modified),
        (Removed, Modified) => Some(Removed),
        (Removed, Removed) => Some(Removed),
    }
}
