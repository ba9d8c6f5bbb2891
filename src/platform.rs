//! Host capabilities: location, history, pop-state events, and timers.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use spin::Mutex;

/// The payload stored with each history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub location: String,
}

impl HistoryState {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

pub type PopStateListener = Box<dyn Fn(HistoryState) + Send + Sync>;
pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// The narrow host interface the router and timer effects depend on.
///
/// A browser host maps these onto `window.location`, `history.pushState`,
/// `history.back`, the `popstate` event and `setTimeout`. Headless hosts
/// and tests use [`MemoryPlatform`].
pub trait Platform: Send + Sync {
    /// The current location path.
    fn location(&self) -> String;

    /// Push a new history entry and make `path` the current location.
    fn push_state(&self, state: HistoryState, title: &str, path: &str);

    /// Navigate one entry back. The host reports the result through the
    /// pop-state listeners.
    fn back(&self);

    /// Register a listener for back/forward navigation.
    fn on_pop_state(&self, listener: PopStateListener);

    /// Run `callback` once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: TimerCallback);
}

impl<P: Platform + ?Sized> Platform for Arc<P> {
    fn location(&self) -> String {
        (**self).location()
    }

    fn push_state(&self, state: HistoryState, title: &str, path: &str) {
        (**self).push_state(state, title, path)
    }

    fn back(&self) {
        (**self).back()
    }

    fn on_pop_state(&self, listener: PopStateListener) {
        (**self).on_pop_state(listener)
    }

    fn set_timeout(&self, delay: Duration, callback: TimerCallback) {
        (**self).set_timeout(delay, callback)
    }
}

struct Entry {
    path: String,
    state: Option<HistoryState>,
}

struct Timer {
    due: Duration,
    seq: u64,
    callback: TimerCallback,
}

struct Inner {
    entries: Vec<Entry>,
    cursor: usize,
    listeners: Vec<Arc<dyn Fn(HistoryState) + Send + Sync>>,
    timers: Vec<Timer>,
    now: Duration,
    next_seq: u64,
}

/// In-memory [`Platform`]: a history stack plus a virtual clock.
///
/// Clones share the same history, listeners and timers. Listeners and
/// timer callbacks are invoked without holding the internal lock, so they
/// may call back into the platform.
///
/// # Example
///
/// ```rust
/// use oxide_flare::{HistoryState, MemoryPlatform, Platform};
///
/// let platform = MemoryPlatform::new("/");
/// platform.push_state(HistoryState::new("/counter"), "", "/counter");
/// assert_eq!(platform.location(), "/counter");
///
/// platform.back();
/// assert_eq!(platform.location(), "/");
/// assert_eq!(platform.entries(), vec!["/", "/counter"]);
/// ```
#[derive(Clone)]
pub struct MemoryPlatform {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryPlatform {
    /// Create a platform whose single history entry is `location`.
    ///
    /// Like a freshly loaded page, that first entry carries no state.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: vec![Entry {
                    path: location.into(),
                    state: None,
                }],
                cursor: 0,
                listeners: Vec::new(),
                timers: Vec::new(),
                now: Duration::ZERO,
                next_seq: 0,
            })),
        }
    }

    /// All history entry paths, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|entry| entry.path.clone())
            .collect()
    }

    /// The state stored with the current entry, if any.
    pub fn current_state(&self) -> Option<HistoryState> {
        let inner = self.inner.lock();
        inner.entries[inner.cursor].state.clone()
    }

    /// Number of registered pop-state listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    /// Navigate one entry forward, if there is one.
    pub fn forward(&self) {
        self.go(1);
    }

    /// Move the history cursor by `delta` entries.
    ///
    /// Out-of-range moves are ignored. A successful move notifies every
    /// pop-state listener with the new entry's state, or with its path when
    /// the entry carries no state.
    pub fn go(&self, delta: isize) {
        let (state, listeners) = {
            let mut inner = self.inner.lock();
            let Some(target) = inner.cursor.checked_add_signed(delta) else {
                return;
            };
            if target >= inner.entries.len() || target == inner.cursor {
                return;
            }
            inner.cursor = target;
            let entry = &inner.entries[target];
            let state = entry
                .state
                .clone()
                .unwrap_or_else(|| HistoryState::new(entry.path.clone()));
            (state, inner.listeners.clone())
        };

        tracing::trace!(location = %state.location, "pop state");
        for listener in listeners {
            listener(state.clone());
        }
    }

    /// Virtual time elapsed so far.
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.inner.lock().timers.len()
    }

    /// Advance the virtual clock, firing every timer that falls due.
    ///
    /// Timers fire in deadline order, ties in scheduling order. Timers
    /// scheduled by a callback fire within the same call if they fall due
    /// before the new time. Returns the number of timers fired.
    pub fn advance(&self, by: Duration) -> usize {
        let until = {
            let inner = self.inner.lock();
            inner.now + by
        };

        let mut fired = 0;
        loop {
            let next = {
                let mut inner = self.inner.lock();
                let due = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due <= until)
                    .min_by_key(|(_, timer)| (timer.due, timer.seq))
                    .map(|(index, _)| index);
                match due {
                    Some(index) => {
                        let timer = inner.timers.swap_remove(index);
                        inner.now = timer.due;
                        Some(timer.callback)
                    }
                    None => {
                        inner.now = until;
                        None
                    }
                }
            };

            match next {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => break,
            }
        }
        fired
    }
}

impl Platform for MemoryPlatform {
    fn location(&self) -> String {
        let inner = self.inner.lock();
        inner.entries[inner.cursor].path.clone()
    }

    fn push_state(&self, state: HistoryState, _title: &str, path: &str) {
        let mut inner = self.inner.lock();
        let keep = inner.cursor + 1;
        inner.entries.truncate(keep);
        inner.entries.push(Entry {
            path: path.to_owned(),
            state: Some(state),
        });
        inner.cursor = keep;
    }

    fn back(&self) {
        self.go(-1);
    }

    fn on_pop_state(&self, listener: PopStateListener) {
        self.inner.lock().listeners.push(Arc::from(listener));
    }

    fn set_timeout(&self, delay: Duration, callback: TimerCallback) {
        let mut inner = self.inner.lock();
        let due = inner.now + delay;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.timers.push(Timer { due, seq, callback });
    }
}
