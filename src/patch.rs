//! Reconciler abstraction: `patch(old, new) -> new`.

use std::sync::Arc;

use spin::Mutex;

/// The external reconciler that brings the rendered output in line with a
/// freshly described tree.
///
/// The runtime calls [`patch`](Self::patch) exactly once per state
/// transition and keeps the returned tree as the `old` side of the next
/// call. The runtime never looks inside the trees.
///
/// Closures and function pointers implement this trait via the blanket
/// implementation.
///
/// # Example
///
/// ```rust
/// use oxide_flare::Patch;
///
/// struct ConsolePatch;
///
/// impl Patch<String> for ConsolePatch {
///     fn patch(&mut self, old: &String, new: String) -> String {
///         if *old != new {
///             println!("{new}");
///         }
///         new
///     }
/// }
/// ```
pub trait Patch<T> {
    /// Apply `new` over `old`, returning the tree now on display.
    fn patch(&mut self, old: &T, new: T) -> T;
}

impl<T, F> Patch<T> for F
where
    F: FnMut(&T, T) -> T,
{
    fn patch(&mut self, old: &T, new: T) -> T {
        self(old, new)
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test patch that records every `(old, new)` pair for assertions.
///
/// Only available with the `testing` feature.
///
/// Clones share the same recording, so keep one clone for assertions and
/// hand another to the runtime.
///
/// # Example
///
/// ```rust
/// use oxide_flare::{Patch, RecordingPatch};
///
/// let recording = RecordingPatch::<&str>::new();
/// let mut patch = recording.clone();
///
/// let node = patch.patch(&"root", "first");
/// assert_eq!(node, "first");
///
/// recording.with_patches(|patches| {
///     assert_eq!(patches[0], ("root", "first"));
/// });
/// ```
pub struct RecordingPatch<T> {
    patches: Arc<Mutex<Vec<(T, T)>>>,
}

#[cfg(any(test, feature = "testing"))]
impl<T> Clone for RecordingPatch<T> {
    fn clone(&self) -> Self {
        Self {
            patches: self.patches.clone(),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl<T: Clone> Patch<T> for RecordingPatch<T> {
    fn patch(&mut self, old: &T, new: T) -> T {
        self.patches.lock().push((old.clone(), new.clone()));
        new
    }
}

#[cfg(any(test, feature = "testing"))]
impl<T> Default for RecordingPatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "testing"))]
impl<T> RecordingPatch<T> {
    pub fn new() -> Self {
        Self {
            patches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of patches that have occurred.
    pub fn count(&self) -> usize {
        self.patches.lock().len()
    }

    /// Access the recorded `(old, new)` pairs with a closure.
    ///
    /// Use this to assert on rendered trees or to invoke callbacks captured
    /// in them.
    pub fn with_patches<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Vec<(T, T)>) -> R,
    {
        let patches = self.patches.lock();
        f(&patches)
    }

    /// The most recently patched-in tree.
    pub fn last(&self) -> Option<T>
    where
        T: Clone,
    {
        self.patches.lock().last().map(|(_, new)| new.clone())
    }
}
