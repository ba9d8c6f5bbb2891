//! Dispatch handle for embedding callbacks in views and effects.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use flume::Sender;
use serde_json::Value;

use crate::{Action, Spawner};

/// A dispatch message: `[action, ...args]`.
///
/// Messages live only until the runtime applies them.
pub struct Message<S> {
    action: Action<S>,
    args: Vec<Value>,
}

impl<S> Message<S> {
    pub fn new(action: Action<S>, args: Vec<Value>) -> Self {
        Self { action, args }
    }

    pub fn action(&self) -> &Action<S> {
        &self.action
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub(crate) fn into_parts(self) -> (Action<S>, Vec<Value>) {
        (self.action, self.args)
    }
}

impl<S> fmt::Debug for Message<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("action", &self.action.name())
            .field("args", &self.args)
            .finish()
    }
}

/// Handle for submitting actions to the runtime that created it.
///
/// Clone this handle into view callbacks, effect continuations, or history
/// listeners. Dispatching only enqueues the message; the runtime applies
/// queued messages one at a time, so transitions never overlap.
///
/// # Example
///
/// ```rust
/// use oxide_flare::{Action, Dispatch, Transition};
///
/// struct Props {
///     count: i64,
///     on_click: Box<dyn Fn()>,
/// }
///
/// fn view(count: &i64, dispatch: &Dispatch<i64>) -> Props {
///     let increment = Action::new("increment", |count: &i64, _| Transition::new(count + 1));
///     let dispatch = dispatch.clone();
///     Props {
///         count: *count,
///         on_click: Box::new(move || dispatch.dispatch(&increment, vec![])),
///     }
/// }
/// ```
pub struct Dispatch<S> {
    sender: Sender<Message<S>>,
    spawner: Arc<dyn Spawner + Send + Sync>,
}

impl<S> Clone for Dispatch<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            spawner: Arc::clone(&self.spawner),
        }
    }
}

impl<S> Dispatch<S> {
    pub(crate) fn new(sender: Sender<Message<S>>, spawner: Arc<dyn Spawner + Send + Sync>) -> Self {
        Self { sender, spawner }
    }

    /// Dispatch `action` with `args`.
    pub fn dispatch(&self, action: &Action<S>, args: Vec<Value>) {
        self.send(action.with(args));
    }

    /// Enqueue a prepared message.
    ///
    /// A runtime that has already stopped silently drops the message; late
    /// effect completions are not an error.
    pub fn send(&self, message: Message<S>) {
        if let Err(flume::SendError(message)) = self.sender.send(message) {
            tracing::warn!(
                action = message.action().name(),
                "runtime stopped, dropping message"
            );
        }
    }

    /// Run asynchronous effect work on the runtime's spawner.
    ///
    /// The future is expected to dispatch its outcome through a clone of this
    /// handle once it completes.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.spawner.spawn(Box::pin(future));
    }
}
