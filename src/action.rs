//! Actions: pure state transitions referenced by name.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{Effect, Message};

type ActionFn<S> = dyn Fn(&S, &[Value]) -> Transition<S> + Send + Sync;

/// The result of an action or of `init`: the next state and the effects to
/// run once that state is in place.
///
/// # Example
///
/// ```rust
/// use oxide_flare::Transition;
///
/// let transition = Transition::new(41 + 1);
/// assert_eq!(transition.state, 42);
/// assert!(transition.effects.is_empty());
/// ```
pub struct Transition<S> {
    pub state: S,
    pub effects: Vec<Effect<S>>,
}

impl<S> Transition<S> {
    /// A transition with no effects.
    pub fn new(state: S) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    pub fn with_effects(state: S, effects: Vec<Effect<S>>) -> Self {
        Self { state, effects }
    }

    /// Append an effect, keeping list order.
    pub fn with(mut self, effect: Effect<S>) -> Self {
        self.effects.push(effect);
        self
    }
}

impl<S> From<S> for Transition<S> {
    fn from(state: S) -> Self {
        Self::new(state)
    }
}

impl<S> From<(S, Vec<Effect<S>>)> for Transition<S> {
    fn from((state, effects): (S, Vec<Effect<S>>)) -> Self {
        Self::with_effects(state, effects)
    }
}

impl<S: fmt::Debug> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("state", &self.state)
            .field("effects", &self.effects)
            .finish()
    }
}

/// A named reference to a state transition `(state, args) -> Transition`.
///
/// The same state and arguments must always produce the same next state.
/// Side effects belong in the returned [`Effect`] list, never in the action
/// itself.
///
/// # Example
///
/// ```rust
/// use oxide_flare::{Action, Transition};
/// use serde_json::Value;
///
/// let add = Action::new("add", |count: &i64, args| {
///     let by = args.first().and_then(|v| v.as_i64()).unwrap_or(1);
///     Transition::new(count + by)
/// });
///
/// let next = add.apply(&1, &[Value::from(5)]);
/// assert_eq!(next.state, 6);
/// ```
pub struct Action<S> {
    name: &'static str,
    handler: Arc<ActionFn<S>>,
}

impl<S> Action<S> {
    pub fn new<F>(name: &'static str, handler: F) -> Self
    where
        F: Fn(&S, &[Value]) -> Transition<S> + Send + Sync + 'static,
    {
        Self {
            name,
            handler: Arc::new(handler),
        }
    }

    /// The name used when logging dispatches.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the transition against `state`.
    pub fn apply(&self, state: &S, args: &[Value]) -> Transition<S> {
        (self.handler)(state, args)
    }

    /// Pair this action with its arguments, ready for dispatch.
    pub fn with(&self, args: Vec<Value>) -> Message<S> {
        Message::new(self.clone(), args)
    }
}

impl<S> Clone for Action<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S> fmt::Debug for Action<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}
