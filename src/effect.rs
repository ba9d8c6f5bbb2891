//! Effects as data: a handler reference plus an ordered argument list.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{Dispatch, Error};

type EffectFn<S> = dyn Fn(&[Value], &Dispatch<S>) -> anyhow::Result<()> + Send + Sync;

/// A named effect function `(args, dispatch) -> Result`.
///
/// Effect functions may do anything, including scheduling asynchronous work
/// (see [`Dispatch::spawn`]) that later dispatches again.
///
/// # Example
///
/// ```rust
/// use oxide_flare::EffectHandler;
///
/// let log = EffectHandler::<()>::new("log", |args, _dispatch| {
///     println!("{:?}", args);
///     Ok(())
/// });
///
/// let effect = log.with(vec!["hello".into()]);
/// assert_eq!(effect.name(), "log");
/// assert_eq!(effect.args()[0], "hello");
/// ```
pub struct EffectHandler<S> {
    name: &'static str,
    handler: Arc<EffectFn<S>>,
}

impl<S> EffectHandler<S> {
    pub fn new<F>(name: &'static str, handler: F) -> Self
    where
        F: Fn(&[Value], &Dispatch<S>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name,
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build an effect descriptor invoking this handler with `args`.
    pub fn with(&self, args: Vec<Value>) -> Effect<S> {
        Effect {
            handler: self.clone(),
            args,
        }
    }

    /// Call the handler directly.
    pub fn call(&self, args: &[Value], dispatch: &Dispatch<S>) -> anyhow::Result<()> {
        (self.handler)(args, dispatch)
    }
}

impl<S> Clone for EffectHandler<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S> fmt::Debug for EffectHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EffectHandler").field(&self.name).finish()
    }
}

/// Declarative description of a side effect: `[handler, ...args]`.
///
/// Effects are returned from `init` and from actions alongside the next
/// state. The runtime consumes each exactly once, right after the state
/// update that produced it. They are never retried or deduplicated.
pub struct Effect<S> {
    handler: EffectHandler<S>,
    args: Vec<Value>,
}

impl<S> Effect<S> {
    pub fn new(handler: EffectHandler<S>, args: Vec<Value>) -> Self {
        Self { handler, args }
    }

    pub fn name(&self) -> &'static str {
        self.handler.name
    }

    pub fn handler(&self) -> &EffectHandler<S> {
        &self.handler
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Execute the effect, consuming it.
    pub fn run(self, dispatch: &Dispatch<S>) -> Result<(), Error> {
        tracing::trace!(effect = self.name(), args = ?self.args, "running effect");
        self.handler
            .call(&self.args, dispatch)
            .map_err(|source| Error::Effect {
                name: self.handler.name,
                source,
            })
    }
}

impl<S> Clone for Effect<S> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            args: self.args.clone(),
        }
    }
}

impl<S> fmt::Debug for Effect<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("name", &self.handler.name)
            .field("args", &self.args)
            .finish()
    }
}
