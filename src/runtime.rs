//! The dispatch runtime that ties state, actions, effects, and rendering together.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use flume::Receiver;

use crate::{App, Dispatch, Effect, Error, Message, Patch};

/// A spawner trait for executing futures on an async runtime.
///
/// Effects that need to wait (network calls, timers driven by an executor)
/// hand their continuation to the spawner through [`Dispatch::spawn`].
/// This keeps the runtime free of any particular executor.
///
/// Function pointers and closures automatically implement this trait via the blanket implementation.
pub trait Spawner {
    /// Spawn a future on the async runtime.
    fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>);
}

/// Implement Spawner for any callable type that matches the signature.
///
/// This includes function pointers, closures, and function items.
impl<F> Spawner for F
where
    F: Fn(Pin<Box<dyn Future<Output = ()> + Send>>),
{
    fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>) {
        self(future)
    }
}

/// The dispatch runtime.
///
/// Constructed from an external [`Patch`] and a [`Spawner`];
/// [`start`](Self::start) then runs one application for as long as the host
/// keeps polling it:
/// 1. [`App::init`] produces the initial state and effects
/// 2. the state is rendered through [`App::view`] and patched over `node`
/// 3. the initial effects run in list order
/// 4. every dispatched action replaces the state, re-renders, then runs its
///    effects in list order
///
/// Each started application owns its own state cell and message queue, so
/// several runtimes can run side by side without interfering.
///
/// For testing with manual control, use [`TestRuntime`] with a
/// [`crate::RecordingPatch`].
///
/// # Type Parameters
///
/// * `P` - The reconciler (implements [`Patch`])
/// * `Spawn` - The spawner implementation type (implements [`Spawner`])
pub struct Runtime<P, Spawn> {
    patch: P,
    spawner: Spawn,
}

impl<P, Spawn> Runtime<P, Spawn>
where
    Spawn: Spawner + Send + Sync + 'static,
{
    /// Create a new runtime.
    ///
    /// Nothing happens until [`Runtime::start`] is called.
    ///
    /// # Arguments
    ///
    /// * `patch` - External reconciler applying each new tree over the previous one
    /// * `spawner` - Spawner that executes asynchronous effect work
    pub fn new(patch: P, spawner: Spawn) -> Self {
        Runtime { patch, spawner }
    }

    /// Start the application and process dispatched messages.
    ///
    /// Runs the initial cycle, then applies queued messages one at a time.
    /// Messages can be dispatched from any thread, but transitions are always
    /// applied sequentially where this future is polled.
    ///
    /// A failure during the initial cycle (`init`, the first render, or an
    /// initial effect) is returned. After that the future never completes: a
    /// transition whose view or effect fails skips its remaining effects, the
    /// error is logged, and the next queued message is applied as usual.
    pub async fn start<S, T, A>(self, app: A, node: T) -> Result<(), Error>
    where
        A: App<S, T>,
        P: Patch<T>,
    {
        let mut instance = Instance::boot(app, self.patch, node, Arc::new(self.spawner))?;

        while let Ok(message) = instance.receiver.recv_async().await {
            if let Err(error) = instance.step(message) {
                tracing::error!(error = %error, "dispatch cycle failed");
            }
        }

        Ok(())
    }
}

/// One started application: the single authoritative state and the tree
/// currently on display.
struct Instance<S, T, A, P> {
    app: A,
    patch: P,
    node: T,
    state: S,
    receiver: Receiver<Message<S>>,
    dispatch: Dispatch<S>,
}

impl<S, T, A, P> Instance<S, T, A, P>
where
    A: App<S, T>,
    P: Patch<T>,
{
    fn boot(
        app: A,
        patch: P,
        node: T,
        spawner: Arc<dyn Spawner + Send + Sync>,
    ) -> Result<Self, Error> {
        let (sender, receiver) = flume::unbounded();
        let dispatch = Dispatch::new(sender, spawner);

        let init = app.init()?;
        tracing::debug!(effects = init.effects.len(), "starting application");

        let mut instance = Instance {
            app,
            patch,
            node,
            state: init.state,
            receiver,
            dispatch,
        };

        instance.render()?;
        instance.run_effects(init.effects)?;

        Ok(instance)
    }

    fn step(&mut self, message: Message<S>) -> Result<(), Error> {
        let (action, args) = message.into_parts();
        tracing::debug!(action = action.name(), "dispatching action");

        let transition = action.apply(&self.state, &args);

        // The new state must be in place before any effect can dispatch.
        self.state = transition.state;
        self.render()?;
        self.run_effects(transition.effects)
    }

    fn render(&mut self) -> Result<(), Error> {
        let tree = self.app.view(&self.state, &self.dispatch)?;
        self.node = self.patch.patch(&self.node, tree);
        Ok(())
    }

    fn run_effects(&self, effects: Vec<Effect<S>>) -> Result<(), Error> {
        for effect in effects {
            effect.run(&self.dispatch)?;
        }
        Ok(())
    }

    #[cfg(any(test, feature = "testing"))]
    fn process_queued_messages(&mut self) -> Result<usize, Error> {
        let mut processed = 0;
        while let Ok(message) = self.receiver.try_recv() {
            self.step(message)?;
            processed += 1;
        }
        Ok(processed)
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test spawner function that executes futures synchronously.
///
/// This blocks on the future immediately rather than spawning it on an async runtime.
pub fn test_spawner_fn(fut: Pin<Box<dyn Future<Output = ()> + Send>>) {
    // Execute the future synchronously for deterministic testing
    futures::executor::block_on(fut);
}

#[cfg(any(test, feature = "testing"))]
/// Creates a test spawner that executes futures synchronously.
///
/// This is useful for testing - it blocks on the future immediately rather
/// than spawning it on an async runtime. Use this with [`TestRuntime`]
/// or [`Runtime`] in test scenarios.
///
/// Returns a function pointer that can be passed directly to runtime constructors
/// without heap allocation.
pub fn create_test_spawner() -> fn(Pin<Box<dyn Future<Output = ()> + Send>>) {
    test_spawner_fn
}

#[cfg(any(test, feature = "testing"))]
/// Test runtime driver for manual message processing control.
///
/// Only available with the `testing` feature or during tests.
///
/// Returned by [`TestRuntime::start`]. Dispatched messages stay queued until
/// [`process_messages`](Self::process_messages) is called.
pub struct TestDriver<S, T, A, P> {
    instance: Instance<S, T, A, P>,
}

#[cfg(any(test, feature = "testing"))]
impl<S, T, A, P> TestDriver<S, T, A, P>
where
    A: App<S, T>,
    P: Patch<T>,
{
    /// Process all queued messages.
    ///
    /// This keeps going until the queue is empty, including messages
    /// dispatched by the effects of processed messages. Returns how many
    /// messages were applied.
    pub fn process_messages(&mut self) -> Result<usize, Error> {
        self.instance.process_queued_messages()
    }

    /// The current application state.
    pub fn state(&self) -> &S {
        &self.instance.state
    }

    /// The tree most recently returned by the patch.
    pub fn node(&self) -> &T {
        &self.instance.node
    }

    /// A dispatch handle bound to this application.
    pub fn dispatch(&self) -> Dispatch<S> {
        self.instance.dispatch.clone()
    }

    /// Number of messages waiting to be processed.
    pub fn pending(&self) -> usize {
        self.instance.receiver.len()
    }
}

#[cfg(any(test, feature = "testing"))]
/// Test runtime with manual message processing control.
///
/// Only available with the `testing` feature or during tests.
///
/// Unlike [`Runtime`], this runtime does not process messages as they are
/// dispatched. Tests call
/// [`process_messages`](TestDriver::process_messages) on the returned driver
/// to drain the queue.
///
/// ```rust
/// use oxide_flare::{create_test_spawner, Action, FnApp, RecordingPatch, TestRuntime, Transition};
///
/// let increment = Action::new("increment", |count: &i64, _| Transition::new(count + 1));
/// let app = FnApp::new(
///     || Ok(Transition::new(0_i64)),
///     |count: &i64, _dispatch| Ok(*count),
/// );
///
/// let patch = RecordingPatch::new();
/// let runtime = TestRuntime::new(patch.clone(), create_test_spawner());
/// let mut driver = runtime.start(app, -1).unwrap();
///
/// driver.dispatch().dispatch(&increment, vec![]);
/// driver.process_messages().unwrap();
///
/// assert_eq!(*driver.state(), 1);
/// assert_eq!(patch.last(), Some(1));
/// ```
pub struct TestRuntime<P, Spawn> {
    runtime: Runtime<P, Spawn>,
}

#[cfg(any(test, feature = "testing"))]
impl<P, Spawn> TestRuntime<P, Spawn>
where
    Spawn: Spawner + Send + Sync + 'static,
{
    /// Create a new test runtime.
    ///
    /// # Arguments
    ///
    /// * `patch` - External reconciler applying each new tree over the previous one
    /// * `spawner` - Spawner that executes asynchronous effect work
    pub fn new(patch: P, spawner: Spawn) -> Self {
        TestRuntime {
            runtime: Runtime::new(patch, spawner),
        }
    }

    /// Runs the initial cycle and returns a driver for manual message processing.
    ///
    /// The initial render and the initial effects have completed when this
    /// returns; anything they dispatched is queued on the driver.
    pub fn start<S, T, A>(self, app: A, node: T) -> Result<TestDriver<S, T, A, P>, Error>
    where
        A: App<S, T>,
        P: Patch<T>,
    {
        let Runtime { patch, spawner } = self.runtime;
        let instance = Instance::boot(app, patch, node, Arc::new(spawner))?;
        Ok(TestDriver { instance })
    }
}
