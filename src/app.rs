//! Application contract: `init` and `view`.

use crate::{Dispatch, Error, Transition};

/// Application logic handed to [`Runtime::start`](crate::Runtime::start).
///
/// - [`init`](Self::init): produce the initial state and startup effects
/// - [`view`](Self::view): describe the tree for a state, wiring callbacks
///   through the [`Dispatch`] handle
///
/// State transitions themselves are [`Action`](crate::Action)s dispatched from
/// views and effects.
pub trait App<S, T> {
    /// Called once when the runtime starts.
    ///
    /// Failing here (for example a router that cannot resolve the start
    /// location) fails [`Runtime::start`](crate::Runtime::start).
    fn init(&self) -> Result<Transition<S>, Error>;

    /// Describe the tree for `state`.
    ///
    /// Called once at start and once after every transition. The result is
    /// handed to the [`Patch`](crate::Patch) together with the previous tree.
    /// Returning an error ends the cycle; there is no fallback rendering.
    fn view(&self, state: &S, dispatch: &Dispatch<S>) -> Result<T, Error>;
}

/// An [`App`] assembled from an `init` closure and a `view` closure.
///
/// # Example
///
/// ```rust
/// use oxide_flare::{App, FnApp, Transition};
///
/// let app = FnApp::new(
///     || Ok(Transition::new(0_i64)),
///     |count: &i64, _dispatch| Ok(format!("count: {count}")),
/// );
/// assert_eq!(App::<i64, String>::init(&app).unwrap().state, 0);
/// ```
pub struct FnApp<I, V> {
    init: I,
    view: V,
}

impl<I, V> FnApp<I, V> {
    pub fn new<S, T>(init: I, view: V) -> Self
    where
        I: Fn() -> Result<Transition<S>, Error>,
        V: Fn(&S, &Dispatch<S>) -> Result<T, Error>,
    {
        Self { init, view }
    }
}

impl<S, T, I, V> App<S, T> for FnApp<I, V>
where
    I: Fn() -> Result<Transition<S>, Error>,
    V: Fn(&S, &Dispatch<S>) -> Result<T, Error>,
{
    fn init(&self) -> Result<Transition<S>, Error> {
        (self.init)()
    }

    fn view(&self, state: &S, dispatch: &Dispatch<S>) -> Result<T, Error> {
        (self.view)(state, dispatch)
    }
}

impl<S, T, A: App<S, T> + ?Sized> App<S, T> for Box<A> {
    fn init(&self) -> Result<Transition<S>, Error> {
        (**self).init()
    }

    fn view(&self, state: &S, dispatch: &Dispatch<S>) -> Result<T, Error> {
        (**self).view(state, dispatch)
    }
}
