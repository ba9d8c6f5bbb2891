//! Path router bridging locations and history navigation into the dispatch loop.
//!
//! A [`Router`] is built from an ordered route table. It contributes to an
//! application in three places:
//!
//! - [`Router::init`] resolves the current location and returns the initial
//!   state plus the effects that install the pop-state listener and run the
//!   matched route's `init` effects
//! - [`Router::fx`] (or the [`Router::go_to`] / [`Router::back`] shortcuts)
//!   provides effects for navigating from any action
//! - [`Router::render`] renders the view of the route matching
//!   `state.location()`
//!
//! # Example
//!
//! ```rust
//! use oxide_flare::router::{Route, RouteInit, Router};
//! use oxide_flare::MemoryPlatform;
//! use serde_json::{json, Value};
//!
//! let platform = MemoryPlatform::new("/users/42");
//! let router: Router<Value, String> = Router::new(
//!     vec![
//!         Route::new("/", |_state: &Value, _dispatch, _params| "home".to_string()),
//!         Route::new("/users/:id", |_state: &Value, _dispatch, params| {
//!             format!("user {}", params.get("id").unwrap_or("?"))
//!         })
//!         .with_init(|params| RouteInit::new(json!({ "user": params.get("id") }))),
//!     ],
//!     platform,
//! )
//! .unwrap();
//!
//! let init = router.init().unwrap();
//! assert_eq!(init.state, json!({ "user": "42", "location": "/users/42" }));
//! ```

mod path;
mod state;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    Action, Dispatch, Effect, EffectHandler, Error, HistoryState, Platform, RouterError,
    Transition,
};

pub use path::{normalize, Params, PathTemplate};
pub use state::RouteState;

type ViewFn<S, T> = dyn Fn(&S, &Dispatch<S>, &Params) -> T + Send + Sync;
type InitFn<S> = dyn Fn(&Params) -> RouteInit<S> + Send + Sync;

/// What a route contributes when it is entered: a state fragment merged
/// into the application state, and effects run immediately.
pub struct RouteInit<S: RouteState> {
    pub fragment: S::Fragment,
    pub effects: Vec<Effect<S>>,
}

impl<S: RouteState> RouteInit<S> {
    pub fn new(fragment: S::Fragment) -> Self {
        Self {
            fragment,
            effects: Vec::new(),
        }
    }

    pub fn with(mut self, effect: Effect<S>) -> Self {
        self.effects.push(effect);
        self
    }
}

impl<S: RouteState> Default for RouteInit<S> {
    fn default() -> Self {
        Self::new(S::Fragment::default())
    }
}

/// A route table entry: a path template, a view, and an optional `init`.
pub struct Route<S: RouteState, T> {
    path: String,
    view: Arc<ViewFn<S, T>>,
    init: Option<Arc<InitFn<S>>>,
}

impl<S: RouteState, T> Route<S, T> {
    pub fn new<V>(path: impl Into<String>, view: V) -> Self
    where
        V: Fn(&S, &Dispatch<S>, &Params) -> T + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            view: Arc::new(view),
            init: None,
        }
    }

    /// Attach the function run whenever this route is entered.
    pub fn with_init<I>(mut self, init: I) -> Self
    where
        I: Fn(&Params) -> RouteInit<S> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(init));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run the route's `init`; routes without one contribute an empty
    /// fragment and no effects.
    pub fn enter(&self, params: &Params) -> RouteInit<S> {
        match &self.init {
            Some(init) => init(params),
            None => RouteInit::default(),
        }
    }

    pub fn view(&self, state: &S, dispatch: &Dispatch<S>, params: &Params) -> T {
        (self.view)(state, dispatch, params)
    }
}

impl<S: RouteState, T> fmt::Debug for Route<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("init", &self.init.is_some())
            .finish()
    }
}

/// The outcome of resolving a location against the route table.
///
/// Computed fresh for every navigation and every render.
pub struct RouteMatch<'r, S: RouteState, T> {
    location: String,
    template: &'r PathTemplate,
    route: &'r Route<S, T>,
    params: Params,
}

impl<'r, S: RouteState, T> RouteMatch<'r, S, T> {
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn template(&self) -> &'r PathTemplate {
        self.template
    }

    pub fn route(&self) -> &'r Route<S, T> {
        self.route
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Navigation effect functions, usable in any action's effect list.
pub struct RouterFx<S> {
    /// `[go_to, path]`: push `path` onto history and enter its route.
    pub go_to: EffectHandler<S>,
    /// `[back]`: ask the host history to go back one entry.
    pub back: EffectHandler<S>,
}

impl<S> Clone for RouterFx<S> {
    fn clone(&self) -> Self {
        Self {
            go_to: self.go_to.clone(),
            back: self.back.clone(),
        }
    }
}

struct Inner<S: RouteState, T> {
    routes: Vec<(PathTemplate, Route<S, T>)>,
    platform: Arc<dyn Platform>,
}

/// A router over a static, ordered route table.
///
/// Cheap to clone; clones share the table and platform.
pub struct Router<S: RouteState, T> {
    inner: Arc<Inner<S, T>>,
}

impl<S: RouteState, T> Clone for Router<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: RouteState, T: 'static> Router<S, T> {
    /// Build a router, parsing every template up front.
    ///
    /// Fails on an empty table or on a malformed template.
    pub fn new<P>(routes: Vec<Route<S, T>>, platform: P) -> Result<Self, RouterError>
    where
        P: Platform + 'static,
    {
        if routes.is_empty() {
            return Err(RouterError::EmptyTable);
        }

        let routes = routes
            .into_iter()
            .map(|route| Ok((PathTemplate::parse(&route.path)?, route)))
            .collect::<Result<Vec<_>, RouterError>>()?;

        Ok(Self {
            inner: Arc::new(Inner {
                routes,
                platform: Arc::new(platform),
            }),
        })
    }

    /// Find the first route whose template matches `location`.
    pub fn resolve(&self, location: &str) -> Result<RouteMatch<'_, S, T>, RouterError> {
        for (template, route) in &self.inner.routes {
            if template.matches(location) {
                tracing::trace!(location, template = %template, "route matched");
                return Ok(RouteMatch {
                    location: location.to_owned(),
                    template,
                    route,
                    params: template.extract(location)?,
                });
            }
        }
        Err(RouterError::NoMatch(location.to_owned()))
    }

    /// Initial state and effects for the host's current location.
    ///
    /// The effects are the pop-state listener installation followed by the
    /// matched route's `init` effects.
    pub fn init(&self) -> Result<Transition<S>, RouterError> {
        let location = self.inner.platform.location();
        let page = self.enter_route(&location)?;
        tracing::debug!(location = %location, "router init");

        let state = S::default().enter(&location, page.fragment);
        let mut effects = Vec::with_capacity(page.effects.len() + 1);
        effects.push(self.listen_handler().with(Vec::new()));
        effects.extend(page.effects);

        Ok(Transition::with_effects(state, effects))
    }

    pub fn fx(&self) -> RouterFx<S> {
        RouterFx {
            go_to: self.go_to_handler(),
            back: self.back_handler(),
        }
    }

    /// `[go_to, path]` ready to return from an action.
    pub fn go_to(&self, path: &str) -> Effect<S> {
        self.go_to_handler().with(vec![Value::from(path)])
    }

    /// `[back]` ready to return from an action.
    pub fn back(&self) -> Effect<S> {
        self.back_handler().with(Vec::new())
    }

    /// Render the view of the route matching `state.location()`.
    pub fn render(&self, state: &S, dispatch: &Dispatch<S>) -> Result<T, RouterError> {
        let matched = self.resolve(state.location())?;
        Ok(matched.route.view(state, dispatch, &matched.params))
    }

    fn enter_route(&self, location: &str) -> Result<RouteInit<S>, RouterError> {
        let matched = self.resolve(location)?;
        Ok(matched.route.enter(&matched.params))
    }

    /// Enter the path in `args`: run the route's `init` effects, then dispatch the
    /// location change. History is only pushed for forward navigation; on
    /// pop-state the host history has already moved.
    fn navigate(&self, args: &[Value], dispatch: &Dispatch<S>, push: bool) -> Result<(), Error> {
        let path = path_arg(args)?;
        let page = self.enter_route(path)?;
        tracing::debug!(location = path, push, effects = page.effects.len(), "navigating");

        if push {
            self.inner
                .platform
                .push_state(HistoryState::new(path), "", path);
        }

        for effect in page.effects {
            effect.run(dispatch)?;
        }

        dispatch.dispatch(
            &set_location::<S>(path, page.fragment),
            vec![Value::from(path)],
        );
        Ok(())
    }

    fn go_to_handler(&self) -> EffectHandler<S> {
        let router = self.clone();
        EffectHandler::new("router/go-to", move |args, dispatch| {
            router.navigate(args, dispatch, true)?;
            Ok(())
        })
    }

    fn back_handler(&self) -> EffectHandler<S> {
        let router = self.clone();
        EffectHandler::new("router/back", move |_args, _dispatch| {
            router.inner.platform.back();
            Ok(())
        })
    }

    fn restore_handler(&self) -> EffectHandler<S> {
        let router = self.clone();
        EffectHandler::new("router/restore", move |args, dispatch| {
            router.navigate(args, dispatch, false)?;
            Ok(())
        })
    }

    fn listen_handler(&self) -> EffectHandler<S> {
        let router = self.clone();
        EffectHandler::new("router/listen", move |_args, dispatch: &Dispatch<S>| {
            let pop_state = pop_state(router.restore_handler());
            let dispatch = dispatch.clone();
            router
                .inner
                .platform
                .on_pop_state(Box::new(move |history: HistoryState| {
                    dispatch.dispatch(&pop_state, vec![Value::from(history.location)]);
                }));
            Ok(())
        })
    }
}

fn path_arg(args: &[Value]) -> Result<&str, RouterError> {
    match args.first() {
        Some(Value::String(path)) => Ok(path),
        Some(other) => Err(RouterError::InvalidPath(other.to_string())),
        None => Err(RouterError::InvalidPath(Value::Null.to_string())),
    }
}

fn set_location<S: RouteState>(location: &str, fragment: S::Fragment) -> Action<S> {
    let location = location.to_owned();
    Action::new("router/set-location", move |state: &S, _args| {
        Transition::new(state.clone().enter(&location, fragment.clone()))
    })
}

/// Keeps the state as is and re-enters the restored location.
fn pop_state<S: RouteState>(restore: EffectHandler<S>) -> Action<S> {
    Action::new("router/pop-state", move |state: &S, args| {
        Transition::new(state.clone()).with(restore.with(args.to_vec()))
    })
}
