//! An effects-as-data dispatch runtime for client-side applications, with a
//! path router.
//!
//! A single state value evolves only through [`Action`]s: pure functions
//! `(state, args) -> Transition`. Side effects are described as data
//! ([`Effect`]: a handler reference plus an argument list) and executed by the
//! runtime after the new state is in place. After every transition the view
//! is described again and handed to an external [`Patch`] together with the
//! previous tree.
//!
//! The [`router`] maps locations (including `:param` segments) to page
//! views and page state, and feeds history navigation back into the same
//! action/effect loop through a [`Platform`].
//!
//! ## Example
//!
//! ```rust
//! use oxide_flare::{
//!     create_test_spawner, Action, Dispatch, EffectHandler, FnApp, RecordingPatch,
//!     TestRuntime, Transition,
//! };
//! use serde_json::Value;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Model {
//!     count: i64,
//!     log: Vec<String>,
//! }
//!
//! let record = EffectHandler::new("record", |args: &[Value], dispatch: &Dispatch<Model>| {
//!     let entry = args[0].as_str().unwrap_or_default().to_owned();
//!     let append = Action::new("append", move |model: &Model, _| {
//!         let mut next = model.clone();
//!         next.log.push(entry.clone());
//!         Transition::new(next)
//!     });
//!     dispatch.dispatch(&append, vec![]);
//!     Ok(())
//! });
//!
//! let add = Action::new("add", move |model: &Model, args: &[Value]| {
//!     let by = args[0].as_i64().unwrap_or(0);
//!     let next = Model { count: model.count + by, ..model.clone() };
//!     Transition::new(next).with(record.with(vec![Value::from(format!("added {by}"))]))
//! });
//!
//! let app = FnApp::new(
//!     || Ok(Transition::new(Model { count: 0, log: vec![] })),
//!     |model: &Model, _dispatch: &Dispatch<Model>| Ok(format!("count: {}", model.count)),
//! );
//!
//! let patch = RecordingPatch::new();
//! let mut driver = TestRuntime::new(patch.clone(), create_test_spawner())
//!     .start(app, String::new())
//!     .unwrap();
//!
//! driver.dispatch().dispatch(&add, vec![Value::from(2)]);
//! driver.process_messages().unwrap();
//!
//! assert_eq!(driver.state().count, 2);
//! assert_eq!(driver.state().log, vec!["added 2".to_string()]);
//! assert_eq!(patch.last().as_deref(), Some("count: 2"));
//! ```

mod action;
mod app;
mod dispatch;
mod effect;
mod error;
mod patch;
mod platform;
pub mod router;
mod runtime;
pub mod timer;

pub use action::{Action, Transition};
pub use app::{App, FnApp};
pub use dispatch::{Dispatch, Message};
pub use effect::{Effect, EffectHandler};
pub use error::{Error, RouterError};
pub use patch::Patch;
pub use platform::{HistoryState, MemoryPlatform, Platform, PopStateListener, TimerCallback};
pub use router::{Params, Route, RouteInit, RouteState, Router, RouterFx};
pub use runtime::{Runtime, Spawner};

// Test utilities (only available with 'testing' feature or during tests)
#[cfg(any(test, feature = "testing"))]
pub use patch::RecordingPatch;
#[cfg(any(test, feature = "testing"))]
pub use runtime::{create_test_spawner, TestDriver, TestRuntime};
