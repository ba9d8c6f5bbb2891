//! Error types for the runtime and router.

use thiserror::Error;

/// Failures that end a dispatch cycle.
///
/// The first failure aborts the remaining effects of the transition.
/// During boot it is returned from [`Runtime::start`](crate::Runtime::start);
/// afterwards the runtime logs it and moves on to the next message.
///
/// `Error::Router` only comes from router `init` and `render`. A failed
/// navigation (`go_to` to an unknown path, a pop-state to a location that no
/// longer resolves) runs inside an effect, so it arrives as `Error::Effect`
/// whose source downcasts to `Error::Router`:
///
/// ```rust
/// use oxide_flare::{Error, RouterError};
///
/// fn navigation_failure(error: &Error) -> Option<&RouterError> {
///     match error {
///         Error::Effect { source, .. } => match source.downcast_ref::<Error>() {
///             Some(Error::Router(router)) => Some(router),
///             _ => None,
///         },
///         Error::Router(router) => Some(router),
///         Error::Other(_) => None,
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    #[error("effect `{name}` failed: {source}")]
    Effect {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Router configuration errors.
///
/// These are programming errors in the route table or in the locations the
/// host navigates to, not conditions to degrade from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("route table is empty")]
    EmptyTable,

    #[error("invalid path template `{template}`: {reason}")]
    InvalidTemplate {
        template: String,
        reason: &'static str,
    },

    #[error("no route matches location `{0}`")]
    NoMatch(String),

    #[error("location `{location}` does not fit template `{template}`")]
    SegmentMismatch { template: String, location: String },

    #[error("expected a path string argument, got `{0}`")]
    InvalidPath(String),
}
