//! Application state the router can read and update.

use serde_json::{Map, Value};

/// Application state that can be driven by a [`Router`](super::Router).
///
/// The router only needs to read the current location and to enter a new
/// location with the state fragment produced by the matched route's `init`.
pub trait RouteState: Clone + Default + Send + 'static {
    /// The state produced by a route's `init`.
    type Fragment: Clone + Default + Send + Sync + 'static;

    /// The location currently displayed.
    fn location(&self) -> &str;

    /// Merge `fragment` into the state and record `location`.
    fn enter(self, location: &str, fragment: Self::Fragment) -> Self;
}

/// JSON object state, merged key by key like `{ ...state, ...fragment, location }`.
///
/// A missing or non-string `location` reads as the empty path, which the
/// router treats as the root. Non-object fragments contribute nothing.
impl RouteState for Value {
    type Fragment = Value;

    fn location(&self) -> &str {
        self.get("location").and_then(Value::as_str).unwrap_or("")
    }

    fn enter(self, location: &str, fragment: Value) -> Self {
        let mut object = match self {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        if let Value::Object(fragment) = fragment {
            object.extend(fragment);
        }
        object.insert("location".to_owned(), Value::from(location));
        Value::Object(object)
    }
}
