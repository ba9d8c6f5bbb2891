//! Timer effects scheduled through the host [`Platform`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde_json::Value;

use crate::{Action, Effect, EffectHandler, Platform};

/// `[delay, ms]`: dispatch `action` once, `delay` from now.
///
/// Frame loops are built by returning another `delay` from the action it
/// schedules. Scheduled timers are not tracked; an action that may arrive
/// after the application moved on has to ignore stale ticks itself.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use oxide_flare::{timer, Action, MemoryPlatform, Transition};
///
/// let platform = Arc::new(MemoryPlatform::new("/"));
/// let tick = Action::new("tick", |frames: &u64, _| Transition::new(frames + 1));
///
/// let effect = timer::delay(platform, Duration::from_millis(150), tick);
/// assert_eq!(effect.args()[0], 150);
/// ```
pub fn delay<S: 'static>(
    platform: Arc<dyn Platform>,
    delay: Duration,
    action: Action<S>,
) -> Effect<S> {
    let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    let handler = EffectHandler::new("timer/delay", move |args, dispatch| {
        let millis = args
            .first()
            .and_then(Value::as_u64)
            .context("delay expects a millisecond count")?;
        let action = action.clone();
        let dispatch = dispatch.clone();
        platform.set_timeout(
            Duration::from_millis(millis),
            Box::new(move || dispatch.dispatch(&action, Vec::new())),
        );
        Ok(())
    });
    handler.with(vec![Value::from(millis)])
}
