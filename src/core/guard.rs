//! Guard predicates for controlling transitions.
//!
//! A guard decides whether a transition proceeds. Guards see the full
//! callback context, payload included, and may mutate it: whatever a guard
//! changes before vetoing stays changed.

use super::action::{CallbackContext, CallbackError};
use std::fmt;
use std::sync::Arc;

type GuardFn<P> = dyn Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync;

/// Predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use waypoint::core::Guard;
///
/// struct Coins {
///     inserted: u32,
///     max: u32,
/// }
///
/// // Only accept coins while under the limit.
/// let under_limit = Guard::payload(|coins: &Coins| coins.inserted <= coins.max);
/// # let _ = under_limit;
/// ```
pub struct Guard<P> {
    predicate: Arc<GuardFn<P>>,
}

impl<P> Guard<P> {
    /// Create a guard from a fallible predicate over the callback context.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Create a guard from an infallible predicate over the payload.
    ///
    /// Evaluates to `false` while no payload is set.
    pub fn payload<F>(predicate: F) -> Self
    where
        P: 'static,
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        Self::new(move |ctx: &mut CallbackContext<'_, P>| Ok(ctx.payload().is_some_and(&predicate)))
    }

    /// Evaluate the guard.
    pub fn check(&self, ctx: &mut CallbackContext<'_, P>) -> Result<bool, CallbackError> {
        (self.predicate)(ctx)
    }
}

impl<P> Clone for Guard<P> {
    fn clone(&self) -> Self {
        Guard {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<P> fmt::Debug for Guard<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
