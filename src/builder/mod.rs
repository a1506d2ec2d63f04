//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders for states, transitions and whole
//! machines. Structural rules are enforced as the graph is assembled, and
//! whole-graph checks run once in [`StateMachineBuilder::build`].

mod error;
mod machine;
mod registry;
mod state;
mod transition;
mod validation;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use registry::CallbackRegistry;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;

use crate::core::{CallbackContext, CallbackError, StateId};

/// Create a builder for an unconditional transition on a custom event.
///
/// # Example
///
/// ```
/// use waypoint::builder::{simple_transition, StateMachineBuilder};
///
/// let machine = StateMachineBuilder::<()>::new()
///     .state("draft")?
///     .state("published")?
///     .start_at("draft")?
///     .transition(simple_transition("draft", "publish", "published"))?
///     .build()?;
/// # let _ = machine;
/// # Ok::<(), waypoint::builder::BuildError>(())
/// ```
pub fn simple_transition<P>(
    from: impl Into<StateId>,
    event: impl Into<String>,
    to: impl Into<StateId>,
) -> TransitionBuilder<P> {
    TransitionBuilder::new()
        .from(from)
        .on(crate::core::EventId::Custom(event.into()))
        .to(to)
}

/// Create a builder for a transition with a guard predicate.
///
/// # Example
///
/// ```
/// use waypoint::builder::guarded_transition;
///
/// let coin = guarded_transition::<u32, _>("locked", "coin", "unlocked", |ctx| {
///     Ok(ctx.payload().is_some_and(|coins| *coins > 0))
/// });
/// # let _ = coin;
/// ```
pub fn guarded_transition<P, F>(
    from: impl Into<StateId>,
    event: impl Into<String>,
    to: impl Into<StateId>,
    guard: F,
) -> TransitionBuilder<P>
where
    F: Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync + 'static,
{
    simple_transition(from, event, to).when(guard)
}
