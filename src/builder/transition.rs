//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{
    Action, CallbackContext, CallbackError, Event, EventId, Guard, StateId, Transition, TransitionEvent,
};

/// Builder for a single guarded transition with a fluent API.
///
/// Reserved ids cannot be spelled as strings, so `on("__START__")` names an
/// ordinary custom event, which the machine builder then rejects.
pub struct TransitionBuilder<P> {
    from: Option<StateId>,
    event: Option<EventId>,
    to: Option<StateId>,
    guard: Option<Guard<P>>,
    guard_name: Option<String>,
    action: Option<Action<P>>,
    action_name: Option<String>,
}

impl<P> TransitionBuilder<P> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            event: None,
            to: None,
            guard: None,
            guard_name: None,
            action: None,
            action_name: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: impl Into<StateId>) -> Self {
        self.from = Some(state.into());
        self
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: impl Into<EventId>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<StateId>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard<P>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure over the callback context (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Add a guard by registry name (optional).
    pub fn guard_named(mut self, name: impl Into<String>) -> Self {
        self.guard_name = Some(name.into());
        self
    }

    /// Run `action` while the transition executes, after the source's exit
    /// action (optional).
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.action = Some(Action::new(action));
        self
    }

    /// Add a transition action by registry name (optional).
    pub fn action_named(mut self, name: impl Into<String>) -> Self {
        self.action_name = Some(name.into());
        self
    }

    /// Build the transition and the event the source state will own.
    pub(crate) fn build(self) -> Result<(Transition, TransitionEvent<P>), BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        let mut trigger = Event::new(event.clone());
        if let Some(action) = self.action {
            trigger = trigger.with_action(action);
        }
        if let Some(name) = self.action_name {
            trigger = trigger.with_action_name(name);
        }

        let mut transition_event = TransitionEvent::new(trigger, to.clone());
        if let Some(guard) = self.guard {
            transition_event = transition_event.with_guard(guard);
        }
        if let Some(name) = self.guard_name {
            transition_event = transition_event.with_guard_name(name);
        }

        Ok((Transition::new(from, event, to), transition_event))
    }
}

impl<P> Default for TransitionBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
