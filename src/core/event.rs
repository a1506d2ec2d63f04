//! Events and transition events.

use super::action::Action;
use super::guard::Guard;
use super::id::{EventId, StateId};
use crate::builder::{BuildError, CallbackRegistry};
use serde::{Deserialize, Serialize};

/// An identified stimulus, optionally carrying an action.
///
/// Callbacks attached by name are persisted by name and re-bound from a
/// [`CallbackRegistry`]; inline closures are not persisted.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Event<P> {
    id: EventId,
    #[serde(default)]
    action_name: Option<String>,
    #[serde(skip)]
    action: Option<Action<P>>,
}

impl<P> Event<P> {
    pub fn new(id: impl Into<EventId>) -> Self {
        Self {
            id: id.into(),
            action_name: None,
            action: None,
        }
    }

    pub fn with_action(mut self, action: Action<P>) -> Self {
        self.action = Some(action);
        self
    }

    /// Attach an action by registry name; resolved when the machine is built.
    pub fn with_action_name(mut self, name: impl Into<String>) -> Self {
        self.action_name = Some(name.into());
        self
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn action(&self) -> Option<&Action<P>> {
        self.action.as_ref()
    }

    pub fn action_name(&self) -> Option<&str> {
        self.action_name.as_deref()
    }

    /// Resolve the action name, unless an action is already attached.
    pub(crate) fn bind(&mut self, registry: &CallbackRegistry<P>) -> Result<(), BuildError> {
        if self.action.is_none() {
            if let Some(name) = &self.action_name {
                self.action = Some(registry.action(name)?);
            }
        }
        Ok(())
    }
}

/// An event that moves the machine to a destination state.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionEvent<P> {
    event: Event<P>,
    target: StateId,
    #[serde(default)]
    guard_name: Option<String>,
    #[serde(skip)]
    guard: Option<Guard<P>>,
}

impl<P> TransitionEvent<P> {
    pub fn new(event: Event<P>, target: impl Into<StateId>) -> Self {
        Self {
            event,
            target: target.into(),
            guard_name: None,
            guard: None,
        }
    }

    pub fn with_guard(mut self, guard: Guard<P>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_guard_name(mut self, name: impl Into<String>) -> Self {
        self.guard_name = Some(name.into());
        self
    }

    pub fn id(&self) -> &EventId {
        self.event.id()
    }

    pub fn event(&self) -> &Event<P> {
        &self.event
    }

    pub fn target(&self) -> &StateId {
        &self.target
    }

    pub fn guard(&self) -> Option<&Guard<P>> {
        self.guard.as_ref()
    }

    pub fn guard_name(&self) -> Option<&str> {
        self.guard_name.as_deref()
    }

    /// Registry names this event refers to.
    pub(crate) fn callback_names(&self) -> impl Iterator<Item = &str> {
        self.event.action_name().into_iter().chain(self.guard_name())
    }

    pub(crate) fn bind(&mut self, registry: &CallbackRegistry<P>) -> Result<(), BuildError> {
        self.event.bind(registry)?;
        if self.guard.is_none() {
            if let Some(name) = &self.guard_name {
                self.guard = Some(registry.guard(name)?);
            }
        }
        Ok(())
    }
}
