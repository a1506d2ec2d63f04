//! Builder for regular states.

use crate::builder::error::BuildError;
use crate::core::{Action, CallbackContext, CallbackError, Event, EventId, State, StateId};
use crate::machine::StateMachine;

/// Builder for a regular state with entry, exit and do actions and,
/// optionally, orthogonal regions.
///
/// # Example
///
/// ```rust
/// use waypoint::builder::StateBuilder;
///
/// let locked = StateBuilder::<u32>::new("locked")
///     .on_entry(|ctx| {
///         if let Some(coins) = ctx.payload_mut() {
///             *coins = 0;
///         }
///         Ok(())
///     })
///     .on_exit_named("log_exit");
/// # let _ = locked;
/// ```
pub struct StateBuilder<P> {
    id: StateId,
    entry: Event<P>,
    exit: Event<P>,
    do_event: Event<P>,
    regions: Vec<(String, StateMachine<P>)>,
}

impl<P> StateBuilder<P> {
    pub fn new(name: impl Into<StateId>) -> Self {
        Self {
            id: name.into(),
            entry: Event::new(EventId::Entry),
            exit: Event::new(EventId::Exit),
            do_event: Event::new(EventId::Do),
            regions: Vec::new(),
        }
    }

    pub fn id(&self) -> &StateId {
        &self.id
    }

    /// Run `action` every time the state is entered.
    pub fn on_entry<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.entry = Event::new(EventId::Entry).with_action(Action::new(action));
        self
    }

    /// Run `action` every time the state is left.
    pub fn on_exit<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.exit = Event::new(EventId::Exit).with_action(Action::new(action));
        self
    }

    /// Run `action` once after every event processed while this state is
    /// current.
    pub fn on_do<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.do_event = Event::new(EventId::Do).with_action(Action::new(action));
        self
    }

    pub fn on_entry_named(mut self, name: impl Into<String>) -> Self {
        self.entry = Event::new(EventId::Entry).with_action_name(name);
        self
    }

    pub fn on_exit_named(mut self, name: impl Into<String>) -> Self {
        self.exit = Event::new(EventId::Exit).with_action_name(name);
        self
    }

    pub fn on_do_named(mut self, name: impl Into<String>) -> Self {
        self.do_event = Event::new(EventId::Do).with_action_name(name);
        self
    }

    /// Install a prebuilt entry event. Fails unless its id is `Entry`.
    pub fn entry_event(mut self, event: Event<P>) -> Result<Self, BuildError> {
        check_slot(EventId::Entry, &event)?;
        self.entry = event;
        Ok(self)
    }

    /// Install a prebuilt exit event. Fails unless its id is `Exit`.
    pub fn exit_event(mut self, event: Event<P>) -> Result<Self, BuildError> {
        check_slot(EventId::Exit, &event)?;
        self.exit = event;
        Ok(self)
    }

    /// Install a prebuilt do event. Fails unless its id is `Do`.
    pub fn do_event(mut self, event: Event<P>) -> Result<Self, BuildError> {
        check_slot(EventId::Do, &event)?;
        self.do_event = event;
        Ok(self)
    }

    /// Attach a child machine as an orthogonal region.
    pub fn region(mut self, name: impl Into<String>, machine: StateMachine<P>) -> Self {
        self.regions.push((name.into(), machine));
        self
    }

    pub(crate) fn build(self) -> Result<State<P>, BuildError> {
        let mut state = State::regular(self.id);
        if let Some(actions) = state.as_action_mut() {
            actions.set_entry(self.entry)?;
            actions.set_exit(self.exit)?;
            actions.set_do(self.do_event)?;
        }
        if let Some(parent) = state.as_parent_mut() {
            for (name, machine) in self.regions {
                parent.add_region(name, machine)?;
            }
        }
        Ok(state)
    }
}

fn check_slot<P>(slot: EventId, event: &Event<P>) -> Result<(), BuildError> {
    if event.id() == &slot {
        Ok(())
    } else {
        Err(BuildError::InvalidEventSlot {
            slot,
            event: event.id().clone(),
        })
    }
}
