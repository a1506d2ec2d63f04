//! Action callbacks and the context handed to every callback.

use super::id::{EventId, StateId};
use super::transition::Transition;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Error type returned by guard and action callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// View of the machine passed to guards, actions and runners.
///
/// The payload is the caller's own context object. It is mutable from every
/// callback, guards included, and the engine never looks inside it.
///
/// Events raised through [`queue_event`](Self::queue_event) or
/// [`trigger_event`](Self::trigger_event) go onto the machine's FIFO queue
/// and run after the current step, before the outer `trigger_event` returns.
pub struct CallbackContext<'a, P> {
    machine_id: &'a str,
    event: &'a EventId,
    current: Option<&'a StateId>,
    previous: Option<&'a StateId>,
    transition: Option<&'a Transition>,
    payload: Option<&'a mut P>,
    queue: &'a mut VecDeque<EventId>,
}

impl<'a, P> CallbackContext<'a, P> {
    pub(crate) fn new(
        machine_id: &'a str,
        event: &'a EventId,
        current: Option<&'a StateId>,
        previous: Option<&'a StateId>,
        transition: Option<&'a Transition>,
        payload: Option<&'a mut P>,
        queue: &'a mut VecDeque<EventId>,
    ) -> Self {
        Self {
            machine_id,
            event,
            current,
            previous,
            transition,
            payload,
            queue,
        }
    }

    pub fn machine_id(&self) -> &str {
        self.machine_id
    }

    /// The event being processed: a custom transition event, `Start`, or one
    /// of the `Entry`/`Exit`/`Do` lifecycle events.
    pub fn event(&self) -> &EventId {
        self.event
    }

    /// Current state. `None` while the machine is between source and
    /// destination of a transition.
    pub fn current_state(&self) -> Option<&StateId> {
        self.current
    }

    pub fn previous_state(&self) -> Option<&StateId> {
        self.previous
    }

    /// The transition being executed, if this callback is part of one.
    pub fn transition(&self) -> Option<&Transition> {
        self.transition
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_deref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut P> {
        self.payload.as_deref_mut()
    }

    /// Schedule a follow-up event on the owning machine.
    pub fn queue_event(&mut self, event: impl Into<String>) {
        self.queue.push_back(EventId::Custom(event.into()));
    }

    /// Same as [`queue_event`](Self::queue_event). Triggering from inside a
    /// callback never recurses into the engine.
    pub fn trigger_event(&mut self, event: impl Into<String>) {
        self.queue_event(event);
    }
}

type ActionFn<P> = dyn Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync;

/// Side-effecting callback attached to an entry, exit, do or transition event.
pub struct Action<P> {
    callback: Arc<ActionFn<P>>,
}

impl<P> Action<P> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    pub fn run(&self, ctx: &mut CallbackContext<'_, P>) -> Result<(), CallbackError> {
        (self.callback)(ctx)
    }
}

impl<P> Clone for Action<P> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<P> fmt::Debug for Action<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}
