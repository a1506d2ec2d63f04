//! Extension points: guard evaluators, action runners and the observer.
//!
//! Guard evaluators and action runners are ordered subscriber lists invoked
//! for every event the engine processes, lifecycle events included. Guard
//! semantics are conjunctive: the first `false` vetoes and the remaining
//! evaluators are skipped. Action runners all run, in registration order.

use crate::core::{CallbackContext, CallbackError, EventId, StateId, Transition};

/// Subscriber consulted before every transition.
pub trait GuardEvaluator<P>: Send + Sync {
    fn evaluate(&self, ctx: &mut CallbackContext<'_, P>) -> Result<bool, CallbackError>;
}

impl<P, F> GuardEvaluator<P> for F
where
    F: Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync,
{
    fn evaluate(&self, ctx: &mut CallbackContext<'_, P>) -> Result<bool, CallbackError> {
        self(ctx)
    }
}

/// Subscriber run for every entry, exit, do and transition step.
pub trait ActionRunner<P>: Send + Sync {
    fn run(&self, ctx: &mut CallbackContext<'_, P>) -> Result<(), CallbackError>;
}

impl<P, F> ActionRunner<P> for F
where
    F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync,
{
    fn run(&self, ctx: &mut CallbackContext<'_, P>) -> Result<(), CallbackError> {
        self(ctx)
    }
}

/// Point of the algorithm an observer is notified about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// An event was dequeued.
    Process,
    Exit,
    /// Between source and destination; the machine has no current state.
    Transition,
    Entry,
    Do,
}

/// What an observer is told. Purely informational.
#[derive(Clone, Copy, Debug)]
pub struct Notification<'a> {
    pub phase: Phase,
    pub machine_id: &'a str,
    pub state: Option<&'a StateId>,
    pub event: &'a EventId,
    pub transition: Option<&'a Transition>,
}

/// External listener. Notifications never affect control flow.
pub trait MachineObserver: Send + Sync {
    fn notify(&self, notification: &Notification<'_>);
}

impl<F> MachineObserver for F
where
    F: Fn(&Notification<'_>) + Send + Sync,
{
    fn notify(&self, notification: &Notification<'_>) {
        self(notification)
    }
}
