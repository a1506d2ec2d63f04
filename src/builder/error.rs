//! Build errors for machine, state and transition builders.

use crate::core::{EventId, StateId};
use thiserror::Error;

/// Errors that can occur when assembling a state graph.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("State '{state}' does not exist. Add it before referencing it")]
    StateNotFound { state: StateId },

    #[error("State '{state}' already exists")]
    DuplicateState { state: StateId },

    #[error("State '{state}' already has a transition for event '{event}'")]
    DuplicateEvent { state: StateId, event: EventId },

    #[error("State '{state}' already has a region named '{region}'")]
    DuplicateRegion { state: StateId, region: String },

    #[error("The {slot} slot cannot hold event '{event}'")]
    InvalidEventSlot { slot: EventId, event: EventId },

    #[error("Callback '{name}' is not registered")]
    ActionNotCallable { name: String },

    #[error("'{name}' is reserved for the engine")]
    ReservedName { name: String },

    #[error("Start state not specified. Call .start_at(state) before .build()")]
    MissingStartState,

    #[error("Pseudo-state '{state}' has no completion transition. Call .completion(state, target)")]
    MissingCompletion { state: StateId },

    #[error("State '{state}' cannot leave on event '{event}'")]
    InvalidSource { state: StateId, event: EventId },

    #[error("State '{state}' cannot be a transition target")]
    InvalidTarget { state: StateId },

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition event not specified. Call .on(event)")]
    MissingEvent,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("{} build errors, see the list for details", .0.len())]
    Multiple(Vec<BuildError>),
}
