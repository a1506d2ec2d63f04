//! Run-time errors raised by the orchestrator.

use crate::builder::BuildError;
use crate::core::{CallbackError, EventId, StateId};
use thiserror::Error;

/// Errors that can occur while driving a machine.
///
/// None of these are recovered internally. A failing `trigger_event`
/// abandons whatever was still queued; side effects already committed by
/// guards and actions stay committed.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Machine not started. Call start() before triggering events")]
    NotStarted,

    #[error("Machine already started")]
    AlreadyStarted,

    #[error("Machine already shut down: current state is final")]
    AlreadyShutdown,

    #[error("State '{state}' does not hold the execution token")]
    TokenMissing { state: StateId },

    #[error("State '{state}' is not part of this machine")]
    UnknownState { state: StateId },

    #[error("Guard for event '{event}' failed: {source}")]
    GuardFailed {
        event: EventId,
        #[source]
        source: CallbackError,
    },

    #[error("Action for event '{event}' failed: {source}")]
    ActionFailed {
        event: EventId,
        #[source]
        source: CallbackError,
    },

    #[error("No region named '{region}'")]
    RegionNotFound { region: String },

    #[error("Region '{region}' does not belong to the current state")]
    RegionNotActive { region: String },

    #[error("Region '{region}' failed: {source}")]
    Region {
        region: String,
        #[source]
        source: Box<MachineError>,
    },

    #[error("Processed {limit} events in one drain without settling")]
    EventLimitExceeded { limit: usize },

    #[error(transparent)]
    Build(#[from] BuildError),
}
