//! Checkpoint and resume functionality for state machines.
//!
//! A checkpoint captures where a machine is: its position, graph, queue and
//! config. It does not capture the payload, the transition log, subscribers,
//! the observer or inline closures. Callbacks attached by name come back
//! through [`Checkpoint::restore`]; everything else must be re-attached.

use crate::builder::CallbackRegistry;
use crate::machine::StateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable checkpoint of a state machine.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<P> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// The machine, without payload or callbacks
    pub machine: StateMachine<P>,
}

/// Borrowing twin of [`Checkpoint`] used on the write side.
#[derive(Serialize)]
#[serde(bound = "")]
struct CheckpointRef<'a, P> {
    version: u32,
    id: String,
    timestamp: DateTime<Utc>,
    machine: &'a StateMachine<P>,
}

impl<'a, P> CheckpointRef<'a, P> {
    fn new(machine: &'a StateMachine<P>) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            machine,
        }
    }
}

/// Snapshot `machine` as pretty-printed JSON.
pub fn to_json<P>(machine: &StateMachine<P>) -> Result<String, CheckpointError> {
    let checkpoint = CheckpointRef::new(machine);
    let json = serde_json::to_string_pretty(&checkpoint)
        .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))?;
    debug!(machine = %machine.id(), checkpoint = %checkpoint.id, "checkpoint written");
    Ok(json)
}

/// Snapshot `machine` in the compact binary format.
pub fn to_binary<P>(machine: &StateMachine<P>) -> Result<Vec<u8>, CheckpointError> {
    let checkpoint = CheckpointRef::new(machine);
    let bytes =
        bincode::serialize(&checkpoint).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))?;
    debug!(machine = %machine.id(), checkpoint = %checkpoint.id, "checkpoint written");
    Ok(bytes)
}

impl<P> Checkpoint<P> {
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self =
            serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self =
            bincode::deserialize(bytes).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()
    }

    fn check_version(self) -> Result<Self, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(self)
    }

    /// Re-bind named callbacks from `registry` and hand back the machine.
    ///
    /// The payload is `None` and the transition log is empty.
    pub fn restore(self, registry: &CallbackRegistry<P>) -> Result<StateMachine<P>, CheckpointError> {
        let mut machine = self.machine;
        machine.bind_callbacks(registry)?;
        debug!(machine = %machine.id(), checkpoint = %self.id, "checkpoint restored");
        Ok(machine)
    }
}
