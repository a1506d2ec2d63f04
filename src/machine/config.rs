//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Per-machine engine settings. Persisted with the machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Start every region of a composite state as soon as the state's entry
    /// action has run. When false, call `start_region` explicitly.
    pub auto_start_regions: bool,

    /// Upper bound on events processed by a single `start`/`trigger_event`
    /// call. `None` means unbounded.
    pub max_events_per_drain: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            auto_start_regions: true,
            max_events_per_drain: None,
        }
    }
}
