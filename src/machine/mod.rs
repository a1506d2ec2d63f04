//! The orchestrator and its extension points.

mod config;
mod engine;
mod error;
mod hooks;
mod region;

pub use config::MachineConfig;
pub use engine::{MachineStatus, StateMachine};
pub use error::MachineError;
pub use hooks::{ActionRunner, GuardEvaluator, MachineObserver, Notification, Phase};
