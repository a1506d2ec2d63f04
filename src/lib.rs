//! Waypoint: a hierarchical, guarded statechart engine.
//!
//! A machine is a graph of states joined by transitions. Driving it means
//! triggering events: each event is queued, then processed in arrival order,
//! and a transition fires when its guards agree. Exit, transition and entry
//! actions run in that order, and the current state's do action runs after
//! every processed event.
//!
//! # Core Concepts
//!
//! - **States**: regular states carry entry, exit and do actions; fork and
//!   join pseudo-states fan out to and back from orthogonal regions
//! - **Token**: a single value marking the current state, moved by every
//!   transition
//! - **Guards and actions**: closures, or names resolved from a
//!   [`builder::CallbackRegistry`], plus machine-wide subscribers
//! - **Transition log**: an ordered record of every executed transition
//! - **Checkpoints**: JSON or binary snapshots without payload or callbacks
//!
//! # Example
//!
//! ```rust
//! use waypoint::builder::{StateBuilder, StateMachineBuilder, TransitionBuilder};
//! use waypoint::core::StateId;
//!
//! #[derive(Default)]
//! struct Gate {
//!     coins: u32,
//!     alarms: u32,
//! }
//!
//! let mut turnstile = StateMachineBuilder::<Gate>::new()
//!     .add_state(StateBuilder::new("locked"))?
//!     .add_state(StateBuilder::new("unlocked"))?
//!     .start_at("locked")?
//!     .transition(
//!         TransitionBuilder::<Gate>::new()
//!             .from("locked")
//!             .on("coin")
//!             .to("unlocked")
//!             .action(|ctx| {
//!                 if let Some(gate) = ctx.payload_mut() {
//!                     gate.coins += 1;
//!                 }
//!                 Ok(())
//!             }),
//!     )?
//!     .transition(
//!         TransitionBuilder::<Gate>::new()
//!             .from("locked")
//!             .on("pass")
//!             .to("locked")
//!             .action(|ctx| {
//!                 if let Some(gate) = ctx.payload_mut() {
//!                     gate.alarms += 1;
//!                 }
//!                 Ok(())
//!             }),
//!     )?
//!     .add_transition("unlocked", "pass", "locked")?
//!     .add_transition("unlocked", "coin", "unlocked")?
//!     .payload(Gate::default())
//!     .build()?;
//!
//! turnstile.start()?;
//! turnstile.trigger_event("coin")?;
//! turnstile.trigger_event("pass")?;
//! turnstile.trigger_event("pass")?;
//!
//! assert_eq!(turnstile.current_state(), Some(&StateId::named("locked")));
//! let gate = turnstile.payload().expect("payload set");
//! assert_eq!((gate.coins, gate.alarms), (1, 1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod machine;

pub use crate::builder::{BuildError, CallbackRegistry, StateBuilder, StateMachineBuilder, TransitionBuilder};
pub use crate::checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{CallbackContext, CallbackError, EventId, StateId};
pub use crate::machine::{MachineConfig, MachineError, MachineStatus, StateMachine};
