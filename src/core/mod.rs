//! Core data model of the engine.
//!
//! This module contains the graph the orchestrator walks:
//! - State and event identifiers, with the reserved ones as enum variants
//! - States and their capability traits
//! - Events, transition events and transitions
//! - The single-use execution token
//! - Guard and action callback handles
//! - The append-only transition log

mod action;
mod event;
mod guard;
mod history;
mod id;
mod state;
mod token;
mod transition;

pub use action::{Action, CallbackContext, CallbackError};
pub use event::{Event, TransitionEvent};
pub use guard::Guard;
pub use history::{TransitionLog, TransitionLogEntry};
pub use id::{is_reserved_name, EventId, StateId};
pub use state::{
    FinalState, InitialState, ParentState, PseudoState, RegularState, State, StateAction, StateKind,
    TransitionalState,
};
pub use token::Token;
pub use transition::{Transition, TransitionMap};
