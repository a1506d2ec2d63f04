//! State and event identifiers.
//!
//! Engine-driven identifiers (the initial/final pseudo-states and the
//! start/entry/exit/do/completion events) are closed enum variants. Caller
//! supplied names always land in the `Named`/`Custom` variants, so a user
//! event can never be mistaken for a lifecycle event.
//!
//! Both identifier types serialize as plain strings, which keeps them usable
//! as JSON map keys.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const INITIAL: &str = "__INITIAL__";
const FINAL: &str = "__FINAL__";
const START: &str = "__START__";
const ENTRY: &str = "__ENTRY__";
const EXIT: &str = "__EXIT__";
const DO: &str = "__DO__";
const COMPLETION: &str = "__COMPLETE__";

/// Returns true if `name` uses the `__NAME__` spelling reserved for the engine.
pub fn is_reserved_name(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Identifier of a state within one machine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StateId {
    /// The pseudo-state every machine starts from.
    Initial,
    /// The terminal pseudo-state.
    Final,
    /// A caller-declared state.
    Named(String),
}

impl StateId {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Initial => INITIAL,
            Self::Final => FINAL,
            Self::Named(name) => name,
        }
    }

    /// True for the initial and final pseudo-states.
    pub fn is_reserved(&self) -> bool {
        !matches!(self, Self::Named(_))
    }

    fn parse(raw: String) -> Self {
        match raw.as_str() {
            INITIAL => Self::Initial,
            FINAL => Self::Final,
            _ => Self::Named(raw),
        }
    }
}

impl From<&str> for StateId {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for StateId {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<&StateId> for StateId {
    fn from(id: &StateId) -> Self {
        id.clone()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::parse)
    }
}

/// Identifier of an event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventId {
    /// Raised once by `start()` to leave the initial pseudo-state.
    Start,
    /// Entry slot of a regular state.
    Entry,
    /// Exit slot of a regular state.
    Exit,
    /// Do slot of a regular state.
    Do,
    /// Outgoing edge of a fork or join pseudo-state.
    Completion,
    /// A caller-declared event.
    Custom(String),
}

impl EventId {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => START,
            Self::Entry => ENTRY,
            Self::Exit => EXIT,
            Self::Do => DO,
            Self::Completion => COMPLETION,
            Self::Custom(name) => name,
        }
    }

    pub fn is_reserved(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    fn parse(raw: String) -> Self {
        match raw.as_str() {
            START => Self::Start,
            ENTRY => Self::Entry,
            EXIT => Self::Exit,
            DO => Self::Do,
            COMPLETION => Self::Completion,
            _ => Self::Custom(raw),
        }
    }
}

impl From<&str> for EventId {
    fn from(name: &str) -> Self {
        Self::Custom(name.to_string())
    }
}

impl From<String> for EventId {
    fn from(name: String) -> Self {
        Self::Custom(name)
    }
}

impl From<&EventId> for EventId {
    fn from(id: &EventId) -> Self {
        id.clone()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::parse)
    }
}
