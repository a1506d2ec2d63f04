//! Transitions and the transition map.

use super::id::{EventId, StateId};
use crate::builder::BuildError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Immutable (source, event, destination) binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    from: StateId,
    event: EventId,
    to: StateId,
}

impl Transition {
    pub fn new(from: impl Into<StateId>, event: impl Into<EventId>, to: impl Into<StateId>) -> Self {
        Self {
            from: from.into(),
            event: event.into(),
            to: to.into(),
        }
    }

    pub fn from(&self) -> &StateId {
        &self.from
    }

    pub fn event(&self) -> &EventId {
        &self.event
    }

    pub fn to(&self) -> &StateId {
        &self.to
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.from, self.event, self.to)
    }
}

/// Transitions keyed by source state, then by event.
///
/// Exactly one transition exists per (state, event) pair.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionMap {
    by_state: HashMap<StateId, HashMap<EventId, Transition>>,
}

impl TransitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state: &StateId, event: &EventId) -> Option<&Transition> {
        self.by_state.get(state).and_then(|events| events.get(event))
    }

    pub fn contains(&self, state: &StateId, event: &EventId) -> bool {
        self.get(state, event).is_some()
    }

    /// Outgoing transitions of `state`, in no particular order.
    pub fn from_state<'a>(&'a self, state: &StateId) -> impl Iterator<Item = &'a Transition> + 'a {
        self.by_state.get(state).into_iter().flat_map(|events| events.values())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.by_state.values().flat_map(|events| events.values())
    }

    pub fn len(&self) -> usize {
        self.by_state.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&mut self, transition: Transition) -> Result<(), BuildError> {
        let events = self.by_state.entry(transition.from.clone()).or_default();
        if events.contains_key(&transition.event) {
            return Err(BuildError::DuplicateEvent {
                state: transition.from,
                event: transition.event,
            });
        }
        events.insert(transition.event.clone(), transition);
        Ok(())
    }
}
