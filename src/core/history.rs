//! Transition log.
//!
//! Every executed transition appends exactly one entry, in execution order.
//! Vetoed transitions and unconfigured events leave no trace here.

use super::id::{EventId, StateId};
use super::transition::Transition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single executed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionLogEntry {
    /// The state being transitioned from
    pub from: StateId,
    /// The event that fired the transition
    pub event: EventId,
    /// The state being transitioned to
    pub to: StateId,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

impl TransitionLogEntry {
    pub fn new(transition: &Transition) -> Self {
        Self {
            from: transition.from().clone(),
            event: transition.event().clone(),
            to: transition.to().clone(),
            timestamp: Utc::now(),
        }
    }

    /// True if this entry records `transition`.
    pub fn matches(&self, transition: &Transition) -> bool {
        &self.from == transition.from() && &self.event == transition.event() && &self.to == transition.to()
    }
}

/// Append-only, ordered record of executed transitions.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{EventId, StateId, Transition, TransitionLog, TransitionLogEntry};
///
/// let mut log = TransitionLog::new();
/// log.record(TransitionLogEntry::new(&Transition::new(StateId::Initial, EventId::Start, "a")));
/// log.record(TransitionLogEntry::new(&Transition::new("a", "next", "b")));
///
/// let path = log.path();
/// assert_eq!(path.len(), 3);
/// assert_eq!(path[2], &StateId::named("b"));
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransitionLog {
    entries: Vec<TransitionLogEntry>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    pub fn record(&mut self, entry: TransitionLogEntry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[TransitionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TransitionLogEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransitionLogEntry> {
        self.entries.iter()
    }

    /// States visited: the first source, then the destination of each entry.
    pub fn path(&self) -> Vec<&StateId> {
        let mut path = Vec::new();
        if let Some(first) = self.entries.first() {
            path.push(&first.from);
        }
        for entry in &self.entries {
            path.push(&entry.to);
        }
        path
    }

    /// Time between the first and the last entry.
    ///
    /// Returns `None` for an empty log.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.entries.first(), self.entries.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a TransitionLog {
    type Item = &'a TransitionLogEntry;
    type IntoIter = std::slice::Iter<'a, TransitionLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
