//! States and their capabilities.
//!
//! A state is one of five variants. Each variant implements only the
//! capabilities it has, and callers query a capability with the `as_*`
//! accessors instead of inspecting the variant:
//!
//! | Variant   | [`TransitionalState`]        | [`StateAction`] | [`ParentState`] |
//! |-----------|------------------------------|-----------------|-----------------|
//! | `Initial` | one `Start` event            | -               | -               |
//! | `Final`   | -                            | -               | -               |
//! | `Regular` | any custom events            | entry/exit/do   | regions         |
//! | `Fork`    | one `Completion` event       | -               | -               |
//! | `Join`    | one `Completion` event       | -               | -               |

use super::event::{Event, TransitionEvent};
use super::id::{EventId, StateId};
use super::token::Token;
use crate::builder::{BuildError, CallbackRegistry};
use crate::machine::StateMachine;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

static INITIAL_ID: StateId = StateId::Initial;
static FINAL_ID: StateId = StateId::Final;

/// Capability of owning outgoing transition events.
pub trait TransitionalState<P> {
    /// The transition event configured for `event`, if any.
    fn event_at(&self, event: &EventId) -> Option<&TransitionEvent<P>>;

    fn transition_events(&self) -> Vec<&TransitionEvent<P>>;

    fn add_transition_event(&mut self, event: TransitionEvent<P>) -> Result<(), BuildError>;
}

/// Capability of owning the entry, exit and do events.
///
/// The three events exist from construction with their reserved ids.
/// Replacing one with an event whose id does not match the slot fails with
/// [`BuildError::InvalidEventSlot`].
pub trait StateAction<P> {
    fn entry(&self) -> &Event<P>;
    fn exit(&self) -> &Event<P>;
    fn do_event(&self) -> &Event<P>;
    fn set_entry(&mut self, event: Event<P>) -> Result<(), BuildError>;
    fn set_exit(&mut self, event: Event<P>) -> Result<(), BuildError>;
    fn set_do(&mut self, event: Event<P>) -> Result<(), BuildError>;
}

/// Capability of owning named child machines (orthogonal regions).
pub trait ParentState<P> {
    fn regions(&self) -> &BTreeMap<String, StateMachine<P>>;
    fn regions_mut(&mut self) -> &mut BTreeMap<String, StateMachine<P>>;
    fn add_region(&mut self, name: String, machine: StateMachine<P>) -> Result<(), BuildError>;

    fn region(&self, name: &str) -> Option<&StateMachine<P>> {
        self.regions().get(name)
    }

    /// True when every region has reached its final state. Vacuously true
    /// for a state without regions.
    fn regions_ended(&self) -> bool {
        self.regions().values().all(|region| region.is_ended())
    }
}

/// Variant tag, mainly for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateKind {
    Initial,
    Final,
    Regular,
    Fork,
    Join,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initial => "initial",
            Self::Final => "final",
            Self::Regular => "regular",
            Self::Fork => "fork",
            Self::Join => "join",
        };
        f.write_str(name)
    }
}

/// A node of the state graph.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub enum State<P> {
    Initial(InitialState<P>),
    Final(FinalState),
    Regular(RegularState<P>),
    Fork(PseudoState<P>),
    Join(PseudoState<P>),
}

impl<P> State<P> {
    pub fn initial() -> Self {
        Self::Initial(InitialState {
            token: None,
            start: None,
        })
    }

    pub fn final_state() -> Self {
        Self::Final(FinalState { token: None })
    }

    pub fn regular(id: impl Into<StateId>) -> Self {
        Self::Regular(RegularState::new(id))
    }

    pub fn fork(id: impl Into<StateId>) -> Self {
        Self::Fork(PseudoState::new(id))
    }

    pub fn join(id: impl Into<StateId>) -> Self {
        Self::Join(PseudoState::new(id))
    }

    pub fn id(&self) -> &StateId {
        match self {
            Self::Initial(_) => &INITIAL_ID,
            Self::Final(_) => &FINAL_ID,
            Self::Regular(state) => &state.id,
            Self::Fork(state) | Self::Join(state) => &state.id,
        }
    }

    pub fn kind(&self) -> StateKind {
        match self {
            Self::Initial(_) => StateKind::Initial,
            Self::Final(_) => StateKind::Final,
            Self::Regular(_) => StateKind::Regular,
            Self::Fork(_) => StateKind::Fork,
            Self::Join(_) => StateKind::Join,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final(_))
    }

    pub fn is_fork(&self) -> bool {
        matches!(self, Self::Fork(_))
    }

    pub fn is_join(&self) -> bool {
        matches!(self, Self::Join(_))
    }

    /// Remove and return this state's token. A second call without an
    /// intervening transition returns `None`.
    pub fn take_token(&mut self) -> Option<Token> {
        self.token_slot().take()
    }

    pub fn has_token(&self) -> bool {
        match self {
            Self::Initial(state) => state.token.is_some(),
            Self::Final(state) => state.token.is_some(),
            Self::Regular(state) => state.token.is_some(),
            Self::Fork(state) | Self::Join(state) => state.token.is_some(),
        }
    }

    pub(crate) fn place_token(&mut self, token: Token) {
        *self.token_slot() = Some(token);
    }

    fn token_slot(&mut self) -> &mut Option<Token> {
        match self {
            Self::Initial(state) => &mut state.token,
            Self::Final(state) => &mut state.token,
            Self::Regular(state) => &mut state.token,
            Self::Fork(state) | Self::Join(state) => &mut state.token,
        }
    }

    pub fn as_transitional(&self) -> Option<&dyn TransitionalState<P>> {
        match self {
            Self::Initial(state) => Some(state),
            Self::Final(_) => None,
            Self::Regular(state) => Some(state),
            Self::Fork(state) | Self::Join(state) => Some(state),
        }
    }

    pub fn as_transitional_mut(&mut self) -> Option<&mut dyn TransitionalState<P>> {
        match self {
            Self::Initial(state) => Some(state),
            Self::Final(_) => None,
            Self::Regular(state) => Some(state),
            Self::Fork(state) | Self::Join(state) => Some(state),
        }
    }

    pub fn as_action(&self) -> Option<&dyn StateAction<P>> {
        match self {
            Self::Regular(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_action_mut(&mut self) -> Option<&mut dyn StateAction<P>> {
        match self {
            Self::Regular(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_parent(&self) -> Option<&dyn ParentState<P>> {
        match self {
            Self::Regular(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_parent_mut(&mut self) -> Option<&mut dyn ParentState<P>> {
        match self {
            Self::Regular(state) => Some(state),
            _ => None,
        }
    }

    /// Registry names referenced by this state's own events. Regions are
    /// not included; they are validated by their own builders.
    pub(crate) fn callback_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if let Self::Regular(state) = self {
            names.extend(
                [&state.entry, &state.exit, &state.do_event]
                    .into_iter()
                    .filter_map(Event::action_name),
            );
        }
        if let Some(transitional) = self.as_transitional() {
            for event in transitional.transition_events() {
                names.extend(event.callback_names());
            }
        }
        names
    }

    /// Resolve named callbacks, regions included.
    pub(crate) fn bind_callbacks(&mut self, registry: &CallbackRegistry<P>) -> Result<(), BuildError> {
        match self {
            Self::Initial(state) => {
                if let Some(start) = &mut state.start {
                    start.bind(registry)?;
                }
            }
            Self::Final(_) => {}
            Self::Regular(state) => {
                state.entry.bind(registry)?;
                state.exit.bind(registry)?;
                state.do_event.bind(registry)?;
                for event in state.transitions.values_mut() {
                    event.bind(registry)?;
                }
                for region in state.regions.values_mut() {
                    region.bind_callbacks(registry)?;
                }
            }
            Self::Fork(state) | Self::Join(state) => {
                if let Some(completion) = &mut state.completion {
                    completion.bind(registry)?;
                }
            }
        }
        Ok(())
    }
}

/// The pseudo-state a machine starts from.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct InitialState<P> {
    token: Option<Token>,
    start: Option<TransitionEvent<P>>,
}

impl<P> TransitionalState<P> for InitialState<P> {
    fn event_at(&self, event: &EventId) -> Option<&TransitionEvent<P>> {
        self.start.as_ref().filter(|start| start.id() == event)
    }

    fn transition_events(&self) -> Vec<&TransitionEvent<P>> {
        self.start.iter().collect()
    }

    fn add_transition_event(&mut self, event: TransitionEvent<P>) -> Result<(), BuildError> {
        if event.id() != &EventId::Start {
            return Err(BuildError::InvalidSource {
                state: StateId::Initial,
                event: event.id().clone(),
            });
        }
        if self.start.is_some() {
            return Err(BuildError::DuplicateEvent {
                state: StateId::Initial,
                event: EventId::Start,
            });
        }
        self.start = Some(event);
        Ok(())
    }
}

/// The terminal pseudo-state.
#[derive(Debug, Serialize, Deserialize)]
pub struct FinalState {
    token: Option<Token>,
}

/// A fork or join pseudo-state. Its only outgoing edge is the reserved
/// `Completion` event, fired as soon as the state is entered.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PseudoState<P> {
    id: StateId,
    token: Option<Token>,
    completion: Option<TransitionEvent<P>>,
}

impl<P> PseudoState<P> {
    fn new(id: impl Into<StateId>) -> Self {
        Self {
            id: id.into(),
            token: None,
            completion: None,
        }
    }

    pub fn completion(&self) -> Option<&TransitionEvent<P>> {
        self.completion.as_ref()
    }
}

impl<P> TransitionalState<P> for PseudoState<P> {
    fn event_at(&self, event: &EventId) -> Option<&TransitionEvent<P>> {
        self.completion.as_ref().filter(|completion| completion.id() == event)
    }

    fn transition_events(&self) -> Vec<&TransitionEvent<P>> {
        self.completion.iter().collect()
    }

    fn add_transition_event(&mut self, event: TransitionEvent<P>) -> Result<(), BuildError> {
        if event.id() != &EventId::Completion {
            return Err(BuildError::InvalidSource {
                state: self.id.clone(),
                event: event.id().clone(),
            });
        }
        if self.completion.is_some() {
            return Err(BuildError::DuplicateEvent {
                state: self.id.clone(),
                event: EventId::Completion,
            });
        }
        self.completion = Some(event);
        Ok(())
    }
}

/// A regular state with the full capability set.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct RegularState<P> {
    id: StateId,
    token: Option<Token>,
    transitions: HashMap<EventId, TransitionEvent<P>>,
    entry: Event<P>,
    exit: Event<P>,
    #[serde(rename = "do")]
    do_event: Event<P>,
    #[serde(default)]
    regions: BTreeMap<String, StateMachine<P>>,
}

impl<P> RegularState<P> {
    pub fn new(id: impl Into<StateId>) -> Self {
        Self {
            id: id.into(),
            token: None,
            transitions: HashMap::new(),
            entry: Event::new(EventId::Entry),
            exit: Event::new(EventId::Exit),
            do_event: Event::new(EventId::Do),
            regions: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &StateId {
        &self.id
    }
}

fn install<P>(slot: &mut Event<P>, expected: EventId, event: Event<P>) -> Result<(), BuildError> {
    if event.id() != &expected {
        return Err(BuildError::InvalidEventSlot {
            slot: expected,
            event: event.id().clone(),
        });
    }
    *slot = event;
    Ok(())
}

impl<P> TransitionalState<P> for RegularState<P> {
    fn event_at(&self, event: &EventId) -> Option<&TransitionEvent<P>> {
        self.transitions.get(event)
    }

    fn transition_events(&self) -> Vec<&TransitionEvent<P>> {
        self.transitions.values().collect()
    }

    fn add_transition_event(&mut self, event: TransitionEvent<P>) -> Result<(), BuildError> {
        if self.transitions.contains_key(event.id()) {
            return Err(BuildError::DuplicateEvent {
                state: self.id.clone(),
                event: event.id().clone(),
            });
        }
        self.transitions.insert(event.id().clone(), event);
        Ok(())
    }
}

impl<P> StateAction<P> for RegularState<P> {
    fn entry(&self) -> &Event<P> {
        &self.entry
    }

    fn exit(&self) -> &Event<P> {
        &self.exit
    }

    fn do_event(&self) -> &Event<P> {
        &self.do_event
    }

    fn set_entry(&mut self, event: Event<P>) -> Result<(), BuildError> {
        install(&mut self.entry, EventId::Entry, event)
    }

    fn set_exit(&mut self, event: Event<P>) -> Result<(), BuildError> {
        install(&mut self.exit, EventId::Exit, event)
    }

    fn set_do(&mut self, event: Event<P>) -> Result<(), BuildError> {
        install(&mut self.do_event, EventId::Do, event)
    }
}

impl<P> ParentState<P> for RegularState<P> {
    fn regions(&self) -> &BTreeMap<String, StateMachine<P>> {
        &self.regions
    }

    fn regions_mut(&mut self) -> &mut BTreeMap<String, StateMachine<P>> {
        &mut self.regions
    }

    fn add_region(&mut self, name: String, machine: StateMachine<P>) -> Result<(), BuildError> {
        if self.regions.contains_key(&name) {
            return Err(BuildError::DuplicateRegion {
                state: self.id.clone(),
                region: name,
            });
        }
        self.regions.insert(name, machine);
        Ok(())
    }
}
