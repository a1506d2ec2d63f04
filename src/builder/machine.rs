//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::registry::CallbackRegistry;
use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::builder::validation;
use crate::core::{
    is_reserved_name, CallbackContext, CallbackError, Event, EventId, State, StateId, StateKind, Transition,
    TransitionEvent, TransitionMap,
};
use crate::machine::{ActionRunner, GuardEvaluator, MachineConfig, MachineObserver, StateMachine};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Builder for constructing state machines with a fluent API.
///
/// The initial and final pseudo-states exist from the start. Every other
/// state must be added before a transition can reference it.
///
/// # Example
///
/// ```rust
/// use waypoint::builder::StateMachineBuilder;
/// use waypoint::core::StateId;
///
/// let mut turnstile = StateMachineBuilder::<()>::new()
///     .state("locked")?
///     .state("unlocked")?
///     .start_at("locked")?
///     .add_transition("locked", "coin", "unlocked")?
///     .add_transition("unlocked", "pass", "locked")?
///     .build()?;
///
/// turnstile.start()?;
/// turnstile.trigger_event("coin")?;
/// assert_eq!(turnstile.current_state(), Some(&StateId::named("unlocked")));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct StateMachineBuilder<P> {
    id: Option<String>,
    states: HashMap<StateId, State<P>>,
    transitions: TransitionMap,
    payload: Option<P>,
    config: MachineConfig,
    registry: CallbackRegistry<P>,
    guard_evaluators: Vec<Arc<dyn GuardEvaluator<P>>>,
    action_runners: Vec<Arc<dyn ActionRunner<P>>>,
    observer: Option<Arc<dyn MachineObserver>>,
}

impl<P> StateMachineBuilder<P> {
    /// Create a new builder.
    pub fn new() -> Self {
        let mut states = HashMap::new();
        states.insert(StateId::Initial, State::initial());
        states.insert(StateId::Final, State::final_state());
        Self {
            id: None,
            states,
            transitions: TransitionMap::new(),
            payload: None,
            config: MachineConfig::default(),
            registry: CallbackRegistry::new(),
            guard_evaluators: Vec::new(),
            action_runners: Vec::new(),
            observer: None,
        }
    }

    /// Set the machine id. Defaults to a random UUID.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_events_per_drain(mut self, limit: usize) -> Self {
        self.config.max_events_per_drain = Some(limit);
        self
    }

    pub fn auto_start_regions(mut self, enabled: bool) -> Self {
        self.config.auto_start_regions = enabled;
        self
    }

    /// Use `registry` to resolve named callbacks, replacing the current one.
    pub fn registry(mut self, registry: CallbackRegistry<P>) -> Self {
        self.registry = registry;
        self
    }

    pub fn register_action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.registry.register_action(name, action);
        self
    }

    pub fn register_guard<F>(mut self, name: impl Into<String>, guard: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        self.registry.register_guard(name, guard);
        self
    }

    /// Append a guard evaluator consulted for every transition.
    pub fn guard_evaluator(mut self, evaluator: impl GuardEvaluator<P> + 'static) -> Self {
        self.guard_evaluators.push(Arc::new(evaluator));
        self
    }

    /// Append an action runner invoked for every action step.
    pub fn action_runner(mut self, runner: impl ActionRunner<P> + 'static) -> Self {
        self.action_runners.push(Arc::new(runner));
        self
    }

    /// Closure form of [`guard_evaluator`](Self::guard_evaluator).
    pub fn guard_fn<F>(mut self, evaluator: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        self.guard_evaluators.push(Arc::new(evaluator));
        self
    }

    /// Closure form of [`action_runner`](Self::action_runner).
    pub fn action_fn<F>(mut self, runner: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.action_runners.push(Arc::new(runner));
        self
    }

    pub fn observer(mut self, observer: impl MachineObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Add a regular state.
    pub fn add_state(mut self, builder: StateBuilder<P>) -> Result<Self, BuildError> {
        self.check_new_state(builder.id())?;
        let state = builder.build()?;
        self.states.insert(state.id().clone(), state);
        Ok(self)
    }

    /// Add a regular state with no actions.
    pub fn state(self, name: impl Into<StateId>) -> Result<Self, BuildError> {
        self.add_state(StateBuilder::new(name))
    }

    /// Add a fork pseudo-state. It needs a `completion` transition.
    pub fn fork(mut self, name: impl Into<StateId>) -> Result<Self, BuildError> {
        let id = name.into();
        self.check_new_state(&id)?;
        self.states.insert(id.clone(), State::fork(id));
        Ok(self)
    }

    /// Add a join pseudo-state. It needs a `completion` transition.
    pub fn join(mut self, name: impl Into<StateId>) -> Result<Self, BuildError> {
        let id = name.into();
        self.check_new_state(&id)?;
        self.states.insert(id.clone(), State::join(id));
        Ok(self)
    }

    /// Make `state` the first state entered after `start()`.
    pub fn start_at(self, state: impl Into<StateId>) -> Result<Self, BuildError> {
        let to = state.into();
        let transition = Transition::new(StateId::Initial, EventId::Start, to.clone());
        self.connect(transition, TransitionEvent::new(Event::new(EventId::Start), to))
    }

    /// Add an unguarded transition on a custom event.
    pub fn add_transition(
        self,
        from: impl Into<StateId>,
        event: impl Into<String>,
        to: impl Into<StateId>,
    ) -> Result<Self, BuildError> {
        self.transition(
            TransitionBuilder::new()
                .from(from)
                .on(EventId::Custom(event.into()))
                .to(to),
        )
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(self, builder: TransitionBuilder<P>) -> Result<Self, BuildError> {
        let (transition, event) = builder.build()?;
        self.connect(transition, event)
    }

    /// Add the single outgoing transition of a fork or join.
    pub fn completion(self, from: impl Into<StateId>, to: impl Into<StateId>) -> Result<Self, BuildError> {
        self.transition(TransitionBuilder::new().from(from).on(EventId::Completion).to(to))
    }

    /// Build the state machine.
    ///
    /// Validation accumulates every structural problem; a single problem is
    /// returned as is, several as [`BuildError::Multiple`].
    pub fn build(self) -> Result<StateMachine<P>, BuildError> {
        validation::into_result(validation::validate(&self.states, &self.transitions, &self.registry))?;

        let id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let state_count = self.states.len();
        let mut machine = StateMachine::from_parts(id, self.states, self.transitions, self.config);
        machine.bind_callbacks(&self.registry)?;
        machine.set_hooks(self.guard_evaluators, self.action_runners, self.observer);
        if let Some(payload) = self.payload {
            machine.set_payload(payload);
        }

        debug!(machine = %machine.id(), states = state_count, "machine built");
        Ok(machine)
    }

    fn check_new_state(&self, id: &StateId) -> Result<(), BuildError> {
        if let StateId::Named(name) = id {
            if is_reserved_name(name) {
                return Err(BuildError::ReservedName { name: name.clone() });
            }
        }
        if self.states.contains_key(id) {
            return Err(BuildError::DuplicateState { state: id.clone() });
        }
        Ok(())
    }

    fn connect(mut self, transition: Transition, event: TransitionEvent<P>) -> Result<Self, BuildError> {
        let from = transition.from();
        let to = transition.to();

        if let EventId::Custom(name) = transition.event() {
            if is_reserved_name(name) {
                return Err(BuildError::ReservedName { name: name.clone() });
            }
        }
        if !self.states.contains_key(to) {
            return Err(BuildError::StateNotFound { state: to.clone() });
        }
        if to == &StateId::Initial {
            return Err(BuildError::InvalidTarget { state: to.clone() });
        }

        let invalid_source = || BuildError::InvalidSource {
            state: from.clone(),
            event: transition.event().clone(),
        };
        let source = self
            .states
            .get_mut(from)
            .ok_or_else(|| BuildError::StateNotFound { state: from.clone() })?;
        if source.kind() == StateKind::Regular && transition.event().is_reserved() {
            return Err(invalid_source());
        }
        source
            .as_transitional_mut()
            .ok_or_else(invalid_source)?
            .add_transition_event(event)?;

        self.transitions.insert(transition)?;
        Ok(self)
    }
}

impl<P> Default for StateMachineBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
