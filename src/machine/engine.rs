//! The orchestrator: event queue, transition algorithm and hook dispatch.

use super::config::MachineConfig;
use super::error::MachineError;
use super::hooks::{ActionRunner, GuardEvaluator, MachineObserver, Notification, Phase};
use crate::builder::{BuildError, CallbackRegistry};
use crate::core::{
    Action, CallbackContext, CallbackError, EventId, State, StateId, StateKind, Token, Transition,
    TransitionLog, TransitionLogEntry, TransitionMap,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Lifecycle of the orchestrator itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineStatus {
    NotStarted,
    Active,
    /// Terminal: the final pseudo-state was reached.
    Ended,
}

/// A running statechart.
///
/// Built by [`StateMachineBuilder`](crate::builder::StateMachineBuilder),
/// then driven with [`start`](Self::start) and
/// [`trigger_event`](Self::trigger_event).
///
/// Each `trigger_event` call pushes its event onto a FIFO queue and drains
/// it. Events raised from inside guards and actions join the same queue, so
/// a chain of self-triggered events completes in the order raised before
/// the outer call returns. For every dequeued event the engine:
///
/// 1. looks up the transition for (current state, event);
/// 2. if there is one, evaluates the transition's guard and then every
///    guard evaluator, all of which must pass;
/// 3. if they pass, consumes the token, runs exit and transition actions,
///    moves the token to the destination, runs its entry action and
///    appends a log entry;
/// 4. runs the do action of whatever state is current now, whether or not
///    a transition happened.
///
/// The machine is single-threaded and cooperative. The payload is shared by
/// every callback without synchronization.
///
/// Serializing a machine keeps its position, graph, queue and config. The
/// payload, transition log, subscribers and inline closures are skipped.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateMachine<P> {
    id: String,
    status: MachineStatus,
    current: Option<StateId>,
    previous: Option<StateId>,
    states: HashMap<StateId, State<P>>,
    transitions: TransitionMap,
    queue: VecDeque<EventId>,
    #[serde(default)]
    config: MachineConfig,
    #[serde(skip)]
    payload: Option<P>,
    #[serde(skip)]
    log: TransitionLog,
    #[serde(skip)]
    guard_evaluators: Vec<Arc<dyn GuardEvaluator<P>>>,
    #[serde(skip)]
    action_runners: Vec<Arc<dyn ActionRunner<P>>>,
    #[serde(skip)]
    observer: Option<Arc<dyn MachineObserver>>,
}

impl<P> StateMachine<P> {
    pub(crate) fn from_parts(
        id: String,
        states: HashMap<StateId, State<P>>,
        transitions: TransitionMap,
        config: MachineConfig,
    ) -> Self {
        Self {
            id,
            status: MachineStatus::NotStarted,
            current: None,
            previous: None,
            states,
            transitions,
            queue: VecDeque::new(),
            config,
            payload: None,
            log: TransitionLog::new(),
            guard_evaluators: Vec::new(),
            action_runners: Vec::new(),
            observer: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> MachineStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == MachineStatus::Active
    }

    pub fn is_ended(&self) -> bool {
        self.status == MachineStatus::Ended
    }

    /// `None` before `start()`.
    pub fn current_state(&self) -> Option<&StateId> {
        self.current.as_ref()
    }

    /// `None` before `start()`.
    pub fn previous_state(&self) -> Option<&StateId> {
        self.previous.as_ref()
    }

    pub fn state(&self, id: &StateId) -> Option<&State<P>> {
        self.states.get(id)
    }

    pub fn states(&self) -> impl Iterator<Item = &State<P>> {
        self.states.values()
    }

    pub fn transitions(&self) -> &TransitionMap {
        &self.transitions
    }

    pub fn transition_log(&self) -> &TransitionLog {
        &self.log
    }

    /// Events queued with [`queue_event`](Self::queue_event) that have not
    /// been processed yet.
    pub fn pending_events(&self) -> impl Iterator<Item = &EventId> {
        self.queue.iter()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut P> {
        self.payload.as_mut()
    }

    pub fn set_payload(&mut self, payload: P) {
        self.payload = Some(payload);
    }

    pub fn take_payload(&mut self) -> Option<P> {
        self.payload.take()
    }

    /// Append a guard evaluator. Registration order is evaluation order.
    pub fn add_guard_evaluator(&mut self, evaluator: impl GuardEvaluator<P> + 'static) {
        self.guard_evaluators.push(Arc::new(evaluator));
    }

    /// Closure form of [`add_guard_evaluator`](Self::add_guard_evaluator).
    pub fn add_guard_fn<F>(&mut self, evaluator: F)
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        self.guard_evaluators.push(Arc::new(evaluator));
    }

    /// Append an action runner. Registration order is run order.
    pub fn add_action_runner(&mut self, runner: impl ActionRunner<P> + 'static) {
        self.action_runners.push(Arc::new(runner));
    }

    /// Closure form of [`add_action_runner`](Self::add_action_runner).
    pub fn add_action_fn<F>(&mut self, runner: F)
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.action_runners.push(Arc::new(runner));
    }

    pub fn set_observer(&mut self, observer: impl MachineObserver + 'static) {
        self.observer = Some(Arc::new(observer));
    }

    pub(crate) fn set_hooks(
        &mut self,
        guard_evaluators: Vec<Arc<dyn GuardEvaluator<P>>>,
        action_runners: Vec<Arc<dyn ActionRunner<P>>>,
        observer: Option<Arc<dyn MachineObserver>>,
    ) {
        self.guard_evaluators = guard_evaluators;
        self.action_runners = action_runners;
        self.observer = observer;
    }

    /// Resolve every named callback, regions included, from `registry`.
    pub fn bind_callbacks(&mut self, registry: &CallbackRegistry<P>) -> Result<(), BuildError> {
        for state in self.states.values_mut() {
            state.bind_callbacks(registry)?;
        }
        Ok(())
    }

    /// Place the token on the initial pseudo-state and process `Start`.
    pub fn start(&mut self) -> Result<(), MachineError> {
        if self.status != MachineStatus::NotStarted {
            return Err(MachineError::AlreadyStarted);
        }
        self.lookup_mut(&StateId::Initial)?.place_token(Token::issue());
        self.current = Some(StateId::Initial);
        self.previous = None;
        self.status = MachineStatus::Active;
        debug!(machine = %self.id, "machine started");

        self.queue.push_back(EventId::Start);
        self.drain()
    }

    /// Queue `event` and drain the queue.
    pub fn trigger_event(&mut self, event: impl Into<String>) -> Result<(), MachineError> {
        self.ensure_running()?;
        self.queue.push_back(EventId::Custom(event.into()));
        self.drain()
    }

    /// Queue `event` without draining. It runs on the next `trigger_event`.
    pub fn queue_event(&mut self, event: impl Into<String>) -> Result<(), MachineError> {
        self.ensure_running()?;
        self.queue.push_back(EventId::Custom(event.into()));
        Ok(())
    }

    /// Put the machine back to `NotStarted`, dropping its token and queue.
    /// The transition log is kept.
    pub(crate) fn reset(&mut self) {
        for state in self.states.values_mut() {
            state.take_token();
        }
        self.current = None;
        self.previous = None;
        self.queue.clear();
        self.status = MachineStatus::NotStarted;
    }

    pub(super) fn ensure_running(&self) -> Result<(), MachineError> {
        match self.status {
            MachineStatus::NotStarted => Err(MachineError::NotStarted),
            MachineStatus::Ended => Err(MachineError::AlreadyShutdown),
            MachineStatus::Active => Ok(()),
        }
    }

    pub(super) fn drain(&mut self) -> Result<(), MachineError> {
        let mut processed = 0;
        while !self.queue.is_empty() {
            if matches!(self.current, Some(StateId::Final)) {
                self.abandon_queue("final state reached");
                return Err(MachineError::AlreadyShutdown);
            }
            if let Some(limit) = self.config.max_events_per_drain {
                if processed >= limit {
                    self.abandon_queue("event limit exceeded");
                    return Err(MachineError::EventLimitExceeded { limit });
                }
            }
            let Some(event) = self.queue.pop_front() else {
                break;
            };
            processed += 1;
            if let Err(err) = self.process(event) {
                self.abandon_queue("callback failed");
                return Err(err);
            }
        }
        Ok(())
    }

    fn abandon_queue(&mut self, reason: &str) {
        if !self.queue.is_empty() {
            warn!(machine = %self.id, discarded = self.queue.len(), reason, "abandoning queued events");
            self.queue.clear();
        }
    }

    fn process(&mut self, event: EventId) -> Result<(), MachineError> {
        let current = self.current.clone().ok_or(MachineError::NotStarted)?;
        trace!(machine = %self.id, state = %current, event = %event, "processing event");
        self.notify(Phase::Process, Some(&current), &event, None);

        if let Some(transition) = self.transitions.get(&current, &event).cloned() {
            if self.guards_pass(&transition)? {
                self.execute(&transition)?;
            }
        }
        self.run_do()
    }

    fn guards_pass(&mut self, transition: &Transition) -> Result<bool, MachineError> {
        if self.lookup(transition.to())?.is_join() && !self.regions_ended(transition.from()) {
            trace!(machine = %self.id, %transition, "join vetoed: regions still running");
            return Ok(false);
        }

        let guard = self
            .lookup(transition.from())?
            .as_transitional()
            .and_then(|source| source.event_at(transition.event()))
            .and_then(|event| event.guard().cloned());
        let evaluators = self.guard_evaluators.clone();
        let event = transition.event().clone();
        let failed = |source| MachineError::GuardFailed {
            event: transition.event().clone(),
            source,
        };

        let mut ctx = self.callback_context(&event, Some(transition));
        let mut passed = match &guard {
            Some(guard) => guard.check(&mut ctx).map_err(failed)?,
            None => true,
        };
        for evaluator in &evaluators {
            if !passed {
                break;
            }
            passed = evaluator.evaluate(&mut ctx).map_err(failed)?;
        }

        if !passed {
            trace!(machine = %self.id, %transition, "transition vetoed by guard");
        }
        Ok(passed)
    }

    fn execute(&mut self, transition: &Transition) -> Result<(), MachineError> {
        let from = transition.from().clone();
        let to = transition.to().clone();
        let token = self
            .lookup_mut(&from)?
            .take_token()
            .ok_or_else(|| MachineError::TokenMissing { state: from.clone() })?;

        if let Err(err) = self.leave(transition) {
            self.lookup_mut(&from)?.place_token(token);
            return Err(err);
        }

        let prior = self.previous.replace(from.clone());
        self.current = None;
        self.notify(Phase::Transition, None, transition.event(), Some(transition));

        self.lookup_mut(&to)?.place_token(token);
        self.current = Some(to.clone());
        if let Err(err) = self.enter(transition) {
            self.rewind(&from, &to, prior)?;
            return Err(err);
        }

        self.log.record(TransitionLogEntry::new(transition));
        debug!(
            machine = %self.id,
            from = %transition.from(),
            event = %transition.event(),
            to = %to,
            "transition executed"
        );

        self.settle(&to)
    }

    /// Exit action of the source, then the transition's own action.
    fn leave(&mut self, transition: &Transition) -> Result<(), MachineError> {
        let source = self.lookup(transition.from())?;
        let exit = source.as_action().map(|actions| actions.exit().action().cloned());
        let action = source
            .as_transitional()
            .and_then(|source| source.event_at(transition.event()))
            .and_then(|event| event.event().action().cloned());

        if let Some(exit) = exit {
            self.notify(Phase::Exit, Some(transition.from()), &EventId::Exit, Some(transition));
            self.run_actions(&EventId::Exit, exit, Some(transition))?;
        }
        self.run_actions(transition.event(), action, Some(transition))
    }

    fn enter(&mut self, transition: &Transition) -> Result<(), MachineError> {
        let entry = self
            .lookup(transition.to())?
            .as_action()
            .map(|actions| actions.entry().action().cloned());

        if let Some(entry) = entry {
            self.notify(Phase::Entry, Some(transition.to()), &EventId::Entry, Some(transition));
            self.run_actions(&EventId::Entry, entry, Some(transition))?;
        }
        Ok(())
    }

    /// Undo a move whose entry action failed: the token goes back to `from`
    /// and the position is what it was before the transition.
    fn rewind(&mut self, from: &StateId, to: &StateId, prior: Option<StateId>) -> Result<(), MachineError> {
        let token = self
            .lookup_mut(to)?
            .take_token()
            .ok_or_else(|| MachineError::TokenMissing { state: to.clone() })?;
        self.lookup_mut(from)?.place_token(token);
        self.current = Some(from.clone());
        self.previous = prior;
        warn!(machine = %self.id, from = %from, to = %to, "entry failed, transition rewound");
        Ok(())
    }

    /// Post-entry bookkeeping that depends on the kind of state entered.
    fn settle(&mut self, state: &StateId) -> Result<(), MachineError> {
        match self.lookup(state)?.kind() {
            StateKind::Final => {
                self.status = MachineStatus::Ended;
                debug!(machine = %self.id, "machine reached final state");
            }
            StateKind::Fork | StateKind::Join => self.queue.push_front(EventId::Completion),
            StateKind::Regular => {
                if self.config.auto_start_regions && self.has_regions(state) {
                    self.start_regions(state)?;
                    self.queue_join_if_ready(state);
                }
            }
            StateKind::Initial => {}
        }
        Ok(())
    }

    fn run_do(&mut self) -> Result<(), MachineError> {
        let Some(current) = self.current.clone() else {
            return Ok(());
        };
        let action = match self.lookup(&current)?.as_action() {
            Some(actions) => actions.do_event().action().cloned(),
            None => return Ok(()),
        };

        self.notify(Phase::Do, Some(&current), &EventId::Do, None);
        self.run_actions(&EventId::Do, action, None)
    }

    /// The event's own action, then every action runner.
    fn run_actions(
        &mut self,
        event: &EventId,
        action: Option<Action<P>>,
        transition: Option<&Transition>,
    ) -> Result<(), MachineError> {
        let runners = self.action_runners.clone();
        let failed = |source| MachineError::ActionFailed {
            event: event.clone(),
            source,
        };

        let mut ctx = self.callback_context(event, transition);
        if let Some(action) = action {
            action.run(&mut ctx).map_err(failed)?;
        }
        for runner in &runners {
            runner.run(&mut ctx).map_err(failed)?;
        }
        Ok(())
    }

    fn callback_context<'a>(
        &'a mut self,
        event: &'a EventId,
        transition: Option<&'a Transition>,
    ) -> CallbackContext<'a, P> {
        CallbackContext::new(
            &self.id,
            event,
            self.current.as_ref(),
            self.previous.as_ref(),
            transition,
            self.payload.as_mut(),
            &mut self.queue,
        )
    }

    fn notify(&self, phase: Phase, state: Option<&StateId>, event: &EventId, transition: Option<&Transition>) {
        if let Some(observer) = &self.observer {
            observer.notify(&Notification {
                phase,
                machine_id: &self.id,
                state,
                event,
                transition,
            });
        }
    }

    pub(super) fn lookup(&self, id: &StateId) -> Result<&State<P>, MachineError> {
        self.states
            .get(id)
            .ok_or_else(|| MachineError::UnknownState { state: id.clone() })
    }

    pub(super) fn lookup_mut(&mut self, id: &StateId) -> Result<&mut State<P>, MachineError> {
        self.states
            .get_mut(id)
            .ok_or_else(|| MachineError::UnknownState { state: id.clone() })
    }

    pub(super) fn states_mut(&mut self) -> &mut HashMap<StateId, State<P>> {
        &mut self.states
    }

    pub(super) fn push_event(&mut self, event: EventId) {
        self.queue.push_back(event);
    }
}

impl<P> fmt::Debug for StateMachine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("states", &self.states.len())
            .field("transitions", &self.transitions.len())
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}
