//! Orthogonal regions.
//!
//! A composite state owns its regions as child machines. Events reach a
//! region only through [`StateMachine::trigger_region_event`] on the
//! parent, which afterwards checks whether every region has ended. Once they
//! all have, the parent queues the event of its transition into a join state
//! and drains it.
//!
//! Regions nest: a region's composite states own regions of their own.
//! [`StateMachine::trigger_region_path`] names one region per level and runs
//! the join check at every level on the way back up.

use super::engine::{MachineStatus, StateMachine};
use super::error::MachineError;
use crate::core::{State, StateId};
use tracing::{debug, warn};

fn region_error(region: &str, source: MachineError) -> MachineError {
    MachineError::Region {
        region: region.to_string(),
        source: Box::new(source),
    }
}

impl<P> StateMachine<P> {
    /// Look a region up by name among this machine's own states.
    pub fn region(&self, name: &str) -> Option<&StateMachine<P>> {
        self.states()
            .filter_map(State::as_parent)
            .find_map(|parent| parent.region(name))
    }

    /// Follow `path` down through nested regions, one name per level.
    /// An empty path is this machine.
    pub fn region_at(&self, path: &[&str]) -> Option<&StateMachine<P>> {
        path.iter().try_fold(self, |machine, name| machine.region(name))
    }

    /// Forward `event` to a region of the current state.
    ///
    /// # Errors
    ///
    /// - [`MachineError::RegionNotFound`] if no state owns a region by that name
    /// - [`MachineError::RegionNotActive`] if the owner is not the current state
    /// - [`MachineError::Region`] wrapping whatever the region raised
    pub fn trigger_region_event(&mut self, region: &str, event: impl Into<String>) -> Result<(), MachineError> {
        self.trigger_region_path(&[region], event)
    }

    /// Forward `event` to a nested region, naming one region per level.
    ///
    /// Every machine on the way back up gets the join check of
    /// [`trigger_region_event`](Self::trigger_region_event), so an innermost
    /// region ending can carry its owners through their joins in one call.
    /// Errors are wrapped once per level. An empty path triggers `event` on
    /// this machine.
    pub fn trigger_region_path(&mut self, path: &[&str], event: impl Into<String>) -> Result<(), MachineError> {
        let Some((region, rest)) = path.split_first() else {
            return self.trigger_event(event);
        };
        self.ensure_running()?;
        let current = self.current_state().cloned().ok_or(MachineError::NotStarted)?;

        self.active_region_mut(&current, region)?
            .trigger_region_path(rest, event)
            .map_err(|source| region_error(region, source))?;

        self.join_if_ready(&current)
    }

    /// Start a region of the current state by hand. Only needed when
    /// `auto_start_regions` is off.
    pub fn start_region(&mut self, region: &str) -> Result<(), MachineError> {
        self.start_region_path(&[region])
    }

    /// Start a nested region by hand. Every name but the last must lead
    /// through a region of an active state.
    pub fn start_region_path(&mut self, path: &[&str]) -> Result<(), MachineError> {
        let Some((region, rest)) = path.split_first() else {
            return self.start();
        };
        self.ensure_running()?;
        let current = self.current_state().cloned().ok_or(MachineError::NotStarted)?;

        self.active_region_mut(&current, region)?
            .start_region_path(rest)
            .map_err(|source| region_error(region, source))?;
        debug!(machine = %self.id(), region = %region, "region started");

        self.join_if_ready(&current)
    }

    fn join_if_ready(&mut self, current: &StateId) -> Result<(), MachineError> {
        if self.queue_join_if_ready(current) {
            self.drain()
        } else {
            Ok(())
        }
    }

    fn active_region_mut(&mut self, current: &StateId, region: &str) -> Result<&mut StateMachine<P>, MachineError> {
        if self.region(region).is_none() {
            return Err(MachineError::RegionNotFound {
                region: region.to_string(),
            });
        }
        self.states_mut()
            .get_mut(current)
            .and_then(State::as_parent_mut)
            .and_then(|parent| parent.regions_mut().get_mut(region))
            .ok_or_else(|| MachineError::RegionNotActive {
                region: region.to_string(),
            })
    }

    /// Start every region of `state`, resetting any left over from an
    /// earlier visit.
    pub(super) fn start_regions(&mut self, state: &StateId) -> Result<(), MachineError> {
        let machine = self.id().to_string();
        let Some(parent) = self.states_mut().get_mut(state).and_then(State::as_parent_mut) else {
            return Ok(());
        };

        for (name, region) in parent.regions_mut().iter_mut() {
            if region.status() != MachineStatus::NotStarted {
                region.reset();
            }
            region.start().map_err(|source| region_error(name, source))?;
            debug!(machine = %machine, region = %name, "region started");
        }
        Ok(())
    }

    pub(super) fn has_regions(&self, state: &StateId) -> bool {
        self.state(state)
            .and_then(State::as_parent)
            .is_some_and(|parent| !parent.regions().is_empty())
    }

    /// Vacuously true for states without regions.
    pub(super) fn regions_ended(&self, state: &StateId) -> bool {
        self.state(state)
            .and_then(State::as_parent)
            .map_or(true, |parent| parent.regions_ended())
    }

    /// Queue the join event of `state` if all of its regions have ended.
    /// Returns whether anything was queued.
    pub(super) fn queue_join_if_ready(&mut self, state: &StateId) -> bool {
        if !self.has_regions(state) || !self.regions_ended(state) {
            return false;
        }

        let join = self
            .transitions()
            .from_state(state)
            .find(|transition| self.state(transition.to()).is_some_and(State::is_join))
            .map(|transition| transition.event().clone());

        match join {
            Some(event) => {
                debug!(machine = %self.id(), state = %state, event = %event, "regions ended, leaving through join");
                self.push_event(event);
                true
            }
            None => {
                warn!(machine = %self.id(), state = %state, "regions ended but no transition leads to a join");
                false
            }
        }
    }
}
