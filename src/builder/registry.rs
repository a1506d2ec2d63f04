//! Named callbacks.
//!
//! Closures cannot be serialized, so events may refer to a guard or action
//! by name instead. Names are resolved against a [`CallbackRegistry`] when
//! the machine is built and again when a checkpoint is restored.

use super::error::BuildError;
use crate::core::{Action, CallbackContext, CallbackError, Guard};
use std::collections::HashMap;

/// Name to callback lookup table.
pub struct CallbackRegistry<P> {
    actions: HashMap<String, Action<P>>,
    guards: HashMap<String, Guard<P>>,
}

impl<P> CallbackRegistry<P> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            guards: HashMap::new(),
        }
    }

    /// Register an action under `name`, replacing any previous one.
    pub fn register_action<F>(&mut self, name: impl Into<String>, action: F)
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Action::new(action));
    }

    /// Register a guard under `name`, replacing any previous one.
    pub fn register_guard<F>(&mut self, name: impl Into<String>, guard: F)
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(guard));
    }

    /// Builder-style [`register_action`](Self::register_action).
    pub fn with_action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.register_action(name, action);
        self
    }

    /// Builder-style [`register_guard`](Self::register_guard).
    pub fn with_guard<F>(mut self, name: impl Into<String>, guard: F) -> Self
    where
        F: Fn(&mut CallbackContext<'_, P>) -> Result<bool, CallbackError> + Send + Sync + 'static,
    {
        self.register_guard(name, guard);
        self
    }

    /// A handle to the action registered under `name`.
    pub fn action(&self, name: &str) -> Result<Action<P>, BuildError> {
        self.actions.get(name).cloned().ok_or_else(|| not_callable(name))
    }

    /// A handle to the guard registered under `name`.
    pub fn guard(&self, name: &str) -> Result<Guard<P>, BuildError> {
        self.guards.get(name).cloned().ok_or_else(|| not_callable(name))
    }

    /// True if `name` resolves to either kind of callback.
    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name) || self.guards.contains_key(name)
    }
}

fn not_callable(name: &str) -> BuildError {
    BuildError::ActionNotCallable { name: name.to_string() }
}

impl<P> Default for CallbackRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for CallbackRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            guards: self.guards.clone(),
        }
    }
}
