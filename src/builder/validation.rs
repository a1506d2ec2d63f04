//! Structural validation of a finished graph.
//!
//! Every check runs and all failures are accumulated, so a caller sees the
//! whole list of problems instead of fixing them one build at a time.

use super::error::BuildError;
use super::registry::CallbackRegistry;
use crate::core::{EventId, State, StateId, TransitionMap};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<BuildError>>;

/// Validate the graph, accumulating ALL problems.
pub(crate) fn validate<P>(
    states: &HashMap<StateId, State<P>>,
    transitions: &TransitionMap,
    registry: &CallbackRegistry<P>,
) -> Check {
    let mut checks: Vec<Check> = vec![check_start(transitions)];

    let mut ordered: Vec<&State<P>> = states.values().collect();
    ordered.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));

    for state in ordered {
        checks.push(check_completion(state));
        for name in state.callback_names() {
            checks.push(check_callback(registry, name));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Collapse a failed validation into one error, or `Multiple` for several.
pub(crate) fn into_result(validation: Check) -> Result<(), BuildError> {
    match validation {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => {
            let mut errors: Vec<BuildError> = errors.iter().cloned().collect();
            if errors.len() == 1 {
                Err(errors.remove(0))
            } else {
                Err(BuildError::Multiple(errors))
            }
        }
    }
}

fn check_start(transitions: &TransitionMap) -> Check {
    if transitions.contains(&StateId::Initial, &EventId::Start) {
        Validation::success(())
    } else {
        Validation::fail(BuildError::MissingStartState)
    }
}

fn check_completion<P>(state: &State<P>) -> Check {
    let pseudo = match state {
        State::Fork(pseudo) | State::Join(pseudo) => pseudo,
        _ => return Validation::success(()),
    };
    if pseudo.completion().is_some() {
        Validation::success(())
    } else {
        Validation::fail(BuildError::MissingCompletion {
            state: state.id().clone(),
        })
    }
}

fn check_callback<P>(registry: &CallbackRegistry<P>, name: &str) -> Check {
    if registry.contains(name) {
        Validation::success(())
    } else {
        Validation::fail(BuildError::ActionNotCallable { name: name.to_string() })
    }
}
