//! The execution-position token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marker for "execution is here".
///
/// A token is deliberately neither `Clone` nor `Copy`: exactly one state of a
/// running machine holds it, and a state gives it up by value through
/// [`State::take_token`](crate::core::State::take_token). Every transition
/// therefore moves the token explicitly from source to destination, and a
/// stale position can never be read twice.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    id: Uuid,
}

impl Token {
    /// Issue a fresh token. Only `start()` does this.
    pub(crate) fn issue() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}
