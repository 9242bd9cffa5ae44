//! Sequential identifiers.

use serde::{Deserialize, Serialize};

/// Hands out ids of the form `{prefix}_{n:06}`, starting at 1.
///
/// Counter-based ids keep repeated runs over the same inputs identical.
///
/// # Examples
///
/// ```
/// use shift_engine::scheduling::IdSequence;
///
/// let mut ids = IdSequence::new("shift");
/// assert_eq!(ids.next_id(), "shift_000001");
/// assert_eq!(ids.next_id(), "shift_000002");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequence {
    prefix: String,
    next: u64,
}

impl IdSequence {
    /// Creates a sequence for a prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Returns the next id.
    pub fn next_id(&mut self) -> String {
        let id = format!("{}_{:06}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
