//! Local session identity

use serde::{Deserialize, Serialize};

/// The single identity a client session acts as.
///
/// Not an account: there is no password or login, and `name` doubles as the
/// roster entry written into attendee lists and comment authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Is this user the host of a move with the given host id?
    pub fn hosts(&self, host_id: &str) -> bool {
        self.id == host_id
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new("user-1", "Alec")
    }
}
