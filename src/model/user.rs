use serde::{Deserialize, Serialize};

use crate::session::SessionStore;

/// Session key holding the JSON-encoded user
pub const USER_KEY: &str = "user";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Employee,
    Admin,
}

/// Identity of the logged-in user
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
    #[serde(rename = "type")]
    pub user_type: UserType,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Read the user from the session store.
    ///
    /// A missing or unreadable entry yields `None`.
    pub fn from_session(session: &dyn SessionStore) -> Option<User> {
        let raw = session.get_item(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unreadable user entry");
                None
            }
        }
    }
}
