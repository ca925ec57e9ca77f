//! Session state types.

use serde::{Deserialize, Serialize};

/// Authentication state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// No session; requests go out unauthenticated
    Anonymous,
    /// A login request is in flight
    Authenticating,
    /// A token is held and not known to be invalid
    Authenticated,
    /// The last login attempt failed
    AuthError,
}

/// Profile of the signed-in user. Owned exclusively by the session and
/// replaced wholesale on fetch/update, never partially mutated by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// In-memory session record: current auth state plus the user profile.
/// The bearer token itself lives in the pipeline's token cell so the two
/// cannot diverge.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: AuthState,
    pub user: Option<UserProfile>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: AuthState::Anonymous,
            user: None,
        }
    }
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }
}
