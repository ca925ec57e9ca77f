//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer token for the current session. There is exactly one token
    /// active at a time; no multi-session support.
    pub const AUTH_TOKEN: &'static str = "auth_token";
}
