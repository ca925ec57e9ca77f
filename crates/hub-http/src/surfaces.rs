//! UI-facing seams the pipeline is allowed to touch.
//!
//! These are the only places the request pipeline performs global side
//! effects; everything else propagates to the caller.

/// Toast-style notification surface.
pub trait Notify: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);
}

/// No-op notifier for embedders without a UI surface.
pub struct NullNotify;

impl Notify for NullNotify {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
}

/// Navigation surface, consulted on forced logout.
pub trait Navigate: Send + Sync {
    /// Send the user to the login view.
    fn to_login(&self);
}

/// No-op navigator.
pub struct NullNavigate;

impl Navigate for NullNavigate {
    fn to_login(&self) {}
}

/// Hook the session layer installs so a 401 can force a logout without the
/// pipeline depending on the session crate.
pub trait SessionHook: Send + Sync {
    /// Invalidate the session: clear the persisted token and in-memory
    /// state. Must be synchronous and must not fail.
    fn force_logout(&self);
}
