//! Route-level auth guard.

use crate::SessionManager;

/// What the router should do with a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

/// Decide whether a navigation may proceed. Protected routes require an
/// authenticated session; everything else passes through.
pub fn guard_route(requires_auth: bool, session: &SessionManager) -> GuardDecision {
    if requires_auth && !session.is_authenticated() {
        GuardDecision::RedirectToLogin
    } else {
        GuardDecision::Allow
    }
}
