//! Session management for the Crawlerhub client.
//!
//! This crate owns the authentication lifecycle:
//! - [`SessionManager`]: login/register/logout/profile operations over the
//!   request pipeline, with all failures converted to typed outcomes
//! - [`AuthState`]: the Anonymous/Authenticating/Authenticated/AuthError
//!   state machine
//! - Input validators for usernames, passwords, and email addresses
//! - The route guard consulted before entering protected views

mod guard;
mod manager;
mod outcome;
mod session;
pub mod validate;

pub use guard::{guard_route, GuardDecision};
pub use manager::{ProfileUpdate, SessionManager};
pub use outcome::{AvatarOutcome, LoginOutcome, RegisterOutcome, UpdateOutcome};
pub use session::{AuthState, Session, UserProfile};
