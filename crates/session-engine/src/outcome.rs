//! Typed operation outcomes.
//!
//! Session operations never surface raw transport/HTTP errors; every
//! failure is converted into one of these structs, which a caller can
//! render directly.

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,
    /// Remaining attempts before the account locks (401 with detail)
    pub remaining_attempts: Option<i32>,
    /// Account is locked with a cooldown (423)
    pub is_account_locked: bool,
    /// Lock cooldown in minutes
    pub lock_minutes: Option<i64>,
    /// Server-side or transport failure
    pub is_system_error: bool,
}

impl LoginOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            remaining_attempts: None,
            is_account_locked: false,
            lock_minutes: None,
            is_system_error: false,
        }
    }
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub success: bool,
    pub message: String,
    /// Username already taken (409)
    pub is_username_conflict: bool,
    /// Bad input or bad/expired verification code (400, or rejected before
    /// the network call)
    pub is_validation_error: bool,
    /// Anything else
    pub is_system_error: bool,
}

impl RegisterOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            is_username_conflict: false,
            is_validation_error: false,
            is_system_error: false,
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            is_username_conflict: false,
            is_validation_error: true,
            is_system_error: false,
        }
    }
}

/// Outcome of a profile update, email bind, or verification-code send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: String,
}

impl UpdateOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Outcome of an avatar upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarOutcome {
    pub success: bool,
    pub message: String,
    pub avatar_url: Option<String>,
}
