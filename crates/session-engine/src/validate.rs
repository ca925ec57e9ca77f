//! Input validators for credentials and contact details.

use regex::Regex;
use std::sync::LazyLock;

/// 6-20 characters: ASCII letters, digits, underscore, or CJK ideographs.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\u{4e00}-\u{9fa5}]{6,20}$").unwrap());

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Passwords rejected outright regardless of the structural rules.
const WEAK_PASSWORDS: &[&str] = &[
    "123456",
    "password",
    "12345678",
    "qwerty",
    "12345",
    "123456789",
];

/// Validate a username: 6-20 characters from letters, digits, underscore,
/// or CJK ideographs.
pub fn validate_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Validate a password: 8-20 characters, no spaces, letters and digits
/// only, and at least two of {uppercase, lowercase, digit}.
pub fn validate_password(password: &str) -> bool {
    let len = password.chars().count();
    if !(8..=20).contains(&len) {
        return false;
    }

    if password.contains(' ') {
        return false;
    }

    if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    [has_upper, has_lower, has_digit]
        .iter()
        .filter(|present| **present)
        .count()
        >= 2
}

/// Check a password against the weak-password denylist.
pub fn is_weak_password(password: &str) -> bool {
    WEAK_PASSWORDS.contains(&password)
}

/// Validate an email address.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_length_bounds() {
        assert!(!validate_username("abc12")); // 5 chars rejected
        assert!(validate_username("abc123")); // 6 chars accepted
        assert!(validate_username("a".repeat(20).as_str()));
        assert!(!validate_username("a".repeat(21).as_str()));
    }

    #[test]
    fn test_username_character_classes() {
        assert!(validate_username("user_name_1"));
        assert!(validate_username("爬虫管理员01"));
        assert!(validate_username("用户user01"));
        assert!(!validate_username("user name1")); // space
        assert!(!validate_username("user-name1")); // dash
        assert!(!validate_username("user@name1"));
        assert!(!validate_username(""));
    }

    #[test]
    fn test_password_accepts_two_classes() {
        assert!(validate_password("Abcdef12")); // upper + lower + digit
        assert!(validate_password("abcdef12")); // lower + digit
        assert!(validate_password("ABCDEF12")); // upper + digit
        assert!(validate_password("Abcdefgh")); // upper + lower
    }

    #[test]
    fn test_password_rejects_single_class() {
        assert!(!validate_password("abcdefgh")); // only lowercase
        assert!(!validate_password("ABCDEFGH")); // only uppercase
        assert!(!validate_password("12345678")); // only digits
    }

    #[test]
    fn test_password_rejects_spaces_and_specials() {
        assert!(!validate_password("Abc def1"));
        assert!(!validate_password("Abcdef1!"));
        assert!(!validate_password("Abcdef1_"));
    }

    #[test]
    fn test_password_length_bounds() {
        assert!(!validate_password("Abc1234")); // 7 chars
        assert!(validate_password("Abc12345")); // 8 chars
        assert!(validate_password(&("Ab1".to_string() + &"c".repeat(17)))); // 20 chars
        assert!(!validate_password(&("Ab1".to_string() + &"c".repeat(18)))); // 21 chars
    }

    #[test]
    fn test_weak_passwords() {
        assert!(is_weak_password("123456"));
        assert!(is_weak_password("qwerty"));
        assert!(!is_weak_password("Abcdef12"));
    }

    #[test]
    fn test_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last+tag@sub.example.co"));
        assert!(!validate_email("user@example"));
        assert!(!validate_email("userexample.com"));
        assert!(!validate_email("@example.com"));
    }
}
