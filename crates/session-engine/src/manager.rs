//! The session manager.

use crate::outcome::{AvatarOutcome, LoginOutcome, RegisterOutcome, UpdateOutcome};
use crate::session::{AuthState, Session, UserProfile};
use crate::validate;
use hub_http::multipart::{Form, Part};
use hub_http::{ApiClient, ApiError, ApiResult, SessionHook, TokenCell};
use hub_storage::TokenVault;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginData {
    token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
    verify_code: &'a str,
}

#[derive(Serialize)]
struct EmailCodeRequest<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct PasswordCheckRequest<'a> {
    password: &'a str,
}

/// Partial profile update. Absent fields are omitted from the request
/// body; the backend only touches what is present.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New security email, paired with `verification_code`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_email: Option<String>,
    /// Verification code for the new email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
    /// Current password, paired with `new_password`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    /// Replacement password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

/// Owns the authentication session: the current token, the user profile,
/// and the state machine driving them.
///
/// Cheap to clone; clones share the same session. The manager installs
/// itself as the pipeline's session hook so any 401 forces the
/// implicit-logout transition no matter which request triggered it.
#[derive(Clone)]
pub struct SessionManager {
    api: Arc<ApiClient>,
    vault: Arc<TokenVault>,
    token: TokenCell,
    inner: Arc<Mutex<Session>>,
}

impl SessionManager {
    /// Create a session manager over the given pipeline and token vault,
    /// and install the forced-logout hook.
    pub fn new(api: Arc<ApiClient>, vault: TokenVault) -> Self {
        let manager = Self {
            token: api.token(),
            api: api.clone(),
            vault: Arc::new(vault),
            inner: Arc::new(Mutex::new(Session::default())),
        };
        api.install_session_hook(Arc::new(manager.clone()));
        manager
    }

    /// Restore a persisted session at startup. A stored token is trusted
    /// optimistically; the first authenticated request that fails with 401
    /// will tear it down.
    pub fn init(&self) {
        match self.vault.auth_token() {
            Ok(Some(token)) => {
                self.token.set(&token);
                self.inner.lock().unwrap().state = AuthState::Authenticated;
                tracing::info!("restored persisted session");
            }
            Ok(None) => {
                self.inner.lock().unwrap().state = AuthState::Anonymous;
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not read persisted token");
                self.inner.lock().unwrap().state = AuthState::Anonymous;
            }
        }
    }

    /// Whether the session currently holds a valid-as-far-as-we-know token.
    pub fn is_authenticated(&self) -> bool {
        self.inner.lock().unwrap().is_authenticated()
    }

    /// Current state machine state.
    pub fn state(&self) -> AuthState {
        self.inner.lock().unwrap().state
    }

    /// Current user profile, if one has been fetched.
    pub fn profile(&self) -> Option<UserProfile> {
        self.inner.lock().unwrap().user.clone()
    }

    /// Display name for the current user.
    pub fn username(&self) -> String {
        self.inner
            .lock()
            .unwrap()
            .user
            .as_ref()
            .map(|u| u.username.clone())
            .unwrap_or_else(|| "guest".to_string())
    }

    /// Attempt to log in. Never fails with a raw error; every failure is
    /// classified into the outcome.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        self.inner.lock().unwrap().state = AuthState::Authenticating;

        let result = self
            .api
            .post_json::<LoginData, _>("/api/auth/login", &LoginRequest { username, password })
            .await
            .and_then(|envelope| envelope.into_data());

        match result {
            Ok(data) => {
                tracing::info!(expires_in = ?data.expires_in, "login successful");

                // Persist and publish the token on every transition; a
                // failed persist is logged, not fatal.
                if let Err(err) = self.vault.set_auth_token(&data.token) {
                    tracing::warn!(error = %err, "failed to persist token");
                }
                self.token.set(&data.token);
                self.inner.lock().unwrap().state = AuthState::Authenticated;

                // Chain the profile fetch; its failure leaves the login
                // itself successful with the profile absent.
                self.fetch_profile().await;

                LoginOutcome::success("Signed in")
            }
            Err(err) => {
                self.clear_credentials();
                self.inner.lock().unwrap().state = AuthState::AuthError;
                classify_login_failure(&err)
            }
        }
    }

    /// Register a new account. Inputs are validated before any network
    /// call; backend failures are classified by status.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
        verify_code: &str,
    ) -> RegisterOutcome {
        if !validate::validate_username(username) {
            return RegisterOutcome::validation_error(
                "Username must be 6-20 letters, digits, underscores, or CJK characters",
            );
        }
        if !validate::validate_password(password) {
            return RegisterOutcome::validation_error(
                "Password must be 8-20 letters and digits with at least two of uppercase, lowercase, digits",
            );
        }
        if validate::is_weak_password(password) {
            return RegisterOutcome::validation_error("Password is too common");
        }
        if !validate::validate_email(email) {
            return RegisterOutcome::validation_error("Invalid email address");
        }

        let result = self
            .api
            .post_json::<String, _>(
                "/api/auth/register",
                &RegisterRequest {
                    username,
                    password,
                    email,
                    verify_code,
                },
            )
            .await;

        match result {
            Ok(_) => RegisterOutcome::success("Account created"),
            Err(err) => classify_register_failure(&err),
        }
    }

    /// Fetch the user profile, replacing it wholesale. Idempotent. On a
    /// 401 the pipeline has already torn the session down; any other
    /// failure leaves the auth state alone with the profile absent.
    pub async fn fetch_profile(&self) {
        let result = self
            .api
            .get_json::<UserProfile>("/api/auth/userinfo", &[])
            .await
            .and_then(|envelope| envelope.into_data());

        match result {
            Ok(profile) => {
                tracing::debug!(username = %profile.username, "profile refreshed");
                self.inner.lock().unwrap().user = Some(profile);
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile fetch failed");
                self.inner.lock().unwrap().user = None;
            }
        }
    }

    /// Apply a partial profile update, then re-fetch the profile so the
    /// session's copy is replaced wholesale.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> UpdateOutcome {
        let result = self
            .api
            .put_json::<String, _>("/api/auth/userinfo", update)
            .await;

        match result {
            Ok(envelope) => {
                self.fetch_profile().await;
                UpdateOutcome::success(non_empty_or(envelope.message, "Profile updated"))
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile update failed");
                UpdateOutcome::failure(err.message())
            }
        }
    }

    /// Upload a new avatar image. The backend answers with the hosted URL.
    pub async fn upload_avatar(&self, file_name: &str, bytes: Vec<u8>) -> AvatarOutcome {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let result = self
            .api
            .post_multipart::<String>("/api/auth/upload/avatar", form)
            .await
            .and_then(|envelope| envelope.into_data());

        match result {
            Ok(avatar_url) => {
                let mut session = self.inner.lock().unwrap();
                if let Some(user) = session.user.take() {
                    session.user = Some(UserProfile {
                        avatar: Some(avatar_url.clone()),
                        ..user
                    });
                }
                AvatarOutcome {
                    success: true,
                    message: "Avatar updated".to_string(),
                    avatar_url: Some(avatar_url),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "avatar upload failed");
                AvatarOutcome {
                    success: false,
                    message: err.message(),
                    avatar_url: None,
                }
            }
        }
    }

    /// Ask the backend to email a verification code. Pure forward; no
    /// local state changes.
    pub async fn send_verify_code(&self, email: &str) -> UpdateOutcome {
        let result = self
            .api
            .post_query::<String>("/api/auth/send-verify-code", &[("email", email.to_string())])
            .await;

        match result {
            Ok(envelope) => {
                UpdateOutcome::success(non_empty_or(envelope.message, "Verification code sent"))
            }
            Err(err) => UpdateOutcome::failure(err.message()),
        }
    }

    /// Check whether a username is already registered.
    pub async fn check_username(&self, username: &str) -> ApiResult<bool> {
        self.api
            .get_json::<bool>(
                "/api/auth/check-username",
                &[("username", username.to_string())],
            )
            .await?
            .into_data()
    }

    /// Verify an emailed code without consuming any other state.
    pub async fn verify_email_code(&self, email: &str, code: &str) -> ApiResult<bool> {
        let envelope = self
            .api
            .post_json::<bool, _>("/api/auth/verify-email-code", &EmailCodeRequest { email, code })
            .await?;
        Ok(envelope.data.unwrap_or(envelope.success))
    }

    /// Bind a verified email to the current account.
    pub async fn bind_email(&self, email: &str, code: &str) -> UpdateOutcome {
        let result = self
            .api
            .post_json::<String, _>(
                "/api/auth/bind-email",
                &EmailCodeRequest { email, code },
            )
            .await;

        match result {
            Ok(envelope) => {
                self.fetch_profile().await;
                UpdateOutcome::success(non_empty_or(envelope.message, "Email bound"))
            }
            Err(err) => UpdateOutcome::failure(err.message()),
        }
    }

    /// Ask the backend whether the given password matches the current one.
    pub async fn validate_password(&self, password: &str) -> ApiResult<bool> {
        let envelope = self
            .api
            .post_json::<bool, _>("/api/auth/validate-password", &PasswordCheckRequest { password })
            .await?;
        Ok(envelope.data.unwrap_or(false))
    }

    /// Sign out. Synchronous and infallible: clears the persisted token,
    /// the in-memory token, and the profile without any server round-trip.
    pub fn logout(&self) {
        self.clear_credentials();
        let mut session = self.inner.lock().unwrap();
        session.state = AuthState::Anonymous;
        session.user = None;
    }

    fn clear_credentials(&self) {
        if let Err(err) = self.vault.clear_auth_token() {
            tracing::warn!(error = %err, "failed to clear persisted token");
        }
        self.token.clear();
    }
}

impl SessionHook for SessionManager {
    fn force_logout(&self) {
        tracing::warn!("session invalidated by an unauthorized response");
        self.logout();
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Turn a failed login into the outcome the caller renders.
fn classify_login_failure(err: &ApiError) -> LoginOutcome {
    if err.is_unauthorized() {
        let remaining = err.remaining_attempts().filter(|n| *n >= 0);
        let message = match remaining {
            Some(n) => format!("Incorrect password, {} attempts remaining", n),
            None => "Invalid username or password".to_string(),
        };
        return LoginOutcome {
            success: false,
            message,
            remaining_attempts: remaining,
            is_account_locked: false,
            lock_minutes: None,
            is_system_error: false,
        };
    }

    if err.is_locked() {
        let minutes = err.lock_minutes();
        let message = match minutes {
            Some(m) => format!("Account locked, try again in {} minutes", m),
            None => "Account locked, try again later".to_string(),
        };
        return LoginOutcome {
            success: false,
            message,
            remaining_attempts: None,
            is_account_locked: true,
            lock_minutes: minutes,
            is_system_error: false,
        };
    }

    LoginOutcome {
        success: false,
        message: err.message(),
        remaining_attempts: None,
        is_account_locked: false,
        lock_minutes: None,
        is_system_error: true,
    }
}

/// Turn a failed registration into the outcome the caller renders.
fn classify_register_failure(err: &ApiError) -> RegisterOutcome {
    if err.is_conflict() {
        return RegisterOutcome {
            success: false,
            message: "Username already registered, please pick another".to_string(),
            is_username_conflict: true,
            is_validation_error: false,
            is_system_error: false,
        };
    }

    if err.is_validation() {
        return RegisterOutcome::validation_error(err.message());
    }

    RegisterOutcome {
        success: false,
        message: err.message(),
        is_username_conflict: false,
        is_validation_error: false,
        is_system_error: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_config_and_utils::Config;
    use hub_http::{NullNavigate, NullNotify, StatusCode};
    use hub_storage::{CredentialStorage, MemoryStorage, StorageResult};

    /// Delegating wrapper so tests can keep a handle on the storage a
    /// vault consumed.
    struct SharedStorage(Arc<MemoryStorage>);

    impl CredentialStorage for SharedStorage {
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.0.set(key, value)
        }
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.get(key)
        }
        fn remove(&self, key: &str) -> StorageResult<bool> {
            self.0.remove(key)
        }
    }

    fn manager_with_storage() -> (SessionManager, Arc<ApiClient>, Arc<MemoryStorage>) {
        let config = Config::default();
        let api = Arc::new(
            ApiClient::new(&config, Arc::new(NullNotify), Arc::new(NullNavigate)).unwrap(),
        );
        let storage = Arc::new(MemoryStorage::new());
        let vault = TokenVault::new(Box::new(SharedStorage(storage.clone())));
        let manager = SessionManager::new(api.clone(), vault);
        (manager, api, storage)
    }

    #[test]
    fn test_starts_anonymous() {
        let (manager, _, _) = manager_with_storage();
        assert_eq!(manager.state(), AuthState::Anonymous);
        assert!(!manager.is_authenticated());
        assert_eq!(manager.username(), "guest");
    }

    #[test]
    fn test_init_restores_persisted_token_optimistically() {
        let (manager, api, storage) = manager_with_storage();
        storage.set("auth_token", "persisted-token").unwrap();

        manager.init();

        // Authenticated before any network call completes
        assert!(manager.is_authenticated());
        assert_eq!(api.token().get(), Some("persisted-token".to_string()));
    }

    #[test]
    fn test_init_without_token_stays_anonymous() {
        let (manager, api, _) = manager_with_storage();
        manager.init();
        assert_eq!(manager.state(), AuthState::Anonymous);
        assert!(!api.token().is_present());
    }

    #[test]
    fn test_logout_is_synchronous_and_immediate() {
        let (manager, api, storage) = manager_with_storage();
        storage.set("auth_token", "persisted-token").unwrap();
        manager.init();
        assert!(manager.is_authenticated());

        manager.logout();

        assert!(!manager.is_authenticated());
        assert_eq!(manager.state(), AuthState::Anonymous);
        assert!(!api.token().is_present());
        assert_eq!(storage.get("auth_token").unwrap(), None);
    }

    #[test]
    fn test_unauthorized_response_forces_logout_and_clears_persisted_token() {
        let (manager, api, storage) = manager_with_storage();
        storage.set("auth_token", "persisted-token").unwrap();
        manager.init();
        assert!(manager.is_authenticated());

        // Any request answered with 401 runs the pipeline's forced-logout
        // transition, independent of which operation triggered it.
        let err = api.handle_failure(StatusCode::UNAUTHORIZED, b"{}");
        assert!(err.is_unauthorized());

        assert!(!manager.is_authenticated());
        assert!(!api.token().is_present());
        assert_eq!(storage.get("auth_token").unwrap(), None);
    }

    #[test]
    fn test_login_failure_message_carries_remaining_attempts() {
        for remaining in [0, 1, 3, 4] {
            let body = format!(
                r#"{{"message":"Incorrect password","data":{{"remainingAttempts":{}}}}}"#,
                remaining
            );
            let err = ApiError::from_status(StatusCode::UNAUTHORIZED, body.as_bytes());
            let outcome = classify_login_failure(&err);

            assert!(!outcome.success);
            assert_eq!(outcome.remaining_attempts, Some(remaining));
            assert!(outcome.message.contains(&remaining.to_string()));
            assert!(!outcome.is_system_error);
        }
    }

    #[test]
    fn test_login_failure_account_locked() {
        let err = ApiError::from_status(
            StatusCode::LOCKED,
            br#"{"message":"Account locked","data":{"lockMinutes":15}}"#,
        );
        let outcome = classify_login_failure(&err);

        assert!(!outcome.success);
        assert!(outcome.is_account_locked);
        assert_eq!(outcome.lock_minutes, Some(15));
        assert!(outcome.message.contains("15"));
    }

    #[test]
    fn test_login_failure_server_error_is_system_error() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b"{}");
        let outcome = classify_login_failure(&err);

        assert!(!outcome.success);
        assert!(outcome.is_system_error);
        assert!(!outcome.is_account_locked);
    }

    #[test]
    fn test_register_conflict_classification() {
        let err = ApiError::from_status(StatusCode::CONFLICT, br#"{"message":"taken"}"#);
        let outcome = classify_register_failure(&err);

        assert!(!outcome.success);
        assert!(outcome.is_username_conflict);
        assert!(!outcome.is_validation_error);
        assert!(!outcome.is_system_error);
    }

    #[test]
    fn test_register_validation_classification() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            br#"{"message":"Verification code invalid or expired"}"#,
        );
        let outcome = classify_register_failure(&err);

        assert!(!outcome.success);
        assert!(outcome.is_validation_error);
        assert!(!outcome.is_username_conflict);
        assert_eq!(outcome.message, "Verification code invalid or expired");
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input_before_network() {
        let (manager, _, _) = manager_with_storage();

        // 5-char username never reaches the wire
        let outcome = manager
            .register("abc12", "Abcdef12", "user@example.com", "123456")
            .await;
        assert!(!outcome.success);
        assert!(outcome.is_validation_error);

        // single-class password never reaches the wire
        let outcome = manager
            .register("validname", "abcdefgh", "user@example.com", "123456")
            .await;
        assert!(!outcome.success);
        assert!(outcome.is_validation_error);
    }

    #[test]
    fn test_profile_update_serialization_omits_absent_fields() {
        let update = ProfileUpdate {
            old_password: Some("Abcdef12".to_string()),
            new_password: Some("Abcdef34".to_string()),
            ..ProfileUpdate::default()
        };

        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("oldPassword"));
        assert!(json.contains("newPassword"));
        assert!(!json.contains("securityEmail"));
        assert!(!json.contains("verificationCode"));
    }
}
