//! Account and session commands.

use super::AppContext;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use session_engine::{AuthState, ProfileUpdate};
use std::io::{self, Write};
use std::path::Path;

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

/// Login with username and password.
pub async fn login(
    ctx: &AppContext,
    username: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    if ctx.session.is_authenticated() {
        output::print_success(
            &format!("Already logged in as {}", ctx.session.username()),
            format,
        );
        return Ok(());
    }

    let username = match username {
        Some(name) => name,
        None => prompt("Username")?,
    };
    if username.is_empty() {
        output::print_error("Username is required", format);
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        output::print_error("Password is required", format);
        return Ok(());
    }

    println!("Logging in...");

    let outcome = ctx.session.login(&username, &password).await;
    if outcome.success {
        output::print_success(&format!("Logged in as {}", username), format);
        return Ok(());
    }

    if outcome.is_account_locked {
        let minutes = outcome.lock_minutes.unwrap_or(0);
        output::print_error(
            &format!("Account locked, try again in {} minutes", minutes),
            format,
        );
    } else if let Some(remaining) = outcome.remaining_attempts {
        output::print_error(
            &format!("{} ({} attempts remaining)", outcome.message, remaining),
            format,
        );
    } else {
        output::print_error(&outcome.message, format);
    }

    Ok(())
}

/// Logout and clear the stored session.
pub fn logout(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    ctx.session.logout();
    output::print_success("Logged out", format);
    Ok(())
}

/// Register a new account, prompting for every field.
pub async fn register(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let username = prompt("Username")?;
    if username.is_empty() {
        output::print_error("Username is required", format);
        return Ok(());
    }

    // Surface a taken name before asking for the rest.
    if let Ok(true) = ctx.session.check_username(&username).await {
        output::print_error("Username is already taken", format);
        return Ok(());
    }

    let password = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        output::print_error("Passwords do not match", format);
        return Ok(());
    }

    let email = prompt("Email")?;
    let send = ctx.session.send_verify_code(&email).await;
    if !send.success {
        output::print_error(&send.message, format);
        return Ok(());
    }
    println!("Verification code sent to {}", email);
    let code = prompt("Verification code")?;

    let outcome = ctx
        .session
        .register(&username, &password, &email, &code)
        .await;
    if outcome.success {
        output::print_success("Account created, you can now log in", format);
    } else {
        output::print_error(&outcome.message, format);
    }

    Ok(())
}

/// Show the current authentication state.
pub async fn status(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    let state = ctx.session.state();
    match format {
        OutputFormat::Text => match state {
            AuthState::Authenticated => {
                println!("Logged in as {}", ctx.session.username());
            }
            AuthState::Anonymous | AuthState::AuthError => {
                println!("Not logged in");
            }
            AuthState::Authenticating => {
                println!("Login in progress");
            }
        },
        OutputFormat::Json => {
            let logged_in = matches!(state, AuthState::Authenticated);
            println!(
                r#"{{"logged_in":{},"username":"{}"}}"#,
                logged_in,
                ctx.session.username()
            );
        }
    }
    Ok(())
}

/// Fetch and print the signed-in user's profile.
pub async fn profile(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    if !ctx.session.is_authenticated() {
        output::print_error("Not logged in. Run 'crawlerhub login' first", format);
        return Ok(());
    }

    ctx.session.fetch_profile().await;
    let Some(user) = ctx.session.profile() else {
        output::print_error("Could not load profile", format);
        return Ok(());
    };

    match format {
        OutputFormat::Text => {
            output::print_row("Username", &user.username);
            output::print_row("Email", user.email.as_deref().unwrap_or("(not bound)"));
            if let Some(avatar) = &user.avatar {
                output::print_row("Avatar", avatar);
            }
        }
        OutputFormat::Json => output::print_json(&user),
    }
    Ok(())
}

/// Upload a new avatar image.
pub async fn avatar(ctx: &AppContext, file: &Path, format: &OutputFormat) -> Result<()> {
    if !ctx.session.is_authenticated() {
        output::print_error("Not logged in. Run 'crawlerhub login' first", format);
        return Ok(());
    }

    let bytes = std::fs::read(file)?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("avatar.png");

    let outcome = ctx.session.upload_avatar(file_name, bytes).await;
    if outcome.success {
        let url = outcome.avatar_url.unwrap_or_default();
        output::print_success(&format!("Avatar updated: {}", url), format);
    } else {
        output::print_error(&outcome.message, format);
    }
    Ok(())
}

/// Bind a security email: send a code, prompt for it, then bind.
pub async fn bind_email(ctx: &AppContext, email: &str, format: &OutputFormat) -> Result<()> {
    if !ctx.session.is_authenticated() {
        output::print_error("Not logged in. Run 'crawlerhub login' first", format);
        return Ok(());
    }

    let send = ctx.session.send_verify_code(email).await;
    if !send.success {
        output::print_error(&send.message, format);
        return Ok(());
    }
    println!("Verification code sent to {}", email);
    let code = prompt("Verification code")?;

    let outcome = ctx.session.bind_email(email, &code).await;
    if outcome.success {
        output::print_success(&outcome.message, format);
    } else {
        output::print_error(&outcome.message, format);
    }
    Ok(())
}

/// Change the account password.
pub async fn passwd(ctx: &AppContext, format: &OutputFormat) -> Result<()> {
    if !ctx.session.is_authenticated() {
        output::print_error("Not logged in. Run 'crawlerhub login' first", format);
        return Ok(());
    }

    let old_password = rpassword::prompt_password("Current password: ")?;
    match ctx.session.validate_password(&old_password).await {
        Ok(true) => {}
        Ok(false) => {
            output::print_error("Current password is incorrect", format);
            return Ok(());
        }
        Err(err) => {
            output::print_error(&err.message(), format);
            return Ok(());
        }
    }

    let new_password = rpassword::prompt_password("New password: ")?;
    let confirm = rpassword::prompt_password("Confirm new password: ")?;
    if new_password != confirm {
        output::print_error("Passwords do not match", format);
        return Ok(());
    }
    if !session_engine::validate::validate_password(&new_password) {
        output::print_error(
            "Password must be 8-20 letters and digits with at least two of uppercase, lowercase, digits",
            format,
        );
        return Ok(());
    }

    let update = ProfileUpdate {
        old_password: Some(old_password),
        new_password: Some(new_password),
        ..ProfileUpdate::default()
    };
    let outcome = ctx.session.update_profile(&update).await;
    if outcome.success {
        output::print_success("Password changed", format);
    } else {
        output::print_error(&outcome.message, format);
    }
    Ok(())
}

/// Send a verification code to an email address.
pub async fn send_code(ctx: &AppContext, email: &str, format: &OutputFormat) -> Result<()> {
    let outcome = ctx.session.send_verify_code(email).await;
    if outcome.success {
        output::print_success(&format!("Verification code sent to {}", email), format);
    } else {
        output::print_error(&outcome.message, format);
    }
    Ok(())
}
