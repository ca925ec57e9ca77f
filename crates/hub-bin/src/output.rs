//! Output formatting for the CLI.

use clap::ValueEnum;
use hub_http::{Navigate, Notify};
use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a serializable value as pretty JSON. Callers pick this arm only
/// when the requested format is JSON.
pub fn print_json<T: Serialize>(value: &T) {
    if let Ok(json) = serde_json::to_string_pretty(value) {
        println!("{}", json);
    }
}

/// Print a success message.
pub fn print_success(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", message),
        OutputFormat::Json => {
            println!(r#"{{"status":"success","message":"{}"}}"#, message);
        }
    }
}

/// Print an error message.
pub fn print_error(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("Error: {}", message),
        OutputFormat::Json => {
            eprintln!(r#"{{"status":"error","message":"{}"}}"#, message);
        }
    }
}

/// Print a table row.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", label), value);
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "-".repeat(50));
}

/// Toast surface for the request pipeline: notices land on the terminal.
pub struct TerminalNotify;

impl Notify for TerminalNotify {
    fn success(&self, message: &str) {
        println!("{}", message);
    }
    fn error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
    fn warning(&self, message: &str) {
        eprintln!("Warning: {}", message);
    }
    fn info(&self, message: &str) {
        println!("{}", message);
    }
}

/// Navigation surface: a CLI has no login view, so point at the command.
pub struct TerminalNavigate;

impl Navigate for TerminalNavigate {
    fn to_login(&self) {
        eprintln!("Session expired. Run 'crawlerhub login' to sign in again.");
    }
}
