//! HTTP request pipeline for the Crawlerhub client.
//!
//! This crate provides:
//! - [`ApiClient`]: a `reqwest` wrapper that attaches the current bearer
//!   token to every outgoing request and reacts uniformly to response
//!   failures (401 forces a logout, 5xx raises a user-facing notice)
//! - [`ApiResponse`]: the normalized response envelope every JSON endpoint
//!   is held to
//! - [`ApiError`]: the client-side error taxonomy
//! - The [`Notify`], [`Navigate`], and [`SessionHook`] seams through which
//!   the pipeline performs its only global side effects

mod client;
mod envelope;
mod error;
mod surfaces;

pub use client::{ApiClient, TokenCell, SERVER_ERROR_NOTICE};
pub use envelope::ApiResponse;
pub use error::{ApiError, ApiResult, ErrorDetail};
pub use surfaces::{Navigate, Notify, NullNavigate, NullNotify, SessionHook};

// Re-exported so callers build multipart forms without a direct reqwest dep.
pub use reqwest::multipart;
pub use reqwest::StatusCode;
