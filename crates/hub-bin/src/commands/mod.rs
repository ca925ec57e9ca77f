//! CLI command implementations.

mod auth;
mod tasks;

pub use auth::{avatar, bind_email, login, logout, passwd, profile, register, send_code, status};
pub use tasks::{
    tasks_analyze, tasks_analyze_status, tasks_create, tasks_delete, tasks_export, tasks_list,
    tasks_ppt, tasks_pause, tasks_price_ranks, tasks_reviews, tasks_run, tasks_show,
};

use crate::output::{TerminalNavigate, TerminalNotify};
use anyhow::Result;
use crawler_api::TaskClient;
use hub_config_and_utils::{Config, Paths};
use hub_http::ApiClient;
use session_engine::SessionManager;
use std::sync::Arc;

/// Everything a command needs: the session and the task client, both over
/// the one shared pipeline.
pub struct AppContext {
    pub session: SessionManager,
    pub tasks: TaskClient,
}

impl AppContext {
    /// Wire up config, storage, pipeline, and session, and restore any
    /// persisted session.
    pub fn bootstrap() -> Result<Self> {
        let paths = Paths::new()?;
        let config = Config::load(&paths)?;
        tracing::debug!(api_base_url = %config.api_base_url, "loaded configuration");

        let api = Arc::new(ApiClient::new(
            &config,
            Arc::new(TerminalNotify),
            Arc::new(TerminalNavigate),
        )?);

        let vault = hub_storage::create_token_vault(&paths)?;
        let session = SessionManager::new(api.clone(), vault);
        session.init();

        Ok(Self {
            session,
            tasks: TaskClient::new(api),
        })
    }
}
