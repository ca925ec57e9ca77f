//! File system paths for the client.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Manages file system paths for the client.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for client files (~/.crawlerhub)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.crawlerhub`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".crawlerhub"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.crawlerhub).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.crawlerhub/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the credentials file path (~/.crawlerhub/credentials.json).
    pub fn credentials_file(&self) -> PathBuf {
        self.base_dir.join("credentials.json")
    }

    /// Get the directory for exported task data (~/.crawlerhub/exports).
    pub fn exports_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.exports_dir())?;
        Ok(())
    }
}
