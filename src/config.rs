//! Configuration Management
//!
//! Handles persistent configuration storage for gcpadmin.

use crate::gcp::client::ApiEndpoints;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Last used project ID
    #[serde(default)]
    pub project_id: Option<String>,
    /// Endpoint roots, overridable per API
    #[serde(default)]
    pub endpoints: ApiEndpoints,
}

impl Config {
    /// Directory holding the config file and the log
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcpadmin"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path; missing or unreadable files give the default
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective project (CLI > config > gcloud default)
    pub fn effective_project(&self, cli: Option<&str>) -> Option<String> {
        cli.map(|p| p.to_string())
            .or_else(|| self.project_id.clone())
            .or_else(crate::gcp::auth::get_default_project)
    }

    /// Endpoints with an optional single root overriding every API
    pub fn effective_endpoints(&self, api_root: Option<&str>) -> ApiEndpoints {
        match api_root {
            Some(root) => ApiEndpoints::uniform(root),
            None => self.endpoints.clone(),
        }
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: &str) -> anyhow::Result<()> {
        self.project_id = Some(project_id.to_string());
        self.save()
    }
}
