//! GCP Authentication
//!
//! Handles authentication using Application Default Credentials (ADC),
//! service account keys, or gcloud CLI credentials, and discovery of the
//! default project from the gcloud configuration.

use crate::error::{AdminError, Result};
use async_trait::async_trait;
use gcp_auth::TokenProvider;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default scopes for GCP API access
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Default token TTL if we can't determine expiry (conservative: 30 minutes)
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

/// Anything that can hand out OAuth2 access tokens
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch a fresh access token
    async fn fetch_token(&self) -> Result<String>;
}

/// Token source backed by Application Default Credentials
pub struct AdcTokenSource {
    provider: Arc<dyn TokenProvider>,
}

impl AdcTokenSource {
    /// Discover credentials from the environment
    pub async fn discover() -> Result<Self> {
        let provider = gcp_auth::provider().await.map_err(|e| {
            AdminError::Authentication(format!("no application default credentials: {}", e))
        })?;
        Ok(Self { provider })
    }
}

#[async_trait]
impl TokenSource for AdcTokenSource {
    async fn fetch_token(&self) -> Result<String> {
        let token = self
            .provider
            .token(DEFAULT_SCOPES)
            .await
            .map_err(|e| AdminError::Authentication(format!("failed to get access token: {}", e)))?;
        Ok(token.as_str().to_string())
    }
}

/// Fixed token, for emulators and tests
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn fetch_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// GCP credentials holder with token caching
#[derive(Clone)]
pub struct GcpCredentials {
    source: Arc<dyn TokenSource>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

impl GcpCredentials {
    /// Wrap a token source
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Create credentials from Application Default Credentials
    pub async fn application_default() -> Result<Self> {
        let source = AdcTokenSource::discover().await?;
        Ok(Self::new(Arc::new(source)))
    }

    /// Get an access token for API calls
    pub async fn get_token(&self) -> Result<String> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let token = self.source.fetch_token().await?;
        let expires_at = Instant::now() + DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER;

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at,
            });
        }

        tracing::debug!(
            "New token cached, expires in ~{} minutes",
            (DEFAULT_TOKEN_TTL - TOKEN_EXPIRY_BUFFER).as_secs() / 60
        );

        Ok(token)
    }
}

/// Get the gcloud configuration directory
pub fn get_gcloud_config_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CLOUDSDK_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|p| p.join("gcloud"))
}

/// Validate a GCP project ID format
/// Project IDs must be 6-30 characters, lowercase letters, digits, and hyphens
/// Must start with a letter and cannot end with a hyphen
pub fn validate_project_id(project: &str) -> bool {
    if project.len() < 6 || project.len() > 30 {
        return false;
    }

    match project.chars().next() {
        Some(c) if c.is_ascii_lowercase() => {},
        _ => return false,
    }

    if project.ends_with('-') {
        return false;
    }

    project
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Pull `project = <id>` out of an INI-style gcloud file
///
/// With `section` set, only keys inside that section count.
fn project_from_ini(content: &str, section: Option<&str>) -> Option<String> {
    let mut in_section = section.is_none();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') {
            if let Some(wanted) = section {
                in_section = line == wanted;
            }
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "project" {
                let project = value.trim();
                if validate_project_id(project) {
                    return Some(project.to_string());
                }
            }
        }
    }
    None
}

/// Read the default project from the environment or gcloud configuration
/// Security: Validates project ID format before returning
pub fn get_default_project() -> Option<String> {
    for var in ["CLOUDSDK_CORE_PROJECT", "GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"] {
        if let Ok(project) = std::env::var(var) {
            if validate_project_id(&project) {
                return Some(project);
            }
            tracing::warn!("Invalid project ID format in {}", var);
        }
    }

    let config_dir = get_gcloud_config_dir()?;

    if let Ok(content) = std::fs::read_to_string(config_dir.join("properties")) {
        if let Some(project) = project_from_ini(&content, None) {
            return Some(project);
        }
    }

    let active_config = std::fs::read_to_string(config_dir.join("active_config")).ok()?;
    let config_name = active_config.trim();

    // Security: Validate config name to prevent path traversal
    if !config_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        tracing::warn!("Invalid characters in active_config name");
        return None;
    }

    let config_path = config_dir
        .join("configurations")
        .join(format!("config_{}", config_name));
    let content = std::fs::read_to_string(config_path).ok()?;
    project_from_ini(&content, Some("[core]"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource(AtomicUsize);

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch_token(&self) -> Result<String> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(format!("token-{}", n))
        }
    }

    #[tokio::test]
    async fn test_token_is_cached_across_clones() {
        let credentials = GcpCredentials::new(Arc::new(CountingSource(AtomicUsize::new(0))));
        let shared = credentials.clone();

        assert_eq!(credentials.get_token().await.unwrap(), "token-0");
        assert_eq!(credentials.get_token().await.unwrap(), "token-0");
        assert_eq!(shared.get_token().await.unwrap(), "token-0");
    }

    #[tokio::test]
    async fn test_static_token() {
        let credentials = GcpCredentials::new(Arc::new(StaticToken("abc".to_string())));
        assert_eq!(credentials.get_token().await.unwrap(), "abc");
    }

    #[test]
    fn test_validate_project_id() {
        assert!(validate_project_id("my-project-123"));
        assert!(!validate_project_id("short"));
        assert!(!validate_project_id("1starts-with-digit"));
        assert!(!validate_project_id("ends-with-hyphen-"));
        assert!(!validate_project_id("Has-Uppercase"));
    }

    #[test]
    fn test_project_from_ini_respects_section() {
        let content = "[compute]\nproject = wrong-section\n[core]\n# comment\nproject = right-project\n";
        assert_eq!(
            project_from_ini(content, Some("[core]")),
            Some("right-project".to_string())
        );
        assert_eq!(
            project_from_ini(content, None),
            Some("wrong-section".to_string())
        );
        assert_eq!(project_from_ini("[core]\naccount = a@b.c\n", Some("[core]")), None);
    }
}
