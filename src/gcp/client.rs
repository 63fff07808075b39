//! GCP API clients
//!
//! A [`ServiceClient`] is bound to one versioned API (billing v1, compute
//! alpha, ...) the way a generated discovery client would be. The
//! [`RawHttpClient`] issues plain requests against fixed URL templates for
//! endpoints that have no versioned client, currently the v2alpha1 folder
//! API.

use super::auth::GcpCredentials;
use super::http::{GcpHttpClient, RangeResponse};
use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// The administrative APIs the session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKind {
    Billing,
    Compute,
    ComputeAlpha,
    ResourceManager,
    Folders,
    Iam,
    ServiceManagement,
    Storage,
}

impl ApiKind {
    /// Every API a session builds a client for
    pub const ALL: [ApiKind; 8] = [
        ApiKind::Billing,
        ApiKind::Compute,
        ApiKind::ComputeAlpha,
        ApiKind::ResourceManager,
        ApiKind::Folders,
        ApiKind::Iam,
        ApiKind::ServiceManagement,
        ApiKind::Storage,
    ];

    /// Short name, used in logs and errors
    pub fn name(self) -> &'static str {
        match self {
            ApiKind::Billing => "cloudbilling v1",
            ApiKind::Compute => "compute v1",
            ApiKind::ComputeAlpha => "compute alpha",
            ApiKind::ResourceManager => "cloudresourcemanager v1",
            ApiKind::Folders => "cloudresourcemanager v2alpha1",
            ApiKind::Iam => "iam v1",
            ApiKind::ServiceManagement => "servicemanagement v1",
            ApiKind::Storage => "storage v1",
        }
    }

    /// Path below the endpoint root where this API's resources live
    pub fn service_path(self) -> &'static str {
        match self {
            ApiKind::Billing => "v1/",
            ApiKind::Compute => "compute/v1/",
            ApiKind::ComputeAlpha => "compute/alpha/",
            ApiKind::ResourceManager => "v1/",
            ApiKind::Folders => "v2alpha1/",
            ApiKind::Iam => "v1/",
            ApiKind::ServiceManagement => "v1/",
            ApiKind::Storage => "storage/v1/",
        }
    }

    /// Endpoint root configured for this API
    pub fn root(self, endpoints: &ApiEndpoints) -> &str {
        match self {
            ApiKind::Billing => &endpoints.billing,
            ApiKind::Compute | ApiKind::ComputeAlpha => &endpoints.compute,
            ApiKind::ResourceManager | ApiKind::Folders => &endpoints.resource_manager,
            ApiKind::Iam => &endpoints.iam,
            ApiKind::ServiceManagement => &endpoints.service_management,
            ApiKind::Storage => &endpoints.storage,
        }
    }
}

/// Endpoint roots for each API group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEndpoints {
    pub billing: String,
    pub compute: String,
    pub resource_manager: String,
    pub iam: String,
    pub service_management: String,
    pub storage: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            billing: "https://cloudbilling.googleapis.com/".to_string(),
            compute: "https://compute.googleapis.com/".to_string(),
            resource_manager: "https://cloudresourcemanager.googleapis.com/".to_string(),
            iam: "https://iam.googleapis.com/".to_string(),
            service_management: "https://servicemanagement.googleapis.com/".to_string(),
            storage: "https://storage.googleapis.com/".to_string(),
        }
    }
}

impl ApiEndpoints {
    /// Point every API at the same root (emulators, mock servers)
    pub fn uniform(root: &str) -> Self {
        Self {
            billing: root.to_string(),
            compute: root.to_string(),
            resource_manager: root.to_string(),
            iam: root.to_string(),
            service_management: root.to_string(),
            storage: root.to_string(),
        }
    }
}

/// Resolve the base URL for an API, e.g. `https://compute.googleapis.com/compute/v1/`
fn base_url(api: ApiKind, endpoints: &ApiEndpoints) -> Result<Url> {
    let construction = |reason: String| AdminError::ClientConstruction {
        api: api.name(),
        reason,
    };

    let mut root = api.root(endpoints).to_string();
    if !root.ends_with('/') {
        root.push('/');
    }

    let root = Url::parse(&root).map_err(|e| construction(format!("bad endpoint '{}': {}", root, e)))?;
    if !matches!(root.scheme(), "http" | "https") || root.cannot_be_a_base() {
        return Err(construction(format!("endpoint '{}' is not an http(s) base URL", root)));
    }

    root.join(api.service_path())
        .map_err(|e| construction(e.to_string()))
}

/// Client bound to one versioned GCP API
#[derive(Clone)]
pub struct ServiceClient {
    api: ApiKind,
    base: Url,
    credentials: GcpCredentials,
    http: GcpHttpClient,
}

impl ServiceClient {
    /// Build a client for `api` using the shared credentials and transport
    pub fn new(
        api: ApiKind,
        endpoints: &ApiEndpoints,
        credentials: GcpCredentials,
        http: GcpHttpClient,
    ) -> Result<Self> {
        let base = base_url(api, endpoints)?;
        tracing::debug!("Built {} client at {}", api.name(), base);
        Ok(Self {
            api,
            base,
            credentials,
            http,
        })
    }

    pub fn api(&self) -> ApiKind {
        self.api
    }

    /// Build a URL for a resource path relative to this API's base
    ///
    /// Paths are appended verbatim so custom verbs like
    /// `projects/p:setIamPolicy` survive.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        let token = self.credentials.get_token().await?;
        self.http.get(&self.url(path), &token).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let token = self.credentials.get_token().await?;
        self.http.post(&self.url(path), &token, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        let token = self.credentials.get_token().await?;
        self.http.put(&self.url(path), &token, body).await
    }

    /// Fetch an inclusive byte range of a media resource
    pub async fn get_range(&self, path: &str, start: u64, end: u64) -> Result<RangeResponse> {
        let token = self.credentials.get_token().await?;
        self.http.get_range(&self.url(path), &token, start, end).await
    }
}

/// Plain authorized HTTP client for fixed URL templates
#[derive(Clone)]
pub struct RawHttpClient {
    base: Url,
    credentials: GcpCredentials,
    http: GcpHttpClient,
}

impl RawHttpClient {
    pub fn new(
        api: ApiKind,
        endpoints: &ApiEndpoints,
        credentials: GcpCredentials,
        http: GcpHttpClient,
    ) -> Result<Self> {
        let base = base_url(api, endpoints)?;
        Ok(Self {
            base,
            credentials,
            http,
        })
    }

    /// GET `<base><path>` and parse the JSON body
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base, path);
        let token = self.credentials.get_token().await?;
        self.http.get(&url, &token).await
    }
}
