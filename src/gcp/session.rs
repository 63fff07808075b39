//! Authenticated session
//!
//! Holds one client per API, all bound to the
//! same credentials and HTTP transport. Built once, never mutated.

use super::auth::{GcpCredentials, TokenSource};
use super::client::{ApiEndpoints, ApiKind, RawHttpClient, ServiceClient};
use super::http::GcpHttpClient;
use crate::error::{AdminError, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct Session {
    pub billing: ServiceClient,
    pub compute: ServiceClient,
    pub compute_alpha: ServiceClient,
    pub crm: ServiceClient,
    pub iam: ServiceClient,
    pub smgt: ServiceClient,
    pub storage: ServiceClient,
    /// Direct-HTTP client for the v2alpha1 folder API
    pub folders: RawHttpClient,
}

impl Session {
    /// Authenticate with Application Default Credentials
    pub async fn application_default(endpoints: &ApiEndpoints) -> Result<Self> {
        let credentials = GcpCredentials::application_default().await?;
        Self::build(credentials, endpoints).await
    }

    /// Authenticate with an explicit token source
    pub async fn from_token_source(
        source: Arc<dyn TokenSource>,
        endpoints: &ApiEndpoints,
    ) -> Result<Self> {
        Self::build(GcpCredentials::new(source), endpoints).await
    }

    async fn build(credentials: GcpCredentials, endpoints: &ApiEndpoints) -> Result<Self> {
        // Prove the credentials work before building anything on top of them
        credentials.get_token().await.map_err(|e| match e {
            AdminError::Authentication(_) => e,
            other => AdminError::Authentication(other.to_string()),
        })?;

        let http = GcpHttpClient::new().map_err(|e| AdminError::ClientConstruction {
            api: "http transport",
            reason: e.to_string(),
        })?;

        let service = |api: ApiKind| {
            ServiceClient::new(api, endpoints, credentials.clone(), http.clone())
        };

        let session = Self {
            billing: service(ApiKind::Billing)?,
            compute: service(ApiKind::Compute)?,
            compute_alpha: service(ApiKind::ComputeAlpha)?,
            crm: service(ApiKind::ResourceManager)?,
            iam: service(ApiKind::Iam)?,
            smgt: service(ApiKind::ServiceManagement)?,
            storage: service(ApiKind::Storage)?,
            folders: RawHttpClient::new(
                ApiKind::Folders,
                endpoints,
                credentials.clone(),
                http,
            )?,
        };

        tracing::info!("Authenticated session ready ({} APIs)", ApiKind::ALL.len());
        Ok(session)
    }
}
