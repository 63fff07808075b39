//! Cloud admin facade
//!
//! [`CloudAdmin`] wraps an authenticated [`Session`] and exposes one method
//! per administrative call. Methods are grouped by API in the submodules;
//! each one is declared in [`policy`] with the backend it uses and whether
//! provider errors propagate or are swallowed.
//!
//! # Module Structure
//!
//! - [`policy`] - Operation catalogue and error policies
//! - [`pagination`] - `nextPageToken` accumulation
//! - [`hierarchy`] - Folders, organizations, org path resolution
//! - [`labels`] - Label rendering
//! - [`media`] - Chunked object download
//! - [`projects`] - Project views and resource manager project calls
//!
//! # Example
//!
//! ```ignore
//! use gcpadmin::admin::CloudAdmin;
//! use gcpadmin::gcp::client::ApiEndpoints;
//!
//! async fn example() -> gcpadmin::Result<()> {
//!     let admin = CloudAdmin::authenticate(&ApiEndpoints::default()).await?;
//!     for project in admin.get_projects().await? {
//!         println!("{}", project["projectId"]);
//!     }
//!     Ok(())
//! }
//! ```

mod billing;
mod compute;
pub mod hierarchy;
mod iam;
pub mod labels;
pub mod media;
pub mod pagination;
pub mod policy;
pub mod projects;
mod service_management;
mod storage;

pub use hierarchy::{NodeKind, ParentRef};
pub use labels::{display_labels, project_labels};
pub use policy::{is_empty_result, Backend, ErrorPolicy, Operation, OPERATIONS};
pub use projects::ProjectSummary;

use crate::error::Result;
use crate::gcp::auth::TokenSource;
use crate::gcp::client::ApiEndpoints;
use crate::gcp::session::Session;
use policy::EmptyResult;
use std::future::Future;
use std::sync::Arc;

/// Administrative facade over one authenticated session
#[derive(Clone)]
pub struct CloudAdmin {
    session: Session,
}

impl CloudAdmin {
    /// Authenticate with Application Default Credentials and build every client
    pub async fn authenticate(endpoints: &ApiEndpoints) -> Result<Self> {
        let session = Session::application_default(endpoints).await?;
        Ok(Self { session })
    }

    /// Authenticate with an explicit token source
    pub async fn with_token_source(
        source: Arc<dyn TokenSource>,
        endpoints: &ApiEndpoints,
    ) -> Result<Self> {
        let session = Session::from_token_source(source, endpoints).await?;
        Ok(Self { session })
    }

    /// Wrap an existing session
    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one declared operation and apply its error policy
    async fn run<T, F>(&self, operation: &Operation, call: F) -> Result<T>
    where
        T: EmptyResult,
        F: Future<Output = Result<T>>,
    {
        tracing::debug!(
            "{} via {} ({})",
            operation.name,
            operation.backend,
            operation.policy
        );
        operation.policy.apply(operation.name, call.await)
    }
}
