//! Operation catalogue
//!
//! Every facade operation is declared here with the backend it reaches the
//! provider through and what happens when the provider rejects the call.
//! Most operations propagate errors. A few (project create/update, IAM
//! policy set, service account create) log the provider's message and hand
//! back an empty object instead, so callers of those must check for
//! emptiness.

use crate::error::{AdminError, Result};
use serde_json::{Map, Value};
use std::fmt;

/// Which client an operation goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Versioned per-API service client
    ServiceClient,
    /// Plain authorized HTTP against a fixed URL template
    DirectHttp,
    /// Service clients and direct HTTP together
    Composite,
    /// No remote call at all
    Local,
}

/// How the provider's message is rendered when an error is swallowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Full,
    /// Only the text after the last `/`
    LastSegment,
}

impl MessageStyle {
    pub fn render(self, message: &str) -> &str {
        match self {
            MessageStyle::Full => message,
            MessageStyle::LastSegment => message.rsplit('/').next().unwrap_or(message),
        }
    }
}

/// What an operation does with a provider error response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    Propagates,
    SwallowsReturnsEmpty(MessageStyle),
}

/// Results that have an "empty" shape to fall back to
pub trait EmptyResult {
    fn empty() -> Self;
}

impl EmptyResult for Value {
    fn empty() -> Self {
        Value::Object(Map::new())
    }
}

impl<T> EmptyResult for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }
}

impl EmptyResult for String {
    fn empty() -> Self {
        String::new()
    }
}

/// True for the `{}` a swallowing operation returns on failure
pub fn is_empty_result(value: &Value) -> bool {
    value.as_object().is_some_and(|m| m.is_empty())
}

impl ErrorPolicy {
    /// Apply the policy to the outcome of `operation`
    ///
    /// Only provider error responses are swallowed; transport and decoding
    /// failures always propagate.
    pub fn apply<T: EmptyResult>(self, operation: &str, result: Result<T>) -> Result<T> {
        match (self, result) {
            (_, Ok(value)) => Ok(value),
            (ErrorPolicy::SwallowsReturnsEmpty(style), Err(AdminError::Api { status, message })) => {
                tracing::warn!(
                    operation,
                    status,
                    "[{}]",
                    style.render(&message)
                );
                Ok(T::empty())
            },
            (_, Err(e)) => Err(e),
        }
    }
}

/// A declared facade operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub backend: Backend,
    pub policy: ErrorPolicy,
}

impl Operation {
    const fn propagating(name: &'static str, backend: Backend) -> Self {
        Self {
            name,
            backend,
            policy: ErrorPolicy::Propagates,
        }
    }

    const fn swallowing(name: &'static str, style: MessageStyle) -> Self {
        Self {
            name,
            backend: Backend::ServiceClient,
            policy: ErrorPolicy::SwallowsReturnsEmpty(style),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::ServiceClient => "service-client",
            Backend::DirectHttp => "direct-http",
            Backend::Composite => "composite",
            Backend::Local => "local",
        })
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorPolicy::Propagates => "propagates",
            ErrorPolicy::SwallowsReturnsEmpty(_) => "swallows-returns-empty",
        })
    }
}

use Backend::{Composite, DirectHttp, Local, ServiceClient};

// Cloud Billing
pub const ENABLE_PROJECT_BILLING: Operation = Operation::propagating("enable_project_billing", ServiceClient);
pub const GET_BILLING_ACCOUNTS: Operation = Operation::propagating("get_billing_accounts", ServiceClient);

// Compute Engine
pub const GET_COMPUTE_PROJECT: Operation = Operation::propagating("get_compute_project", ServiceClient);
pub const SET_COMMON_INSTANCE_METADATA: Operation =
    Operation::propagating("set_common_instance_metadata", ServiceClient);
pub const SET_DEFAULT_SERVICE_ACCOUNT: Operation =
    Operation::propagating("set_default_service_account", ServiceClient);
pub const SET_PROJECT_USAGE_EXPORT_BUCKET: Operation =
    Operation::propagating("set_project_usage_export_bucket", ServiceClient);

// Cloud Resource Manager
pub const CREATE_PROJECT: Operation = Operation::swallowing("create_project", MessageStyle::Full);
pub const GET_FOLDER: Operation = Operation::propagating("get_folder", DirectHttp);
pub const GET_FOLDERS: Operation = Operation::propagating("get_folders", DirectHttp);
pub const GET_ORGANIZATION: Operation = Operation::propagating("get_organization", ServiceClient);
pub const GET_ORGANIZATIONS: Operation = Operation::propagating("get_organizations", ServiceClient);
pub const GET_PROJECT: Operation = Operation::propagating("get_project", ServiceClient);
pub const GET_PROJECTS: Operation = Operation::propagating("get_projects", ServiceClient);
pub const SET_IAM_POLICY: Operation = Operation::swallowing("set_iam_policy", MessageStyle::Full);
pub const UPDATE_PROJECT: Operation = Operation::swallowing("update_project", MessageStyle::Full);
pub const RESOLVE_ORG_PATH: Operation = Operation::propagating("resolve_org_path", Composite);

// IAM
pub const CREATE_SERVICE_ACCOUNT: Operation =
    Operation::swallowing("create_service_account", MessageStyle::LastSegment);

// Service Management
pub const ENABLE_PROJECT_SERVICE: Operation = Operation::propagating("enable_project_service", ServiceClient);
pub const GET_SERVICE_OPERATION: Operation = Operation::propagating("get_service_operation", ServiceClient);

// Cloud Storage
pub const CREATE_BUCKET: Operation = Operation::propagating("create_bucket", ServiceClient);
pub const GET_BUCKET: Operation = Operation::propagating("get_bucket", ServiceClient);
pub const GET_BUCKET_OBJECT: Operation = Operation::propagating("get_bucket_object", ServiceClient);

// Local
pub const DISPLAY_LABELS: Operation = Operation::propagating("display_labels", Local);

/// Every operation the facade exposes
pub const OPERATIONS: &[Operation] = &[
    ENABLE_PROJECT_BILLING,
    GET_BILLING_ACCOUNTS,
    GET_COMPUTE_PROJECT,
    SET_COMMON_INSTANCE_METADATA,
    SET_DEFAULT_SERVICE_ACCOUNT,
    SET_PROJECT_USAGE_EXPORT_BUCKET,
    CREATE_PROJECT,
    GET_FOLDER,
    GET_FOLDERS,
    GET_ORGANIZATION,
    GET_ORGANIZATIONS,
    GET_PROJECT,
    GET_PROJECTS,
    SET_IAM_POLICY,
    UPDATE_PROJECT,
    RESOLVE_ORG_PATH,
    CREATE_SERVICE_ACCOUNT,
    ENABLE_PROJECT_SERVICE,
    GET_SERVICE_OPERATION,
    CREATE_BUCKET,
    GET_BUCKET,
    GET_BUCKET_OBJECT,
    DISPLAY_LABELS,
];

/// Look up a declared operation by name
pub fn find_operation(name: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.name == name)
}
