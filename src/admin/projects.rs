//! GCP Projects
//!
//! Resource manager v1 project calls and a display view over project
//! payloads.

use super::hierarchy::ParentRef;
use super::labels::{display_labels, project_labels};
use super::pagination::{collect_pages, with_page_token};
use super::policy::{CREATE_PROJECT, GET_PROJECT, GET_PROJECTS, SET_IAM_POLICY, UPDATE_PROJECT};
use super::CloudAdmin;
use crate::error::Result;
use serde::Serialize;
use serde_json::{json, Value};

/// Project information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub project_id: String,
    pub name: String,
    pub project_number: String,
    pub lifecycle_state: String,
    /// Rendered `k=v,k=v` labels
    pub labels: String,
    pub parent: Option<ParentRef>,
}

impl From<&Value> for ProjectSummary {
    fn from(value: &Value) -> Self {
        let field = |key: &str, default: &str| {
            value
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or(default)
                .to_string()
        };

        Self {
            project_id: field("projectId", "-"),
            name: field("name", "-"),
            project_number: field("projectNumber", "-"),
            lifecycle_state: field("lifecycleState", "UNKNOWN"),
            labels: display_labels(&project_labels(value)),
            parent: ParentRef::of_project(value).ok().flatten(),
        }
    }
}

impl ProjectSummary {
    pub fn is_active(&self) -> bool {
        self.lifecycle_state == "ACTIVE"
    }
}

impl CloudAdmin {
    /// Create a project from a full project body
    ///
    /// Provider errors are logged and an empty object is returned.
    pub async fn create_project(&self, project: &Value) -> Result<Value> {
        self.run(&CREATE_PROJECT, self.session.crm.post("projects", project))
            .await
    }

    /// Get a project by id
    pub async fn get_project(&self, project_id: &str) -> Result<Value> {
        let path = format!("projects/{}", project_id);
        self.run(&GET_PROJECT, self.session.crm.get(&path)).await
    }

    /// Every project visible to the caller, in provider order
    pub async fn get_projects(&self) -> Result<Vec<Value>> {
        self.run(
            &GET_PROJECTS,
            collect_pages("projects", move |token| async move {
                let path = with_page_token("projects", token.as_deref());
                self.session.crm.get(&path).await
            }),
        )
        .await
    }

    /// Replace the project's IAM policy
    ///
    /// Provider errors are logged and an empty object is returned.
    pub async fn set_iam_policy(&self, project_id: &str, policy: &Value) -> Result<Value> {
        let path = format!("projects/{}:setIamPolicy", project_id);
        let body = json!({ "policy": policy });
        self.run(&SET_IAM_POLICY, self.session.crm.post(&path, &body))
            .await
    }

    /// Replace a project resource wholesale
    ///
    /// Provider errors are logged and an empty object is returned.
    pub async fn update_project(&self, project_id: &str, body: &Value) -> Result<Value> {
        let path = format!("projects/{}", project_id);
        self.run(&UPDATE_PROJECT, self.session.crm.put(&path, body))
            .await
    }
}
