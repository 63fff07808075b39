//! Compute Engine API (compute v1 and alpha)

use super::policy::{
    GET_COMPUTE_PROJECT, SET_COMMON_INSTANCE_METADATA, SET_DEFAULT_SERVICE_ACCOUNT,
    SET_PROJECT_USAGE_EXPORT_BUCKET,
};
use super::CloudAdmin;
use crate::error::Result;
use serde_json::{json, Value};

/// Report name prefix used for usage export files
pub const USAGE_REPORT_PREFIX: &str = "usage";

impl CloudAdmin {
    /// Compute Engine view of a project (quotas, common metadata, ...)
    pub async fn get_compute_project(&self, project_id: &str) -> Result<Value> {
        let path = format!("projects/{}", project_id);
        self.run(&GET_COMPUTE_PROJECT, self.session.compute.get(&path))
            .await
    }

    /// Replace the project-wide instance metadata
    ///
    /// `metadata` is sent as-is and must include the current fingerprint.
    pub async fn set_common_instance_metadata(
        &self,
        project_id: &str,
        metadata: &Value,
    ) -> Result<Value> {
        let path = format!("projects/{}/setCommonInstanceMetadata", project_id);
        self.run(
            &SET_COMMON_INSTANCE_METADATA,
            self.session.compute.post(&path, metadata),
        )
        .await
    }

    /// Set the default Compute Engine service account (alpha API)
    pub async fn set_default_service_account(
        &self,
        project_id: &str,
        service_account: &str,
    ) -> Result<Value> {
        let path = format!("projects/{}/setDefaultServiceAccount", project_id);
        let body = json!({ "email": service_account });
        self.run(
            &SET_DEFAULT_SERVICE_ACCOUNT,
            self.session.compute_alpha.post(&path, &body),
        )
        .await
    }

    /// Export usage reports to `bucket_name` with the `usage` prefix
    pub async fn set_project_usage_export_bucket(
        &self,
        project_id: &str,
        bucket_name: &str,
    ) -> Result<Value> {
        let path = format!("projects/{}/setUsageExportBucket", project_id);
        let body = json!({
            "bucketName": bucket_name,
            "reportNamePrefix": USAGE_REPORT_PREFIX,
        });
        self.run(
            &SET_PROJECT_USAGE_EXPORT_BUCKET,
            self.session.compute.post(&path, &body),
        )
        .await
    }
}
