//! Service Management API (servicemanagement v1)

use super::policy::{ENABLE_PROJECT_SERVICE, GET_SERVICE_OPERATION};
use super::CloudAdmin;
use crate::error::Result;
use serde_json::{json, Value};

impl CloudAdmin {
    /// Enable `service_name` for a project; returns the long-running operation
    pub async fn enable_project_service(
        &self,
        project_id: &str,
        service_name: &str,
    ) -> Result<Value> {
        let path = format!("services/{}:enable", service_name);
        let body = json!({ "consumerId": format!("project:{}", project_id) });
        self.run(&ENABLE_PROJECT_SERVICE, self.session.smgt.post(&path, &body))
            .await
    }

    /// Get an operation by name (`operations/<id>`)
    pub async fn get_service_operation(&self, operation: &str) -> Result<Value> {
        self.run(&GET_SERVICE_OPERATION, self.session.smgt.get(operation))
            .await
    }
}
