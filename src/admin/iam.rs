//! IAM API (iam v1)

use super::policy::CREATE_SERVICE_ACCOUNT;
use super::CloudAdmin;
use crate::error::Result;
use serde_json::{json, Value};

impl CloudAdmin {
    /// Create a service account; the display name defaults to the account id
    ///
    /// Provider errors are logged and an empty object is returned.
    pub async fn create_service_account(
        &self,
        project_id: &str,
        account_id: &str,
        display_name: Option<&str>,
    ) -> Result<Value> {
        let display_name = display_name
            .filter(|name| !name.is_empty())
            .unwrap_or(account_id);
        let body = json!({
            "accountId": account_id,
            "serviceAccount": {
                "displayName": display_name,
            },
        });
        let path = format!("projects/{}/serviceAccounts", project_id);

        self.run(&CREATE_SERVICE_ACCOUNT, self.session.iam.post(&path, &body))
            .await
    }
}
