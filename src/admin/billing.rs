//! Cloud Billing API (cloudbilling v1)

use super::pagination::{collect_pages, with_page_token};
use super::policy::{ENABLE_PROJECT_BILLING, GET_BILLING_ACCOUNTS};
use super::CloudAdmin;
use crate::error::Result;
use serde_json::{json, Value};

impl CloudAdmin {
    /// Link a project to a billing account and turn billing on
    pub async fn enable_project_billing(
        &self,
        project_id: &str,
        billing_account_name: &str,
    ) -> Result<Value> {
        let body = json!({
            "projectId": project_id,
            "billingAccountName": billing_account_name,
            "billingEnabled": true,
        });

        self.run(
            &ENABLE_PROJECT_BILLING,
            self.session
                .billing
                .put(&format!("projects/{}/billingInfo", project_id), &body),
        )
        .await
    }

    /// Every billing account visible to the caller
    pub async fn get_billing_accounts(&self) -> Result<Vec<Value>> {
        self.run(
            &GET_BILLING_ACCOUNTS,
            collect_pages("billingAccounts", move |token| async move {
                let path = with_page_token("billingAccounts", token.as_deref());
                self.session.billing.get(&path).await
            }),
        )
        .await
    }
}
