//! Cloud Storage API (storage v1)

use super::media::{MediaDownload, StorageMedia};
use super::policy::{CREATE_BUCKET, GET_BUCKET, GET_BUCKET_OBJECT};
use super::CloudAdmin;
use crate::error::Result;
use serde_json::{json, Value};

impl CloudAdmin {
    /// Create a bucket in `project` with default settings
    pub async fn create_bucket(&self, project: &str, bucket: &str) -> Result<Value> {
        let path = format!("b?project={}", urlencoding::encode(project));
        let body = json!({ "name": bucket });
        self.run(&CREATE_BUCKET, self.session.storage.post(&path, &body))
            .await
    }

    /// Bucket metadata
    pub async fn get_bucket(&self, bucket: &str) -> Result<Value> {
        let path = format!("b/{}", urlencoding::encode(bucket));
        self.run(&GET_BUCKET, self.session.storage.get(&path)).await
    }

    /// Full content of an object, downloaded in 1 MiB chunks
    pub async fn get_bucket_object(&self, bucket: &str, object: &str) -> Result<Vec<u8>> {
        let media = StorageMedia::new(&self.session.storage, bucket, object);
        self.run(&GET_BUCKET_OBJECT, MediaDownload::new(media).download_all())
            .await
    }
}
