//! S3 object store adapter.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use stash_core::ports::ObjectStore;
use stash_core::{Error, Result};
use std::collections::HashMap;

/// Cache objects in an S3 (or S3-compatible) bucket, with archive metadata
/// carried as S3 user metadata.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the default credential/region chain.
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn exists(&self, key: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                if err
                    .as_service_error()
                    .is_some_and(|service_err| service_err.is_not_found())
                {
                    return Ok(false);
                }
                Err(Error::Store(format!(
                    "head {} failed: {}",
                    key,
                    DisplayErrorContext(&err)
                )))
            }
        }
    }

    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        metadata: HashMap<String, String>,
    ) -> Result<()> {
        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body));
        for (name, value) in metadata {
            request = request.metadata(name, value);
        }
        request
            .send()
            .await
            .map_err(|e| Error::Store(format!("put {} failed: {}", key, DisplayErrorContext(&e))))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<(Vec<u8>, HashMap<String, String>)> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Store(format!("get {} failed: {}", key, DisplayErrorContext(&e))))?;

        let metadata = output.metadata().cloned().unwrap_or_default();
        let body = output
            .body
            .collect()
            .await
            .map_err(|e| Error::Store(format!("read body of {} failed: {}", key, e)))?
            .into_bytes()
            .to_vec();
        Ok((body, metadata))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        // DeleteObject on an absent key succeeds, so clear stays idempotent.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                Error::Store(format!("delete {} failed: {}", key, DisplayErrorContext(&e)))
            })?;
        Ok(())
    }
}
