use std::sync::OnceLock;

use async_trait::async_trait;

use super::types::{
    AddKeyRequest, BucketInfo, BucketKeyPermRequest, ImportKeyRequest, KeyInfo,
    UpdateBucketRequest, UpdateKeyRequest,
};
use super::{AdminApi, AdminClient};
use crate::config::Config;
use crate::error::Error;

/// An [`AdminClient`] built on the first remote call.
///
/// Controllers whose reads never leave local state can run without a host
/// or token; configuration errors surface only once a request is made.
#[derive(Debug)]
pub struct LazyAdminClient {
    config: Config,
    client: OnceLock<AdminClient>,
}

impl LazyAdminClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: OnceLock::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.get().is_some()
    }

    fn get(&self) -> Result<&AdminClient, Error> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = AdminClient::new(&self.config)?;
        Ok(self.client.get_or_init(|| client))
    }
}

#[async_trait]
impl AdminApi for LazyAdminClient {
    async fn create_bucket(&self) -> Result<BucketInfo, Error> {
        self.get()?.create_bucket().await
    }

    async fn get_bucket(&self, id: &str) -> Result<BucketInfo, Error> {
        self.get()?.get_bucket(id).await
    }

    async fn update_bucket(
        &self,
        id: &str,
        request: &UpdateBucketRequest,
    ) -> Result<BucketInfo, Error> {
        self.get()?.update_bucket(id, request).await
    }

    async fn delete_bucket(&self, id: &str) -> Result<(), Error> {
        self.get()?.delete_bucket(id).await
    }

    async fn add_key(&self, request: &AddKeyRequest) -> Result<KeyInfo, Error> {
        self.get()?.add_key(request).await
    }

    async fn import_key(&self, request: &ImportKeyRequest) -> Result<KeyInfo, Error> {
        self.get()?.import_key(request).await
    }

    async fn get_key(&self, id: &str) -> Result<KeyInfo, Error> {
        self.get()?.get_key(id).await
    }

    async fn update_key(&self, id: &str, request: &UpdateKeyRequest) -> Result<KeyInfo, Error> {
        self.get()?.update_key(id, request).await
    }

    async fn delete_key(&self, id: &str) -> Result<(), Error> {
        self.get()?.delete_key(id).await
    }

    async fn allow_bucket_key(&self, request: &BucketKeyPermRequest) -> Result<BucketInfo, Error> {
        self.get()?.allow_bucket_key(request).await
    }

    async fn deny_bucket_key(&self, request: &BucketKeyPermRequest) -> Result<BucketInfo, Error> {
        self.get()?.deny_bucket_key(request).await
    }

    async fn put_global_alias(&self, bucket_id: &str, alias: &str) -> Result<BucketInfo, Error> {
        self.get()?.put_global_alias(bucket_id, alias).await
    }

    async fn delete_global_alias(
        &self,
        bucket_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error> {
        self.get()?.delete_global_alias(bucket_id, alias).await
    }

    async fn put_local_alias(
        &self,
        bucket_id: &str,
        access_key_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error> {
        self.get()?
            .put_local_alias(bucket_id, access_key_id, alias)
            .await
    }

    async fn delete_local_alias(
        &self,
        bucket_id: &str,
        access_key_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error> {
        self.get()?
            .delete_local_alias(bucket_id, access_key_id, alias)
            .await
    }
}
