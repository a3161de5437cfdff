mod client;
mod lazy;
pub mod requests;
pub mod types;

pub use client::AdminClient;
pub use lazy::LazyAdminClient;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::Error;
use types::{
    AddKeyRequest, BucketInfo, BucketKeyPermRequest, ImportKeyRequest, KeyInfo,
    UpdateBucketRequest, UpdateKeyRequest,
};

/// One admin API endpoint: how to build the HTTP request and what it answers.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error>;
}

/// The cluster-management operations the controllers reconcile through.
///
/// Every call is a single request/response round trip. Nothing is retried.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn create_bucket(&self) -> Result<BucketInfo, Error>;
    async fn get_bucket(&self, id: &str) -> Result<BucketInfo, Error>;
    async fn update_bucket(
        &self,
        id: &str,
        request: &UpdateBucketRequest,
    ) -> Result<BucketInfo, Error>;
    /// Rejected remotely while the bucket still holds objects.
    async fn delete_bucket(&self, id: &str) -> Result<(), Error>;

    async fn add_key(&self, request: &AddKeyRequest) -> Result<KeyInfo, Error>;
    async fn import_key(&self, request: &ImportKeyRequest) -> Result<KeyInfo, Error>;
    async fn get_key(&self, id: &str) -> Result<KeyInfo, Error>;
    async fn update_key(&self, id: &str, request: &UpdateKeyRequest) -> Result<KeyInfo, Error>;
    async fn delete_key(&self, id: &str) -> Result<(), Error>;

    async fn allow_bucket_key(&self, request: &BucketKeyPermRequest) -> Result<BucketInfo, Error>;
    async fn deny_bucket_key(&self, request: &BucketKeyPermRequest) -> Result<BucketInfo, Error>;

    async fn put_global_alias(&self, bucket_id: &str, alias: &str) -> Result<BucketInfo, Error>;
    async fn delete_global_alias(&self, bucket_id: &str, alias: &str)
        -> Result<BucketInfo, Error>;
    async fn put_local_alias(
        &self,
        bucket_id: &str,
        access_key_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error>;
    async fn delete_local_alias(
        &self,
        bucket_id: &str,
        access_key_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error>;
}
