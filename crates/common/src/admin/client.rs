use async_trait::async_trait;
use reqwest::{header::HeaderMap, header::HeaderValue, Client};
use url::Url;

use super::requests::{
    AddKey, AllowBucketKey, CreateBucket, DeleteBucket, DeleteKey, DenyBucketKey, GetBucket,
    GetKey, GlobalAlias, ImportKey, LocalAlias, UpdateBucket, UpdateKey,
};
use super::types::{
    AddKeyRequest, BucketInfo, BucketKeyPermRequest, ImportKeyRequest, KeyInfo,
    UpdateBucketRequest, UpdateKeyRequest,
};
use super::{AdminApi, ApiRequest};
use crate::config::Config;
use crate::error::Error;

/// HTTP adapter for the Garage admin API.
#[derive(Clone)]
pub struct AdminClient {
    pub remote: Url,
    token: String,
    client: Client,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Validates `config` and builds the client. Fails fast on a missing
    /// host or token.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let remote = config.base_url()?;
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote,
            token: config.token.clone(),
            client,
        })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, Error> {
        let request_builder = request
            .build_request(&self.remote, &self.client)?
            .bearer_auth(&self.token);
        let response = request_builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, "admin API returned an error");
            return Err(Error::rejection(status, &body));
        }

        // empty bodies (204) decode as `null`
        let body = if body.trim().is_empty() {
            "null"
        } else {
            body.as_str()
        };
        Ok(serde_json::from_str(body)?)
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn create_bucket(&self) -> Result<BucketInfo, Error> {
        self.call(CreateBucket).await
    }

    async fn get_bucket(&self, id: &str) -> Result<BucketInfo, Error> {
        self.call(GetBucket { id: id.to_string() }).await
    }

    async fn update_bucket(
        &self,
        id: &str,
        request: &UpdateBucketRequest,
    ) -> Result<BucketInfo, Error> {
        self.call(UpdateBucket {
            id: id.to_string(),
            body: request.clone(),
        })
        .await
    }

    async fn delete_bucket(&self, id: &str) -> Result<(), Error> {
        self.call(DeleteBucket { id: id.to_string() }).await
    }

    async fn add_key(&self, request: &AddKeyRequest) -> Result<KeyInfo, Error> {
        self.call(AddKey(request.clone())).await
    }

    async fn import_key(&self, request: &ImportKeyRequest) -> Result<KeyInfo, Error> {
        self.call(ImportKey(request.clone())).await
    }

    async fn get_key(&self, id: &str) -> Result<KeyInfo, Error> {
        self.call(GetKey { id: id.to_string() }).await
    }

    async fn update_key(&self, id: &str, request: &UpdateKeyRequest) -> Result<KeyInfo, Error> {
        self.call(UpdateKey {
            id: id.to_string(),
            body: request.clone(),
        })
        .await
    }

    async fn delete_key(&self, id: &str) -> Result<(), Error> {
        self.call(DeleteKey { id: id.to_string() }).await
    }

    async fn allow_bucket_key(&self, request: &BucketKeyPermRequest) -> Result<BucketInfo, Error> {
        self.call(AllowBucketKey(request.clone())).await
    }

    async fn deny_bucket_key(&self, request: &BucketKeyPermRequest) -> Result<BucketInfo, Error> {
        self.call(DenyBucketKey(request.clone())).await
    }

    async fn put_global_alias(&self, bucket_id: &str, alias: &str) -> Result<BucketInfo, Error> {
        self.call(GlobalAlias {
            bucket_id: bucket_id.to_string(),
            alias: alias.to_string(),
            remove: false,
        })
        .await
    }

    async fn delete_global_alias(
        &self,
        bucket_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error> {
        self.call(GlobalAlias {
            bucket_id: bucket_id.to_string(),
            alias: alias.to_string(),
            remove: true,
        })
        .await
    }

    async fn put_local_alias(
        &self,
        bucket_id: &str,
        access_key_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error> {
        self.call(LocalAlias {
            bucket_id: bucket_id.to_string(),
            access_key_id: access_key_id.to_string(),
            alias: alias.to_string(),
            remove: false,
        })
        .await
    }

    async fn delete_local_alias(
        &self,
        bucket_id: &str,
        access_key_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error> {
        self.call(LocalAlias {
            bucket_id: bucket_id.to_string(),
            access_key_id: access_key_id.to_string(),
            alias: alias.to_string(),
            remove: true,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_credentials() {
        let err = AdminClient::new(&Config::new("localhost:3903", "http", "")).unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration("token")));
    }

    #[test]
    fn test_debug_hides_token() {
        let client = AdminClient::new(&Config::new("localhost:3903", "http", "hunter2")).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3903/");
        assert!(!format!("{:?}", client).contains("hunter2"));
    }
}
