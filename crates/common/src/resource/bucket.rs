use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Attribute, AttributeKind, Presence, Resource};
use crate::admin::types::{BucketInfo, BucketKeyInfo};
use crate::admin::AdminApi;
use crate::error::Error;
use crate::tristate::bucket_update_request;

const SCHEMA: &[Attribute] = &[
    Attribute::new("id", AttributeKind::String, Presence::Computed),
    Attribute::new("website_access_enabled", AttributeKind::Bool, Presence::Optional),
    Attribute::new(
        "website_config_index_document",
        AttributeKind::String,
        Presence::OptionalComputed,
    ),
    Attribute::new(
        "website_config_error_document",
        AttributeKind::String,
        Presence::OptionalComputed,
    ),
    Attribute::new("quota_max_size", AttributeKind::Int, Presence::OptionalComputed),
    Attribute::new("quota_max_objects", AttributeKind::Int, Presence::OptionalComputed),
    Attribute::new("global_aliases", AttributeKind::StringList, Presence::Computed),
    Attribute::new("keys", AttributeKind::KeyList, Presence::Computed),
    Attribute::new("objects", AttributeKind::Int, Presence::Computed),
    Attribute::new("bytes", AttributeKind::Int, Presence::Computed),
    Attribute::new("unfinished_uploads", AttributeKind::Int, Presence::Computed),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    #[serde(default)]
    pub website_access_enabled: bool,
    #[serde(default)]
    pub website_config_index_document: Option<String>,
    #[serde(default)]
    pub website_config_error_document: Option<String>,
    /// Bytes. Omitting it removes any quota.
    #[serde(default)]
    pub quota_max_size: Option<u64>,
    /// Omitting it removes any quota.
    #[serde(default)]
    pub quota_max_objects: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketState {
    pub id: String,
    pub website_access_enabled: bool,
    pub website_config_index_document: Option<String>,
    pub website_config_error_document: Option<String>,
    pub quota_max_size: Option<u64>,
    pub quota_max_objects: Option<u64>,
    pub global_aliases: Vec<String>,
    pub keys: Vec<BucketKeyState>,
    pub objects: u64,
    pub bytes: u64,
    pub unfinished_uploads: u64,
}

/// A key's grant as seen from the bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketKeyState {
    pub access_key_id: String,
    pub name: String,
    pub permissions_read: bool,
    pub permissions_write: bool,
    pub permissions_owner: bool,
    pub local_aliases: Vec<String>,
}

impl From<BucketKeyInfo> for BucketKeyState {
    fn from(key: BucketKeyInfo) -> Self {
        Self {
            access_key_id: key.access_key_id,
            name: key.name,
            permissions_read: key.permissions.read,
            permissions_write: key.permissions.write,
            permissions_owner: key.permissions.owner,
            local_aliases: key.bucket_local_aliases,
        }
    }
}

impl From<BucketInfo> for BucketState {
    fn from(bucket: BucketInfo) -> Self {
        let (index_document, error_document) = match bucket.website_config {
            Some(website) => (Some(website.index_document), website.error_document),
            None => (None, None),
        };
        let quotas = bucket.quotas.unwrap_or_default();

        Self {
            id: bucket.id,
            website_access_enabled: bucket.website_access,
            website_config_index_document: index_document,
            website_config_error_document: error_document,
            quota_max_size: quotas.max_size,
            quota_max_objects: quotas.max_objects,
            global_aliases: bucket.global_aliases,
            keys: bucket.keys.into_iter().map(BucketKeyState::from).collect(),
            objects: bucket.objects,
            bytes: bucket.bytes,
            unfinished_uploads: bucket.unfinished_uploads,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bucket;

impl Bucket {
    /// Adopt an existing bucket by id.
    pub async fn import(&self, api: &dyn AdminApi, id: &str) -> Result<BucketState, Error> {
        tracing::info!(bucket_id = id, "importing bucket");
        fetch(api, id).await
    }
}

async fn fetch(api: &dyn AdminApi, id: &str) -> Result<BucketState, Error> {
    tracing::debug!(bucket_id = id, "reading bucket");
    Ok(api.get_bucket(id).await?.into())
}

#[async_trait]
impl Resource for Bucket {
    type Config = BucketConfig;
    type State = BucketState;

    const KIND: &'static str = "bucket";

    fn schema(&self) -> &'static [Attribute] {
        SCHEMA
    }

    async fn create(&self, api: &dyn AdminApi, config: &BucketConfig) -> Result<BucketState, Error> {
        let created = api.create_bucket().await?;
        tracing::info!(bucket_id = %created.id, "created bucket");

        // the bare bucket exists from here on, even if the update below fails
        let prior = BucketState::from(created);
        self.update(api, &prior.id, config, &prior).await
    }

    async fn read(
        &self,
        api: &dyn AdminApi,
        id: &str,
        _prior: &BucketState,
    ) -> Result<Option<BucketState>, Error> {
        match fetch(api, id).await {
            Ok(state) => Ok(Some(state)),
            Err(e) if e.is_not_found() => {
                tracing::warn!(bucket_id = id, "bucket no longer exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        api: &dyn AdminApi,
        id: &str,
        config: &BucketConfig,
        _prior: &BucketState,
    ) -> Result<BucketState, Error> {
        let request = bucket_update_request(config);
        tracing::info!(
            bucket_id = id,
            website_access = config.website_access_enabled,
            quota_max_size = ?config.quota_max_size,
            quota_max_objects = ?config.quota_max_objects,
            "updating bucket"
        );
        api.update_bucket(id, &request).await?;
        fetch(api, id).await
    }

    async fn delete(&self, api: &dyn AdminApi, id: &str) -> Result<(), Error> {
        tracing::info!(bucket_id = id, "deleting bucket");
        api.delete_bucket(id).await
    }
}
