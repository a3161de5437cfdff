use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ensure_same_identity, Attribute, AttributeKind, Presence, Resource};
use crate::admin::AdminApi;
use crate::error::Error;
use crate::identity::{CompositeId, GrantId};
use crate::permissions::{self, BucketKeyPermissions};

const SCHEMA: &[Attribute] = &[
    Attribute::new("bucket_id", AttributeKind::String, Presence::Required).force_new(),
    Attribute::new("access_key_id", AttributeKind::String, Presence::Required).force_new(),
    Attribute::new("read", AttributeKind::Bool, Presence::Optional),
    Attribute::new("write", AttributeKind::Bool, Presence::Optional),
    Attribute::new("owner", AttributeKind::Bool, Presence::Optional),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketKeyGrantConfig {
    pub bucket_id: String,
    pub access_key_id: String,
    #[serde(flatten)]
    pub permissions: BucketKeyPermissions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketKeyGrantState {
    /// `<bucket_id>/<access_key_id>`
    pub id: String,
    pub bucket_id: String,
    pub access_key_id: String,
    #[serde(flatten)]
    pub permissions: BucketKeyPermissions,
}

/// Permissions of one access key on one bucket.
///
/// There is no remote grant object: create and update both push the full
/// flag set, delete denies everything, and read never pulls flags back.
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketKeyGrant;

impl BucketKeyGrant {
    async fn apply(
        &self,
        api: &dyn AdminApi,
        config: &BucketKeyGrantConfig,
    ) -> Result<BucketKeyGrantState, Error> {
        let grant = GrantId::new(&config.bucket_id, &config.access_key_id)?;
        permissions::apply(api, &grant.bucket_id, &grant.access_key_id, config.permissions).await?;

        Ok(BucketKeyGrantState {
            id: grant.encode()?,
            bucket_id: grant.bucket_id,
            access_key_id: grant.access_key_id,
            permissions: config.permissions,
        })
    }
}

#[async_trait]
impl Resource for BucketKeyGrant {
    type Config = BucketKeyGrantConfig;
    type State = BucketKeyGrantState;

    const KIND: &'static str = "bucket key grant";

    fn schema(&self) -> &'static [Attribute] {
        SCHEMA
    }

    async fn create(
        &self,
        api: &dyn AdminApi,
        config: &BucketKeyGrantConfig,
    ) -> Result<BucketKeyGrantState, Error> {
        self.apply(api, config).await
    }

    async fn read(
        &self,
        _api: &dyn AdminApi,
        id: &str,
        prior: &BucketKeyGrantState,
    ) -> Result<Option<BucketKeyGrantState>, Error> {
        // flags are only ever pushed; drift on the remote grant goes unnoticed
        GrantId::decode(id)?;
        Ok(Some(prior.clone()))
    }

    async fn update(
        &self,
        api: &dyn AdminApi,
        id: &str,
        config: &BucketKeyGrantConfig,
        _prior: &BucketKeyGrantState,
    ) -> Result<BucketKeyGrantState, Error> {
        let current = GrantId::decode(id)?;
        let desired = GrantId::new(&config.bucket_id, &config.access_key_id)?;
        ensure_same_identity(Self::KIND, &current.to_string(), &desired.to_string())?;
        self.apply(api, config).await
    }

    async fn delete(&self, api: &dyn AdminApi, id: &str) -> Result<(), Error> {
        let grant = GrantId::decode(id)?;
        tracing::info!(
            bucket_id = %grant.bucket_id,
            access_key_id = %grant.access_key_id,
            "revoking bucket key grant"
        );
        api.deny_bucket_key(&permissions::revoke_all(&grant.bucket_id, &grant.access_key_id))
            .await?;
        Ok(())
    }
}
