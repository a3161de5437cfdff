use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ensure_same_identity, Attribute, AttributeKind, Presence, Resource};
use crate::admin::AdminApi;
use crate::error::Error;
use crate::identity::{CompositeId, LocalAliasId};

const SCHEMA: &[Attribute] = &[
    Attribute::new("bucket_id", AttributeKind::String, Presence::Required).force_new(),
    Attribute::new("access_key_id", AttributeKind::String, Presence::Required).force_new(),
    Attribute::new("alias", AttributeKind::String, Presence::Required).force_new(),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketLocalAliasConfig {
    pub bucket_id: String,
    pub access_key_id: String,
    pub alias: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketLocalAliasState {
    /// `<bucket_id>/<access_key_id>/<alias>`
    pub id: String,
    pub bucket_id: String,
    pub access_key_id: String,
    pub alias: String,
}

/// A bucket name visible only to one access key.
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketLocalAlias;

#[async_trait]
impl Resource for BucketLocalAlias {
    type Config = BucketLocalAliasConfig;
    type State = BucketLocalAliasState;

    const KIND: &'static str = "bucket local alias";

    fn schema(&self) -> &'static [Attribute] {
        SCHEMA
    }

    async fn create(
        &self,
        api: &dyn AdminApi,
        config: &BucketLocalAliasConfig,
    ) -> Result<BucketLocalAliasState, Error> {
        let alias = LocalAliasId::new(&config.bucket_id, &config.access_key_id, &config.alias)?;
        tracing::info!(
            bucket_id = %alias.bucket_id,
            access_key_id = %alias.access_key_id,
            alias = %alias.alias,
            "adding local alias"
        );
        api.put_local_alias(&alias.bucket_id, &alias.access_key_id, &alias.alias)
            .await?;

        Ok(BucketLocalAliasState {
            id: alias.encode()?,
            bucket_id: alias.bucket_id,
            access_key_id: alias.access_key_id,
            alias: alias.alias,
        })
    }

    async fn read(
        &self,
        _api: &dyn AdminApi,
        id: &str,
        prior: &BucketLocalAliasState,
    ) -> Result<Option<BucketLocalAliasState>, Error> {
        LocalAliasId::decode(id)?;
        Ok(Some(prior.clone()))
    }

    async fn update(
        &self,
        _api: &dyn AdminApi,
        id: &str,
        config: &BucketLocalAliasConfig,
        prior: &BucketLocalAliasState,
    ) -> Result<BucketLocalAliasState, Error> {
        let desired = LocalAliasId::new(&config.bucket_id, &config.access_key_id, &config.alias)?;
        ensure_same_identity(Self::KIND, id, &desired.encode()?)?;
        Ok(prior.clone())
    }

    async fn delete(&self, api: &dyn AdminApi, id: &str) -> Result<(), Error> {
        let alias = LocalAliasId::decode(id)?;
        tracing::info!(
            bucket_id = %alias.bucket_id,
            access_key_id = %alias.access_key_id,
            alias = %alias.alias,
            "removing local alias"
        );
        api.delete_local_alias(&alias.bucket_id, &alias.access_key_id, &alias.alias)
            .await?;
        Ok(())
    }
}
