use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ensure_same_identity, Attribute, AttributeKind, Presence, Resource};
use crate::admin::AdminApi;
use crate::error::Error;
use crate::identity::{CompositeId, GlobalAliasId};

const SCHEMA: &[Attribute] = &[
    Attribute::new("bucket_id", AttributeKind::String, Presence::Required).force_new(),
    Attribute::new("alias", AttributeKind::String, Presence::Required).force_new(),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketGlobalAliasConfig {
    pub bucket_id: String,
    pub alias: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketGlobalAliasState {
    /// `<bucket_id>/<alias>`
    pub id: String,
    pub bucket_id: String,
    pub alias: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BucketGlobalAlias;

#[async_trait]
impl Resource for BucketGlobalAlias {
    type Config = BucketGlobalAliasConfig;
    type State = BucketGlobalAliasState;

    const KIND: &'static str = "bucket global alias";

    fn schema(&self) -> &'static [Attribute] {
        SCHEMA
    }

    async fn create(
        &self,
        api: &dyn AdminApi,
        config: &BucketGlobalAliasConfig,
    ) -> Result<BucketGlobalAliasState, Error> {
        let alias = GlobalAliasId::new(&config.bucket_id, &config.alias)?;
        tracing::info!(bucket_id = %alias.bucket_id, alias = %alias.alias, "adding global alias");
        api.put_global_alias(&alias.bucket_id, &alias.alias).await?;

        Ok(BucketGlobalAliasState {
            id: alias.encode()?,
            bucket_id: alias.bucket_id,
            alias: alias.alias,
        })
    }

    async fn read(
        &self,
        _api: &dyn AdminApi,
        id: &str,
        prior: &BucketGlobalAliasState,
    ) -> Result<Option<BucketGlobalAliasState>, Error> {
        GlobalAliasId::decode(id)?;
        Ok(Some(prior.clone()))
    }

    async fn update(
        &self,
        _api: &dyn AdminApi,
        id: &str,
        config: &BucketGlobalAliasConfig,
        prior: &BucketGlobalAliasState,
    ) -> Result<BucketGlobalAliasState, Error> {
        let desired = GlobalAliasId::new(&config.bucket_id, &config.alias)?;
        ensure_same_identity(Self::KIND, id, &desired.encode()?)?;
        Ok(prior.clone())
    }

    async fn delete(&self, api: &dyn AdminApi, id: &str) -> Result<(), Error> {
        let alias = GlobalAliasId::decode(id)?;
        tracing::info!(bucket_id = %alias.bucket_id, alias = %alias.alias, "removing global alias");
        api.delete_global_alias(&alias.bucket_id, &alias.alias).await?;
        Ok(())
    }
}
