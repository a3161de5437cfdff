use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ensure_same_identity, Attribute, AttributeKind, Presence, Resource};
use crate::admin::types::{
    AddKeyRequest, ImportKeyRequest, KeyInfo, KeyPermissionFlags, UpdateKeyRequest,
};
use crate::admin::AdminApi;
use crate::error::Error;
use crate::permissions::{reconcile_key, KeyPermissions};

const SCHEMA: &[Attribute] = &[
    Attribute::new("name", AttributeKind::String, Presence::OptionalComputed),
    Attribute::new("access_key_id", AttributeKind::String, Presence::OptionalComputed).force_new(),
    Attribute::new(
        "secret_access_key",
        AttributeKind::String,
        Presence::OptionalComputed,
    )
    .force_new()
    .sensitive(),
    Attribute::new("permissions", AttributeKind::BoolMap, Presence::Optional),
];

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyConfig {
    /// Defaulted remotely when absent
    #[serde(default)]
    pub name: Option<String>,
    /// Supplying a credential pair imports it instead of generating one
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub permissions: Option<KeyPermissions>,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKeyState {
    /// Same as `access_key_id`
    pub id: String,
    pub name: String,
    pub access_key_id: String,
    /// Only known from creation or when the remote reveals it
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub permissions: KeyPermissions,
}

impl fmt::Debug for AccessKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyConfig")
            .field("name", &self.name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl fmt::Debug for AccessKeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKeyState")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl AccessKeyState {
    /// Flatten a remote key, keeping `known_secret` when the remote withholds it.
    pub fn from_remote(key: KeyInfo, known_secret: Option<String>) -> Self {
        Self {
            id: key.access_key_id.clone(),
            name: key.name,
            access_key_id: key.access_key_id,
            secret_access_key: key.secret_access_key.or(known_secret),
            permissions: key.permissions.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessKey;

impl AccessKey {
    /// Adopt an existing key by access key id. The secret is only known if
    /// the remote reveals it.
    pub async fn import_existing(
        &self,
        api: &dyn AdminApi,
        id: &str,
    ) -> Result<AccessKeyState, Error> {
        tracing::info!(access_key_id = id, "importing access key");
        fetch(api, id, None).await
    }
}

async fn fetch(
    api: &dyn AdminApi,
    id: &str,
    known_secret: Option<String>,
) -> Result<AccessKeyState, Error> {
    tracing::debug!(access_key_id = id, "reading access key");
    let key = api.get_key(id).await?;
    Ok(AccessKeyState::from_remote(key, known_secret))
}

fn permission_update(
    permissions: Option<KeyPermissions>,
) -> (Option<KeyPermissionFlags>, Option<KeyPermissionFlags>) {
    match permissions {
        Some(desired) => {
            let (allow, deny) = reconcile_key(desired);
            (Some(allow), Some(deny))
        }
        None => (None, None),
    }
}

#[async_trait]
impl Resource for AccessKey {
    type Config = AccessKeyConfig;
    type State = AccessKeyState;

    const KIND: &'static str = "access key";

    fn schema(&self) -> &'static [Attribute] {
        SCHEMA
    }

    async fn create(
        &self,
        api: &dyn AdminApi,
        config: &AccessKeyConfig,
    ) -> Result<AccessKeyState, Error> {
        let created = match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => {
                tracing::info!(access_key_id = %access_key_id, "importing credential pair");
                api.import_key(&ImportKeyRequest {
                    name: config.name.clone(),
                    access_key_id: access_key_id.clone(),
                    secret_access_key: secret_access_key.clone(),
                })
                .await?
            }
            (None, None) => {
                tracing::info!(name = ?config.name, "generating access key");
                api.add_key(&AddKeyRequest {
                    name: config.name.clone(),
                })
                .await?
            }
            _ => {
                return Err(Error::InvalidConfiguration(
                    "access_key_id and secret_access_key must be supplied together".to_string(),
                ))
            }
        };

        let id = created.access_key_id.clone();
        let secret = created
            .secret_access_key
            .clone()
            .or_else(|| config.secret_access_key.clone());

        if config.permissions.is_some() {
            let (allow, deny) = permission_update(config.permissions);
            tracing::info!(access_key_id = %id, "setting access key permissions");
            api.update_key(
                &id,
                &UpdateKeyRequest {
                    name: None,
                    allow,
                    deny,
                },
            )
            .await?;
        }

        fetch(api, &id, secret).await
    }

    async fn read(
        &self,
        api: &dyn AdminApi,
        id: &str,
        prior: &AccessKeyState,
    ) -> Result<Option<AccessKeyState>, Error> {
        match fetch(api, id, prior.secret_access_key.clone()).await {
            Ok(state) => Ok(Some(state)),
            Err(e) if e.is_not_found() => {
                tracing::warn!(access_key_id = id, "access key no longer exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update(
        &self,
        api: &dyn AdminApi,
        id: &str,
        config: &AccessKeyConfig,
        prior: &AccessKeyState,
    ) -> Result<AccessKeyState, Error> {
        if let Some(access_key_id) = &config.access_key_id {
            ensure_same_identity(Self::KIND, id, access_key_id)?;
        }
        if let Some(desired) = &config.secret_access_key {
            // a secret is only ever set by create or import
            if prior.secret_access_key.as_ref() != Some(desired) {
                return Err(Error::InvalidConfiguration(format!(
                    "the secret of access key '{}' cannot change in place; it must be replaced",
                    id
                )));
            }
        }

        let (allow, deny) = permission_update(config.permissions);
        tracing::info!(access_key_id = id, name = ?config.name, "updating access key");
        api.update_key(
            id,
            &UpdateKeyRequest {
                name: config.name.clone(),
                allow,
                deny,
            },
        )
        .await?;

        fetch(api, id, prior.secret_access_key.clone()).await
    }

    async fn delete(&self, api: &dyn AdminApi, id: &str) -> Result<(), Error> {
        tracing::info!(access_key_id = id, "deleting access key");
        api.delete_key(id).await
    }
}
