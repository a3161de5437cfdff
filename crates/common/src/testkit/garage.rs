use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use uuid::Uuid;

use crate::admin::types::{
    AddKeyRequest, BucketInfo, BucketKeyInfo, BucketKeyPermRequest, BucketQuotas,
    ImportKeyRequest, KeyBucketInfo, KeyInfo, KeyPermissionFlags, PermissionFlags,
    UpdateBucketRequest, UpdateKeyRequest, WebsiteConfig,
};
use crate::admin::AdminApi;
use crate::error::Error;
use crate::tristate::Tristate;

const DEFAULT_KEY_NAME: &str = "Unnamed key";

#[derive(Debug, Default)]
struct FakeBucket {
    website_access: bool,
    website_config: Option<WebsiteConfig>,
    quotas: BucketQuotas,
    objects: u64,
    bytes: u64,
    unfinished_uploads: u64,
    grants: BTreeMap<String, PermissionFlags>,
}

#[derive(Debug)]
struct FakeKey {
    name: String,
    secret: String,
    create_bucket: bool,
    /// alias -> bucket id
    local_aliases: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct Inner {
    buckets: BTreeMap<String, FakeBucket>,
    keys: BTreeMap<String, FakeKey>,
    /// alias -> bucket id
    global_aliases: BTreeMap<String, String>,
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, StatusCode>,
    reveal_secrets: bool,
}

/// Cheap to clone; clones share one cluster.
#[derive(Debug, Clone, Default)]
pub struct FakeGarage {
    inner: Arc<Mutex<Inner>>,
}

fn reject(status: StatusCode, code: &str, message: impl Into<String>) -> Error {
    Error::RemoteRejection {
        status: status.as_u16(),
        message: format!("{}: {}", code, message.into()),
    }
}

fn no_such_bucket(id: &str) -> Error {
    reject(
        StatusCode::NOT_FOUND,
        "NoSuchBucket",
        format!("Bucket not found: {}", id),
    )
}

fn no_such_key(id: &str) -> Error {
    reject(
        StatusCode::NOT_FOUND,
        "NoSuchAccessKey",
        format!("Access key not found: {}", id),
    )
}

fn random_hex(len: usize) -> String {
    let mut out = String::with_capacity(len + 32);
    while out.len() < len {
        out.push_str(&Uuid::new_v4().simple().to_string());
    }
    out.truncate(len);
    out
}

impl Inner {
    /// Record the call and fire an injected failure if one is armed.
    fn enter(&mut self, op: &'static str) -> Result<(), Error> {
        self.calls.push(op);
        match self.failures.remove(op) {
            Some(status) => Err(reject(status, "InjectedFailure", op)),
            None => Ok(()),
        }
    }

    fn bucket_info(&self, id: &str) -> Result<BucketInfo, Error> {
        let bucket = self.buckets.get(id).ok_or_else(|| no_such_bucket(id))?;

        let mut key_ids: BTreeSet<&String> = bucket
            .grants
            .iter()
            .filter(|(_, flags)| flags.read || flags.write || flags.owner)
            .map(|(key_id, _)| key_id)
            .collect();
        for (key_id, key) in &self.keys {
            if key.local_aliases.values().any(|b| b == id) {
                key_ids.insert(key_id);
            }
        }

        let keys = key_ids
            .into_iter()
            .filter_map(|key_id| {
                let key = self.keys.get(key_id)?;
                Some(BucketKeyInfo {
                    access_key_id: key_id.clone(),
                    name: key.name.clone(),
                    permissions: bucket.grants.get(key_id).copied().unwrap_or_default(),
                    bucket_local_aliases: key
                        .local_aliases
                        .iter()
                        .filter(|(_, b)| *b == id)
                        .map(|(alias, _)| alias.clone())
                        .collect(),
                })
            })
            .collect();

        Ok(BucketInfo {
            id: id.to_string(),
            global_aliases: self
                .global_aliases
                .iter()
                .filter(|(_, b)| *b == id)
                .map(|(alias, _)| alias.clone())
                .collect(),
            website_access: bucket.website_access,
            website_config: bucket.website_config.clone(),
            keys,
            objects: bucket.objects,
            bytes: bucket.bytes,
            unfinished_uploads: bucket.unfinished_uploads,
            quotas: Some(bucket.quotas),
        })
    }

    fn key_info(&self, id: &str, reveal_secret: bool) -> Result<KeyInfo, Error> {
        let key = self.keys.get(id).ok_or_else(|| no_such_key(id))?;
        let buckets = self
            .buckets
            .iter()
            .filter_map(|(bucket_id, bucket)| {
                let permissions = bucket.grants.get(id).copied().unwrap_or_default();
                let local_aliases: Vec<String> = key
                    .local_aliases
                    .iter()
                    .filter(|(_, b)| *b == bucket_id)
                    .map(|(alias, _)| alias.clone())
                    .collect();
                let granted = permissions.read || permissions.write || permissions.owner;
                (granted || !local_aliases.is_empty()).then(|| KeyBucketInfo {
                    id: bucket_id.clone(),
                    global_aliases: self
                        .global_aliases
                        .iter()
                        .filter(|(_, b)| *b == bucket_id)
                        .map(|(alias, _)| alias.clone())
                        .collect(),
                    local_aliases,
                    permissions,
                })
            })
            .collect();

        Ok(KeyInfo {
            name: key.name.clone(),
            access_key_id: id.to_string(),
            secret_access_key: reveal_secret.then(|| key.secret.clone()),
            permissions: KeyPermissionFlags {
                create_bucket: key.create_bucket,
            },
            buckets,
        })
    }

    fn set_flags(&mut self, request: &BucketKeyPermRequest, value: bool) -> Result<(), Error> {
        if !self.keys.contains_key(&request.access_key_id) {
            return Err(no_such_key(&request.access_key_id));
        }
        let bucket = self
            .buckets
            .get_mut(&request.bucket_id)
            .ok_or_else(|| no_such_bucket(&request.bucket_id))?;
        let flags = bucket
            .grants
            .entry(request.access_key_id.clone())
            .or_default();
        if request.permissions.read {
            flags.read = value;
        }
        if request.permissions.write {
            flags.write = value;
        }
        if request.permissions.owner {
            flags.owner = value;
        }
        Ok(())
    }
}

impl FakeGarage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `get_key` return secrets, as an admin API configured to reveal
    /// them would.
    pub fn reveal_secrets(&self, reveal: bool) {
        self.inner.lock().reveal_secrets = reveal;
    }

    /// Fail the next call to `op` (an `AdminApi` method name) with `status`.
    pub fn fail_next(&self, op: &'static str, status: StatusCode) {
        self.inner.lock().failures.insert(op, status);
    }

    /// Names of the `AdminApi` methods called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Register a key directly, bypassing the API. Returns its id.
    pub fn seed_key(&self, name: &str) -> String {
        let id = format!("GK{}", random_hex(24));
        self.inner.lock().keys.insert(
            id.clone(),
            FakeKey {
                name: name.to_string(),
                secret: random_hex(64),
                create_bucket: false,
                local_aliases: BTreeMap::new(),
            },
        );
        id
    }

    /// Pretend objects were uploaded to a bucket.
    pub fn seed_objects(&self, bucket_id: &str, objects: u64, bytes: u64) {
        if let Some(bucket) = self.inner.lock().buckets.get_mut(bucket_id) {
            bucket.objects = objects;
            bucket.bytes = bytes;
        }
    }

    /// Overwrite a grant behind the controllers' back.
    pub fn seed_grant(&self, bucket_id: &str, access_key_id: &str, flags: PermissionFlags) {
        if let Some(bucket) = self.inner.lock().buckets.get_mut(bucket_id) {
            bucket.grants.insert(access_key_id.to_string(), flags);
        }
    }

    /// Current effective flags of a grant; all false when absent.
    pub fn grant(&self, bucket_id: &str, access_key_id: &str) -> PermissionFlags {
        self.inner
            .lock()
            .buckets
            .get(bucket_id)
            .and_then(|bucket| bucket.grants.get(access_key_id).copied())
            .unwrap_or_default()
    }

    /// Secret stored for a key, regardless of reveal policy.
    pub fn secret_of(&self, access_key_id: &str) -> Option<String> {
        self.inner
            .lock()
            .keys
            .get(access_key_id)
            .map(|key| key.secret.clone())
    }

    pub fn bucket_count(&self) -> usize {
        self.inner.lock().buckets.len()
    }

    pub fn key_count(&self) -> usize {
        self.inner.lock().keys.len()
    }
}

#[async_trait]
impl AdminApi for FakeGarage {
    async fn create_bucket(&self) -> Result<BucketInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("create_bucket")?;
        let id = random_hex(64);
        inner.buckets.insert(id.clone(), FakeBucket::default());
        inner.bucket_info(&id)
    }

    async fn get_bucket(&self, id: &str) -> Result<BucketInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("get_bucket")?;
        inner.bucket_info(id)
    }

    async fn update_bucket(
        &self,
        id: &str,
        request: &UpdateBucketRequest,
    ) -> Result<BucketInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("update_bucket")?;
        let bucket = inner.buckets.get_mut(id).ok_or_else(|| no_such_bucket(id))?;

        let website = &request.website_access;
        if website.enabled {
            let index_document = website.index_document.value().cloned().ok_or_else(|| {
                reject(
                    StatusCode::BAD_REQUEST,
                    "InvalidRequest",
                    "Please specify indexDocument when enabling website access.",
                )
            })?;
            bucket.website_access = true;
            bucket.website_config = Some(WebsiteConfig {
                index_document,
                error_document: website.error_document.value().cloned(),
            });
        } else {
            if website.index_document.value().is_some() || website.error_document.value().is_some()
            {
                return Err(reject(
                    StatusCode::BAD_REQUEST,
                    "InvalidRequest",
                    "Cannot specify indexDocument or errorDocument when disabling website access.",
                ));
            }
            bucket.website_access = false;
            bucket.website_config = None;
        }

        match &request.quotas.max_size {
            Tristate::Unset => {}
            Tristate::Cleared => bucket.quotas.max_size = None,
            Tristate::Value(v) => bucket.quotas.max_size = Some(*v),
        }
        match &request.quotas.max_objects {
            Tristate::Unset => {}
            Tristate::Cleared => bucket.quotas.max_objects = None,
            Tristate::Value(v) => bucket.quotas.max_objects = Some(*v),
        }

        inner.bucket_info(id)
    }

    async fn delete_bucket(&self, id: &str) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        inner.enter("delete_bucket")?;
        let bucket = inner.buckets.get(id).ok_or_else(|| no_such_bucket(id))?;
        if bucket.objects > 0 || bucket.unfinished_uploads > 0 {
            return Err(reject(
                StatusCode::CONFLICT,
                "BucketNotEmpty",
                "Bucket is not empty",
            ));
        }
        inner.buckets.remove(id);
        inner.global_aliases.retain(|_, b| b.as_str() != id);
        for key in inner.keys.values_mut() {
            key.local_aliases.retain(|_, b| b.as_str() != id);
        }
        Ok(())
    }

    async fn add_key(&self, request: &AddKeyRequest) -> Result<KeyInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("add_key")?;
        let id = format!("GK{}", random_hex(24));
        inner.keys.insert(
            id.clone(),
            FakeKey {
                name: request
                    .name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_KEY_NAME.to_string()),
                secret: random_hex(64),
                create_bucket: false,
                local_aliases: BTreeMap::new(),
            },
        );
        // freshly minted secrets are always returned once
        inner.key_info(&id, true)
    }

    async fn import_key(&self, request: &ImportKeyRequest) -> Result<KeyInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("import_key")?;
        let id = request.access_key_id.clone();
        if let Some(existing) = inner.keys.get(&id) {
            if existing.secret != request.secret_access_key {
                return Err(reject(
                    StatusCode::CONFLICT,
                    "KeyAlreadyExists",
                    format!("Key {} already exists in data store", id),
                ));
            }
        } else {
            inner.keys.insert(
                id.clone(),
                FakeKey {
                    name: request
                        .name
                        .clone()
                        .unwrap_or_else(|| DEFAULT_KEY_NAME.to_string()),
                    secret: request.secret_access_key.clone(),
                    create_bucket: false,
                    local_aliases: BTreeMap::new(),
                },
            );
        }
        inner.key_info(&id, true)
    }

    async fn get_key(&self, id: &str) -> Result<KeyInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("get_key")?;
        let reveal = inner.reveal_secrets;
        inner.key_info(id, reveal)
    }

    async fn update_key(&self, id: &str, request: &UpdateKeyRequest) -> Result<KeyInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("update_key")?;
        let key = inner.keys.get_mut(id).ok_or_else(|| no_such_key(id))?;
        if let Some(name) = &request.name {
            key.name = name.clone();
        }
        if request.allow.is_some_and(|allow| allow.create_bucket) {
            key.create_bucket = true;
        }
        if request.deny.is_some_and(|deny| deny.create_bucket) {
            key.create_bucket = false;
        }
        let reveal = inner.reveal_secrets;
        inner.key_info(id, reveal)
    }

    async fn delete_key(&self, id: &str) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        inner.enter("delete_key")?;
        inner.keys.remove(id).ok_or_else(|| no_such_key(id))?;
        for bucket in inner.buckets.values_mut() {
            bucket.grants.remove(id);
        }
        Ok(())
    }

    async fn allow_bucket_key(&self, request: &BucketKeyPermRequest) -> Result<BucketInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("allow_bucket_key")?;
        inner.set_flags(request, true)?;
        inner.bucket_info(&request.bucket_id)
    }

    async fn deny_bucket_key(&self, request: &BucketKeyPermRequest) -> Result<BucketInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("deny_bucket_key")?;
        inner.set_flags(request, false)?;
        inner.bucket_info(&request.bucket_id)
    }

    async fn put_global_alias(&self, bucket_id: &str, alias: &str) -> Result<BucketInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("put_global_alias")?;
        if !inner.buckets.contains_key(bucket_id) {
            return Err(no_such_bucket(bucket_id));
        }
        if inner
            .global_aliases
            .get(alias)
            .is_some_and(|owner| owner != bucket_id)
        {
            return Err(reject(
                StatusCode::CONFLICT,
                "BucketAlreadyExists",
                format!("Alias {} already exists", alias),
            ));
        }
        inner
            .global_aliases
            .insert(alias.to_string(), bucket_id.to_string());
        inner.bucket_info(bucket_id)
    }

    async fn delete_global_alias(
        &self,
        bucket_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("delete_global_alias")?;
        if !inner.buckets.contains_key(bucket_id) {
            return Err(no_such_bucket(bucket_id));
        }
        if inner.global_aliases.get(alias).map(String::as_str) != Some(bucket_id) {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                format!("Bucket {} doesn't have alias {}", bucket_id, alias),
            ));
        }
        inner.global_aliases.remove(alias);
        inner.bucket_info(bucket_id)
    }

    async fn put_local_alias(
        &self,
        bucket_id: &str,
        access_key_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("put_local_alias")?;
        if !inner.buckets.contains_key(bucket_id) {
            return Err(no_such_bucket(bucket_id));
        }
        let key = inner
            .keys
            .get_mut(access_key_id)
            .ok_or_else(|| no_such_key(access_key_id))?;
        if key
            .local_aliases
            .get(alias)
            .is_some_and(|owner| owner != bucket_id)
        {
            return Err(reject(
                StatusCode::CONFLICT,
                "BucketAlreadyExists",
                format!("Local alias {} already exists", alias),
            ));
        }
        key.local_aliases
            .insert(alias.to_string(), bucket_id.to_string());
        inner.bucket_info(bucket_id)
    }

    async fn delete_local_alias(
        &self,
        bucket_id: &str,
        access_key_id: &str,
        alias: &str,
    ) -> Result<BucketInfo, Error> {
        let mut inner = self.inner.lock();
        inner.enter("delete_local_alias")?;
        if !inner.buckets.contains_key(bucket_id) {
            return Err(no_such_bucket(bucket_id));
        }
        let key = inner
            .keys
            .get_mut(access_key_id)
            .ok_or_else(|| no_such_key(access_key_id))?;
        if key.local_aliases.get(alias).map(String::as_str) != Some(bucket_id) {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                "InvalidRequest",
                format!("Bucket {} doesn't have local alias {}", bucket_id, alias),
            ));
        }
        key.local_aliases.remove(alias);
        inner.bucket_info(bucket_id)
    }
}
