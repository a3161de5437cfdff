use async_trait::async_trait;

use crate::admin::AdminApi;
use crate::error::Error;

pub mod bucket;
pub mod bucket_key;
pub mod global_alias;
pub mod key;
pub mod local_alias;

pub use bucket::{Bucket, BucketConfig, BucketKeyState, BucketState};
pub use bucket_key::{BucketKeyGrant, BucketKeyGrantConfig, BucketKeyGrantState};
pub use global_alias::{BucketGlobalAlias, BucketGlobalAliasConfig, BucketGlobalAliasState};
pub use key::{AccessKey, AccessKeyConfig, AccessKeyState};
pub use local_alias::{BucketLocalAlias, BucketLocalAliasConfig, BucketLocalAliasState};

/// Lifecycle of one resource kind.
///
/// `Absent -> create -> Present -> update* -> Present -> delete -> Absent`.
/// The identity string returned inside `State` by `create` is the only
/// handle later calls get; it is never rediscovered from attributes.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Desired attributes
    type Config: Send + Sync;
    /// Declared attributes plus everything computed remotely
    type State: Send + Sync;

    const KIND: &'static str;

    fn schema(&self) -> &'static [Attribute];

    async fn create(&self, api: &dyn AdminApi, config: &Self::Config)
        -> Result<Self::State, Error>;

    /// Refresh `prior`. `None` means the remote no longer knows `id`; the
    /// caller drops the resource, nothing is recreated here.
    async fn read(
        &self,
        api: &dyn AdminApi,
        id: &str,
        prior: &Self::State,
    ) -> Result<Option<Self::State>, Error>;

    async fn update(
        &self,
        api: &dyn AdminApi,
        id: &str,
        config: &Self::Config,
        prior: &Self::State,
    ) -> Result<Self::State, Error>;

    async fn delete(&self, api: &dyn AdminApi, id: &str) -> Result<(), Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Bool,
    Int,
    String,
    StringList,
    KeyList,
    BoolMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Set by the remote only
    Computed,
    /// May be supplied, otherwise set by the remote
    OptionalComputed,
}

/// One declared attribute of a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub presence: Presence,
    /// Changing it means replacing the resource
    pub force_new: bool,
    pub sensitive: bool,
}

impl Attribute {
    pub const fn new(name: &'static str, kind: AttributeKind, presence: Presence) -> Self {
        Self {
            name,
            kind,
            presence,
            force_new: false,
            sensitive: false,
        }
    }

    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Reject an update that would change an identity component.
pub(crate) fn ensure_same_identity(kind: &str, id: &str, desired: &str) -> Result<(), Error> {
    if id == desired {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration(format!(
            "{} '{}' cannot become '{}' in place; it must be replaced",
            kind, id, desired
        )))
    }
}
