/**
 * Remote capability: the Garage admin API surface we
 *  reconcile against, plus its HTTP adapter.
 */
pub mod admin;
/**
 * Endpoint and credential configuration.
 *  Passed explicitly to every client, never global.
 */
pub mod config;
pub mod error;
/**
 * Composite identities for relationship resources
 *  that have no remote object of their own.
 */
pub mod identity;
/**
 * Allow/deny reconciliation of permission flags
 *  over an additive remote model.
 */
pub mod permissions;
/**
 * Lifecycle controllers, one per resource kind.
 */
pub mod resource;
/**
 * In-memory admin API used by tests.
 */
pub mod testkit;
pub mod tristate;

pub mod prelude {
    pub use crate::admin::{AdminApi, AdminClient, LazyAdminClient};
    pub use crate::config::Config;
    pub use crate::error::Error;
    pub use crate::identity::{CompositeId, GlobalAliasId, GrantId, Identity, LocalAliasId};
    pub use crate::permissions::{BucketKeyPermissions, KeyPermissions};
    pub use crate::resource::{
        AccessKey, Bucket, BucketGlobalAlias, BucketKeyGrant, BucketLocalAlias, Resource,
    };
    pub use crate::tristate::Tristate;
}
