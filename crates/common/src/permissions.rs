//! Converge permission flags through an additive remote API.
//!
//! The admin API only offers "allow these flags" and "deny these flags".
//! Exact state is reached by always sending both halves computed from the
//! full desired set, never a diff against what was applied last time.

use serde::{Deserialize, Serialize};

use crate::admin::types::{BucketKeyPermRequest, KeyPermissionFlags, PermissionFlags};
use crate::admin::AdminApi;
use crate::error::Error;

/// Desired permissions of an access key on a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketKeyPermissions {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub owner: bool,
}

impl BucketKeyPermissions {
    pub const NONE: Self = Self {
        read: false,
        write: false,
        owner: false,
    };

    pub fn new(read: bool, write: bool, owner: bool) -> Self {
        Self { read, write, owner }
    }

    fn flags(self) -> PermissionFlags {
        PermissionFlags {
            read: self.read,
            write: self.write,
            owner: self.owner,
        }
    }

    fn complement(self) -> PermissionFlags {
        PermissionFlags {
            read: !self.read,
            write: !self.write,
            owner: !self.owner,
        }
    }
}

impl From<PermissionFlags> for BucketKeyPermissions {
    fn from(flags: PermissionFlags) -> Self {
        Self::new(flags.read, flags.write, flags.owner)
    }
}

/// Account-level permissions of an access key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPermissions {
    #[serde(default)]
    pub create_bucket: bool,
}

impl From<KeyPermissionFlags> for KeyPermissions {
    fn from(flags: KeyPermissionFlags) -> Self {
        Self {
            create_bucket: flags.create_bucket,
        }
    }
}

/// Compute the `(allow, deny)` pair that moves a grant to exactly `desired`.
pub fn reconcile(
    bucket_id: &str,
    access_key_id: &str,
    desired: BucketKeyPermissions,
) -> (BucketKeyPermRequest, BucketKeyPermRequest) {
    let allow = BucketKeyPermRequest {
        bucket_id: bucket_id.to_string(),
        access_key_id: access_key_id.to_string(),
        permissions: desired.flags(),
    };
    let deny = BucketKeyPermRequest {
        bucket_id: bucket_id.to_string(),
        access_key_id: access_key_id.to_string(),
        permissions: desired.complement(),
    };
    (allow, deny)
}

/// The deny half of `reconcile(.., NONE)`; its allow half is empty.
pub fn revoke_all(bucket_id: &str, access_key_id: &str) -> BucketKeyPermRequest {
    let (_, deny) = reconcile(bucket_id, access_key_id, BucketKeyPermissions::NONE);
    deny
}

/// Same as [`reconcile`] for the single `create_bucket` flag.
pub fn reconcile_key(desired: KeyPermissions) -> (KeyPermissionFlags, KeyPermissionFlags) {
    (
        KeyPermissionFlags {
            create_bucket: desired.create_bucket,
        },
        KeyPermissionFlags {
            create_bucket: !desired.create_bucket,
        },
    )
}

/// Issue allow then deny. Not atomic: if deny fails the allow stays applied.
pub async fn apply(
    api: &dyn AdminApi,
    bucket_id: &str,
    access_key_id: &str,
    desired: BucketKeyPermissions,
) -> Result<(), Error> {
    let (allow, deny) = reconcile(bucket_id, access_key_id, desired);
    tracing::info!(
        bucket_id,
        access_key_id,
        read = desired.read,
        write = desired.write,
        owner = desired.owner,
        "reconciling bucket key permissions"
    );
    api.allow_bucket_key(&allow).await?;
    api.deny_bucket_key(&deny).await?;
    Ok(())
}
