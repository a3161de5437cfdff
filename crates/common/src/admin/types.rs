//! Request and response bodies of the Garage admin API (v1).

use serde::{Deserialize, Serialize};

use crate::tristate::Tristate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfo {
    pub id: String,
    #[serde(default)]
    pub global_aliases: Vec<String>,
    #[serde(default)]
    pub website_access: bool,
    #[serde(default)]
    pub website_config: Option<WebsiteConfig>,
    #[serde(default)]
    pub keys: Vec<BucketKeyInfo>,
    #[serde(default)]
    pub objects: u64,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub unfinished_uploads: u64,
    #[serde(default)]
    pub quotas: Option<BucketQuotas>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteConfig {
    pub index_document: String,
    #[serde(default)]
    pub error_document: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketQuotas {
    #[serde(default)]
    pub max_size: Option<u64>,
    #[serde(default)]
    pub max_objects: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketKeyInfo {
    pub access_key_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub permissions: PermissionFlags,
    #[serde(default)]
    pub bucket_local_aliases: Vec<String>,
}

/// Read/write/owner flags as they travel on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionFlags {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub owner: bool,
}

/// Body of both `/v1/bucket/allow` and `/v1/bucket/deny`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketKeyPermRequest {
    pub bucket_id: String,
    pub access_key_id: String,
    pub permissions: PermissionFlags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketRequest {}

/// Full overwrite of a bucket's website and quota settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBucketRequest {
    pub website_access: WebsiteAccessRequest,
    pub quotas: QuotasRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteAccessRequest {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub index_document: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub error_document: Tristate<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotasRequest {
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub max_size: Tristate<u64>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub max_objects: Tristate<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    #[serde(default)]
    pub name: String,
    pub access_key_id: String,
    /// Only present when the remote chooses to reveal it
    #[serde(default)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub permissions: KeyPermissionFlags,
    #[serde(default)]
    pub buckets: Vec<KeyBucketInfo>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPermissionFlags {
    #[serde(default)]
    pub create_bucket: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBucketInfo {
    pub id: String,
    #[serde(default)]
    pub global_aliases: Vec<String>,
    #[serde(default)]
    pub local_aliases: Vec<String>,
    #[serde(default)]
    pub permissions: PermissionFlags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddKeyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportKeyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKeyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<KeyPermissionFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deny: Option<KeyPermissionFlags>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_info_from_remote_json() {
        let info: BucketInfo = serde_json::from_value(json!({
            "id": "afa8f0a22b40b1247ccd0affb869b0af5cff980924a20e4b5e0720a44deb8d39",
            "globalAliases": ["my-bucket"],
            "websiteAccess": true,
            "websiteConfig": {"indexDocument": "index.html", "errorDocument": null},
            "keys": [{
                "accessKeyId": "GK31c2f218a2e44f485b94239e",
                "name": "deploy",
                "permissions": {"read": true, "write": true, "owner": false},
                "bucketLocalAliases": ["site"]
            }],
            "objects": 14827,
            "bytes": 13189855625u64,
            "unfinishedUploads": 0,
            "quotas": {"maxSize": null, "maxObjects": 100}
        }))
        .unwrap();

        assert_eq!(info.global_aliases, vec!["my-bucket"]);
        assert!(info.website_access);
        assert_eq!(info.website_config.unwrap().index_document, "index.html");
        assert_eq!(info.keys[0].bucket_local_aliases, vec!["site"]);
        assert!(info.keys[0].permissions.write);
        assert_eq!(info.quotas.unwrap().max_size, None);
        assert_eq!(info.quotas.unwrap().max_objects, Some(100));
    }

    #[test]
    fn test_update_key_request_omits_absent_fields() {
        let body = serde_json::to_value(UpdateKeyRequest {
            name: None,
            allow: Some(KeyPermissionFlags { create_bucket: true }),
            deny: None,
        })
        .unwrap();
        assert_eq!(body, json!({"allow": {"createBucket": true}}));
    }

    #[test]
    fn test_key_info_without_secret() {
        let info: KeyInfo = serde_json::from_value(json!({
            "name": "deploy",
            "accessKeyId": "GK1",
            "secretAccessKey": null,
            "permissions": {"createBucket": false},
            "buckets": []
        }))
        .unwrap();
        assert_eq!(info.secret_access_key, None);
    }
}
