//! Optional fields that distinguish "leave alone" from "clear".
//!
//! Configuration only knows whether a value was supplied. The remote API
//! knows three states per field: omitted (untouched), `null` (cleared)
//! and a value. The policy that maps one onto the other lives here.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::admin::types::{QuotasRequest, UpdateBucketRequest, WebsiteAccessRequest};
use crate::resource::bucket::BucketConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tristate<T> {
    /// Omitted from the request; the remote keeps its current value.
    Unset,
    /// Sent as `null`; the remote drops its current value.
    Cleared,
    Value(T),
}

impl<T> Default for Tristate<T> {
    fn default() -> Self {
        Tristate::Unset
    }
}

impl<T> Tristate<T> {
    /// Absent configuration clears the remote value.
    pub fn clear_if_absent(value: Option<T>) -> Self {
        match value {
            Some(v) => Tristate::Value(v),
            None => Tristate::Cleared,
        }
    }

    /// Absent configuration leaves the remote value untouched.
    pub fn omit_if_absent(value: Option<T>) -> Self {
        match value {
            Some(v) => Tristate::Value(v),
            None => Tristate::Unset,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Tristate::Unset)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Tristate::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Serialize> Serialize for Tristate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tristate::Value(v) => serializer.serialize_some(v),
            Tristate::Unset | Tristate::Cleared => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tristate<T> {
    // a missing field never reaches here; `#[serde(default)]` makes it Unset
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Tristate::Value(v),
            None => Tristate::Cleared,
        })
    }
}

/// Build the bucket update for `config`.
///
/// Every update overwrites website access and both quotas: an omitted
/// quota is sent as `null`, so re-applying a configuration that dropped a
/// quota clears it remotely. Website documents are only sent when set.
pub fn bucket_update_request(config: &BucketConfig) -> UpdateBucketRequest {
    UpdateBucketRequest {
        website_access: WebsiteAccessRequest {
            enabled: config.website_access_enabled,
            index_document: Tristate::omit_if_absent(config.website_config_index_document.clone()),
            error_document: Tristate::omit_if_absent(config.website_config_error_document.clone()),
        },
        quotas: QuotasRequest {
            max_size: Tristate::clear_if_absent(config.quota_max_size),
            max_objects: Tristate::clear_if_absent(config.quota_max_objects),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policies() {
        assert_eq!(Tristate::clear_if_absent(None::<u64>), Tristate::Cleared);
        assert_eq!(Tristate::omit_if_absent(None::<u64>), Tristate::Unset);
        assert_eq!(Tristate::clear_if_absent(Some(0u64)), Tristate::Value(0));
        assert_eq!(Tristate::omit_if_absent(Some(5u64)).value(), Some(&5));
    }

    #[test]
    fn test_empty_config_clears_quotas_and_disables_website() {
        let body = serde_json::to_value(bucket_update_request(&BucketConfig::default())).unwrap();
        assert_eq!(
            body,
            json!({
                "websiteAccess": {"enabled": false},
                "quotas": {"maxSize": null, "maxObjects": null}
            })
        );
    }

    #[test]
    fn test_full_config_is_sent_verbatim() {
        let config = BucketConfig {
            website_access_enabled: true,
            website_config_index_document: Some("index.html".into()),
            website_config_error_document: Some("404.html".into()),
            quota_max_size: Some(1 << 30),
            quota_max_objects: Some(1000),
        };
        let body = serde_json::to_value(bucket_update_request(&config)).unwrap();
        assert_eq!(
            body,
            json!({
                "websiteAccess": {
                    "enabled": true,
                    "indexDocument": "index.html",
                    "errorDocument": "404.html"
                },
                "quotas": {"maxSize": 1073741824u64, "maxObjects": 1000}
            })
        );
    }

    #[test]
    fn test_deserialize_distinguishes_null_and_missing() {
        let quotas: QuotasRequest =
            serde_json::from_value(json!({"maxSize": null})).unwrap();
        assert_eq!(quotas.max_size, Tristate::Cleared);
        assert_eq!(quotas.max_objects, Tristate::Unset);

        let quotas: QuotasRequest =
            serde_json::from_value(json!({"maxSize": 10, "maxObjects": null})).unwrap();
        assert_eq!(quotas.max_size, Tristate::Value(10));
        assert_eq!(quotas.max_objects, Tristate::Cleared);
    }
}
