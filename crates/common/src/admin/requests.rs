//! One type per admin API endpoint (Garage admin API v1).

use reqwest::{Client, RequestBuilder, Url};

use super::types::{
    AddKeyRequest, BucketInfo, BucketKeyPermRequest, CreateBucketRequest, ImportKeyRequest,
    KeyInfo, UpdateBucketRequest, UpdateKeyRequest,
};
use super::ApiRequest;
use crate::error::Error;

pub const BUCKET_PATH: &str = "/v1/bucket";
pub const BUCKET_ALLOW_PATH: &str = "/v1/bucket/allow";
pub const BUCKET_DENY_PATH: &str = "/v1/bucket/deny";
pub const GLOBAL_ALIAS_PATH: &str = "/v1/bucket/alias/global";
pub const LOCAL_ALIAS_PATH: &str = "/v1/bucket/alias/local";
pub const KEY_PATH: &str = "/v1/key";
pub const KEY_IMPORT_PATH: &str = "/v1/key/import";

/// Marker for endpoints that answer with an empty body.
pub type NoContent = ();

pub struct CreateBucket;

impl ApiRequest for CreateBucket {
    type Response = BucketInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client
            .post(base_url.join(BUCKET_PATH)?)
            .json(&CreateBucketRequest::default()))
    }
}

pub struct GetBucket {
    pub id: String,
}

impl ApiRequest for GetBucket {
    type Response = BucketInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client
            .get(base_url.join(BUCKET_PATH)?)
            .query(&[("id", self.id)]))
    }
}

pub struct UpdateBucket {
    pub id: String,
    pub body: UpdateBucketRequest,
}

impl ApiRequest for UpdateBucket {
    type Response = BucketInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client
            .put(base_url.join(BUCKET_PATH)?)
            .query(&[("id", self.id)])
            .json(&self.body))
    }
}

pub struct DeleteBucket {
    pub id: String,
}

impl ApiRequest for DeleteBucket {
    type Response = NoContent;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client
            .delete(base_url.join(BUCKET_PATH)?)
            .query(&[("id", self.id)]))
    }
}

pub struct AllowBucketKey(pub BucketKeyPermRequest);

impl ApiRequest for AllowBucketKey {
    type Response = BucketInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client.post(base_url.join(BUCKET_ALLOW_PATH)?).json(&self.0))
    }
}

pub struct DenyBucketKey(pub BucketKeyPermRequest);

impl ApiRequest for DenyBucketKey {
    type Response = BucketInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client.post(base_url.join(BUCKET_DENY_PATH)?).json(&self.0))
    }
}

/// Put or remove a global alias.
pub struct GlobalAlias {
    pub bucket_id: String,
    pub alias: String,
    pub remove: bool,
}

impl ApiRequest for GlobalAlias {
    type Response = BucketInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        let url = base_url.join(GLOBAL_ALIAS_PATH)?;
        let builder = if self.remove {
            client.delete(url)
        } else {
            client.put(url)
        };
        Ok(builder.query(&[("id", self.bucket_id), ("alias", self.alias)]))
    }
}

/// Put or remove an alias local to one access key.
pub struct LocalAlias {
    pub bucket_id: String,
    pub access_key_id: String,
    pub alias: String,
    pub remove: bool,
}

impl ApiRequest for LocalAlias {
    type Response = BucketInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        let url = base_url.join(LOCAL_ALIAS_PATH)?;
        let builder = if self.remove {
            client.delete(url)
        } else {
            client.put(url)
        };
        Ok(builder.query(&[
            ("id", self.bucket_id),
            ("accessKeyId", self.access_key_id),
            ("alias", self.alias),
        ]))
    }
}

pub struct AddKey(pub AddKeyRequest);

impl ApiRequest for AddKey {
    type Response = KeyInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client.post(base_url.join(KEY_PATH)?).json(&self.0))
    }
}

pub struct ImportKey(pub ImportKeyRequest);

impl ApiRequest for ImportKey {
    type Response = KeyInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client.post(base_url.join(KEY_IMPORT_PATH)?).json(&self.0))
    }
}

pub struct GetKey {
    pub id: String,
}

impl ApiRequest for GetKey {
    type Response = KeyInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client
            .get(base_url.join(KEY_PATH)?)
            .query(&[("id", self.id)]))
    }
}

pub struct UpdateKey {
    pub id: String,
    pub body: UpdateKeyRequest,
}

impl ApiRequest for UpdateKey {
    type Response = KeyInfo;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client
            .post(base_url.join(KEY_PATH)?)
            .query(&[("id", self.id)])
            .json(&self.body))
    }
}

pub struct DeleteKey {
    pub id: String,
}

impl ApiRequest for DeleteKey {
    type Response = NoContent;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, Error> {
        Ok(client
            .delete(base_url.join(KEY_PATH)?)
            .query(&[("id", self.id)]))
    }
}
