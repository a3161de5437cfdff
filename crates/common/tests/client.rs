//! The HTTP adapter against an in-process admin API server

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use ::common::admin::types::{
    AddKeyRequest, BucketKeyPermRequest, ImportKeyRequest, UpdateBucketRequest, UpdateKeyRequest,
};
use ::common::error::Error;
use ::common::prelude::*;
use ::common::resource::{
    AccessKeyConfig, BucketConfig, BucketGlobalAliasConfig, BucketKeyGrantConfig,
    BucketLocalAliasConfig, BucketState,
};
use ::common::testkit::FakeGarage;

const TOKEN: &str = "test-token";

#[derive(Clone, Default)]
struct ServerState {
    garage: FakeGarage,
    /// Raw bodies of every bucket update, to inspect null vs omitted
    bucket_updates: Arc<Mutex<Vec<Value>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Params {
    id: Option<String>,
    alias: Option<String>,
    access_key_id: Option<String>,
}

impl Params {
    fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or_default()
    }

    fn access_key_id(&self) -> &str {
        self.access_key_id.as_deref().unwrap_or_default()
    }
}

/// Render like Garage does: `{"code", "message"}` with the remote status.
fn respond<T: Serialize>(result: Result<T, Error>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(Error::RemoteRejection { status, message }) => {
            let (code, message) = message
                .split_once(": ")
                .unwrap_or(("Unknown", message.as_str()));
            let status = StatusCode::from_u16(status).unwrap();
            (status, Json(json!({ "code": code, "message": message }))).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

fn respond_empty(result: Result<(), Error>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => respond::<()>(Err(e)),
    }
}

async fn require_token(request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", TOKEN);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str());
    if !authorized {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "code": "AccessDenied",
                "message": "Forbidden: Invalid authorization token provided"
            })),
        )
            .into_response();
    }
    next.run(request).await
}

async fn create_bucket(State(state): State<ServerState>) -> Response {
    respond(state.garage.create_bucket().await)
}

async fn get_bucket(State(state): State<ServerState>, Query(params): Query<Params>) -> Response {
    respond(state.garage.get_bucket(params.id()).await)
}

async fn update_bucket(
    State(state): State<ServerState>,
    Query(params): Query<Params>,
    Json(body): Json<Value>,
) -> Response {
    state.bucket_updates.lock().push(body.clone());
    let request: UpdateBucketRequest = serde_json::from_value(body).unwrap();
    respond(state.garage.update_bucket(params.id(), &request).await)
}

async fn delete_bucket(State(state): State<ServerState>, Query(params): Query<Params>) -> Response {
    respond_empty(state.garage.delete_bucket(params.id()).await)
}

async fn allow(State(state): State<ServerState>, Json(body): Json<BucketKeyPermRequest>) -> Response {
    respond(state.garage.allow_bucket_key(&body).await)
}

async fn deny(State(state): State<ServerState>, Json(body): Json<BucketKeyPermRequest>) -> Response {
    respond(state.garage.deny_bucket_key(&body).await)
}

async fn put_global_alias(
    State(state): State<ServerState>,
    Query(params): Query<Params>,
) -> Response {
    respond(state.garage.put_global_alias(params.id(), params.alias()).await)
}

async fn delete_global_alias(
    State(state): State<ServerState>,
    Query(params): Query<Params>,
) -> Response {
    respond(
        state
            .garage
            .delete_global_alias(params.id(), params.alias())
            .await,
    )
}

async fn put_local_alias(
    State(state): State<ServerState>,
    Query(params): Query<Params>,
) -> Response {
    respond(
        state
            .garage
            .put_local_alias(params.id(), params.access_key_id(), params.alias())
            .await,
    )
}

async fn delete_local_alias(
    State(state): State<ServerState>,
    Query(params): Query<Params>,
) -> Response {
    respond(
        state
            .garage
            .delete_local_alias(params.id(), params.access_key_id(), params.alias())
            .await,
    )
}

/// `POST /v1/key` adds a key, `POST /v1/key?id=` updates one.
async fn add_or_update_key(
    State(state): State<ServerState>,
    Query(params): Query<Params>,
    Json(body): Json<Value>,
) -> Response {
    match &params.id {
        Some(id) => {
            let request: UpdateKeyRequest = serde_json::from_value(body).unwrap();
            respond(state.garage.update_key(id, &request).await)
        }
        None => {
            let request: AddKeyRequest = serde_json::from_value(body).unwrap();
            respond(state.garage.add_key(&request).await)
        }
    }
}

async fn import_key(State(state): State<ServerState>, Json(body): Json<ImportKeyRequest>) -> Response {
    respond(state.garage.import_key(&body).await)
}

async fn get_key(State(state): State<ServerState>, Query(params): Query<Params>) -> Response {
    respond(state.garage.get_key(params.id()).await)
}

async fn delete_key(State(state): State<ServerState>, Query(params): Query<Params>) -> Response {
    respond_empty(state.garage.delete_key(params.id()).await)
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn spawn_admin_api(state: ServerState) -> SocketAddr {
    let router = Router::new()
        .route(
            "/v1/bucket",
            post(create_bucket)
                .get(get_bucket)
                .put(update_bucket)
                .delete(delete_bucket),
        )
        .route("/v1/bucket/allow", post(allow))
        .route("/v1/bucket/deny", post(deny))
        .route(
            "/v1/bucket/alias/global",
            put(put_global_alias).delete(delete_global_alias),
        )
        .route(
            "/v1/bucket/alias/local",
            put(put_local_alias).delete(delete_local_alias),
        )
        .route(
            "/v1/key",
            post(add_or_update_key).get(get_key).delete(delete_key),
        )
        .route("/v1/key/import", post(import_key))
        .with_state(state)
        .layer(middleware::from_fn(require_token));
    serve(router).await
}

fn client_for(addr: SocketAddr, token: &str) -> AdminClient {
    AdminClient::new(&Config::new(addr.to_string(), "http", token)).unwrap()
}

async fn setup() -> (ServerState, AdminClient) {
    common::init_tracing();
    let state = ServerState::default();
    let addr = spawn_admin_api(state.clone()).await;
    (state, client_for(addr, TOKEN))
}

#[tokio::test]
async fn test_bucket_update_body_distinguishes_null_from_omitted() {
    let (server, client) = setup().await;

    let config = BucketConfig {
        quota_max_objects: Some(10),
        ..Default::default()
    };
    let state = Bucket.create(&client, &config).await.unwrap();
    assert_eq!(state.quota_max_objects, Some(10));
    assert_eq!(state.quota_max_size, None);

    let updates = server.bucket_updates.lock().clone();
    assert_eq!(
        updates,
        vec![json!({
            "websiteAccess": { "enabled": false },
            "quotas": { "maxSize": null, "maxObjects": 10 }
        })]
    );
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let (server, client) = setup().await;

    let bucket = Bucket
        .create(
            &client,
            &BucketConfig {
                website_access_enabled: true,
                website_config_index_document: Some("index.html".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let key = AccessKey
        .create(
            &client,
            &AccessKeyConfig {
                name: Some("site".into()),
                permissions: Some(KeyPermissions {
                    create_bucket: true,
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(key.permissions.create_bucket);
    assert_eq!(key.secret_access_key, server.garage.secret_of(&key.id));

    let grant = BucketKeyGrant
        .create(
            &client,
            &BucketKeyGrantConfig {
                bucket_id: bucket.id.clone(),
                access_key_id: key.id.clone(),
                permissions: BucketKeyPermissions::new(true, true, false),
            },
        )
        .await
        .unwrap();
    let global = BucketGlobalAlias
        .create(
            &client,
            &BucketGlobalAliasConfig {
                bucket_id: bucket.id.clone(),
                alias: "www".into(),
            },
        )
        .await
        .unwrap();
    let local = BucketLocalAlias
        .create(
            &client,
            &BucketLocalAliasConfig {
                bucket_id: bucket.id.clone(),
                access_key_id: key.id.clone(),
                alias: "mine".into(),
            },
        )
        .await
        .unwrap();

    let refreshed = Bucket
        .read(&client, &bucket.id, &bucket)
        .await
        .unwrap()
        .unwrap();
    assert!(refreshed.website_access_enabled);
    assert_eq!(refreshed.global_aliases, vec!["www".to_string()]);
    assert_eq!(refreshed.keys.len(), 1);
    assert!(refreshed.keys[0].permissions_read && refreshed.keys[0].permissions_write);
    assert_eq!(refreshed.keys[0].local_aliases, vec!["mine".to_string()]);

    BucketLocalAlias.delete(&client, &local.id).await.unwrap();
    BucketGlobalAlias.delete(&client, &global.id).await.unwrap();
    BucketKeyGrant.delete(&client, &grant.id).await.unwrap();
    AccessKey.delete(&client, &key.id).await.unwrap();
    Bucket.delete(&client, &bucket.id).await.unwrap();

    assert_eq!(server.garage.bucket_count(), 0);
    assert_eq!(server.garage.key_count(), 0);
}

#[tokio::test]
async fn test_import_key_over_http() {
    let (_server, client) = setup().await;

    let state = AccessKey
        .create(
            &client,
            &AccessKeyConfig {
                access_key_id: Some("GK1".into()),
                secret_access_key: Some("S1".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(state.id, "GK1");
    assert_eq!(state.secret_access_key.as_deref(), Some("S1"));
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let (server, _) = setup().await;
    let addr = spawn_admin_api(server.clone()).await;
    let client = client_for(addr, "wrong-token");

    let result = Bucket.create(&client, &BucketConfig::default()).await;

    match result {
        Err(Error::RemoteRejection { status, message }) => {
            assert_eq!(status, 403);
            assert!(message.starts_with("AccessDenied: "));
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(server.garage.bucket_count(), 0);
}

#[tokio::test]
async fn test_missing_bucket_reads_as_gone() {
    let (_server, client) = setup().await;

    let read = Bucket
        .read(&client, "deadbeef", &BucketState::default())
        .await
        .unwrap();
    assert!(read.is_none());
}

#[tokio::test]
async fn test_non_empty_bucket_delete_is_rejected() {
    let (server, client) = setup().await;
    let bucket = Bucket
        .create(&client, &BucketConfig::default())
        .await
        .unwrap();
    server.garage.seed_objects(&bucket.id, 3, 1024);

    let result = Bucket.delete(&client, &bucket.id).await;

    match result {
        Err(Error::RemoteRejection { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "BucketNotEmpty: Bucket is not empty");
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(server.garage.bucket_count(), 1);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client_for(addr, TOKEN);

    let result = client.get_bucket("deadbeef").await;
    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_garbage_response_is_a_decode_error() {
    let router = Router::new().route("/v1/bucket", get(|| async { "<html>proxy</html>" }));
    let addr = serve(router).await;
    let client = client_for(addr, TOKEN);

    let result = client.get_bucket("deadbeef").await;
    assert!(matches!(result, Err(Error::Decode(_))));
}
