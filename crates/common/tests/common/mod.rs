//! Shared test utilities for controller integration tests
#![allow(dead_code)]

use ::common::prelude::*;
use ::common::resource::{BucketConfig, BucketState};
use ::common::testkit::FakeGarage;

/// Install a test subscriber once so controller logs show up with `--nocapture`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn setup() -> FakeGarage {
    init_tracing();
    FakeGarage::new()
}

/// Create a bucket with no optional attributes
pub async fn bare_bucket(garage: &FakeGarage) -> BucketState {
    Bucket
        .create(garage, &BucketConfig::default())
        .await
        .unwrap()
}

/// Refresh a bucket, panicking if it vanished
pub async fn read_bucket(garage: &FakeGarage, id: &str) -> BucketState {
    Bucket
        .read(garage, id, &BucketState::default())
        .await
        .unwrap()
        .expect("bucket should exist")
}
