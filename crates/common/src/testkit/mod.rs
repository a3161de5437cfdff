/// In-memory stand-in for a Garage cluster's admin API
///
/// Behaves like the real endpoint where reconciliation cares about it:
/// permissions are additive (allow sets flags, deny clears them), aliases
/// are unique cluster-wide, unknown ids answer 404 and non-empty buckets
/// refuse deletion. Every call is recorded so tests can assert on the
/// exact sequence a controller issued.
///
/// # Example
///
/// ```rust,ignore
/// use common::prelude::*;
/// use common::testkit::FakeGarage;
///
/// #[tokio::test]
/// async fn test_grant() -> Result<(), Error> {
///     let garage = FakeGarage::new();
///     let bucket = Bucket.create(&garage, &Default::default()).await?;
///     let key = garage.seed_key("deploy");
///     // ...
///     Ok(())
/// }
/// ```
mod garage;

pub use garage::FakeGarage;
