//! # store: Universal interface for object-storage writes
//!
//! This module defines the [`ObjectStore`] trait the shipping pipeline
//! writes through, plus its production S3 implementation.
//!
//! ## Interface & Extensibility
//! - Implement [`ObjectStore`] to target another store (filesystem, test
//!   double, other cloud).
//! - `preflight` is the run's single hard precondition: it must verify the
//!   destination is reachable before any artifact is touched, so a failing
//!   store aborts the run with no partial work.
//! - `put` writes exactly one object and reports a typed outcome; the
//!   caller decides what a failure means for local files.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so tests can assert which keys
//!   were (and were not) written without any network.

use crate::config::StorageTier;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::StorageClass;
use std::fmt;
use tracing::{error, info};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// The destination bucket failed its pre-flight check; the run must abort
/// before any artifact is processed.
#[derive(Debug)]
pub struct PreflightError {
    pub bucket: String,
    pub reason: String,
}

impl fmt::Display for PreflightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pre-flight check failed for bucket {}: {}",
            self.bucket, self.reason
        )
    }
}

impl std::error::Error for PreflightError {}

/// Trait for writing artifacts into an object-storage bucket.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Verify the destination bucket is reachable before any work begins.
    async fn preflight(&self) -> Result<(), PreflightError>;

    /// Write one object under `key` with the given storage tier.
    async fn put(&self, key: &str, body: Vec<u8>, tier: StorageTier) -> Result<(), StoreError>;
}

/// Production [`ObjectStore`] backed by S3. Credentials and region are
/// resolved from the standard AWS environment chain.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub async fn new_from_env(bucket: &str) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        let client = aws_sdk_s3::Client::new(&sdk_config);
        info!(bucket = %bucket, "Initialized S3 client from environment");
        S3Store {
            client,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn preflight(&self) -> Result<(), PreflightError> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => {
                info!(bucket = %self.bucket, "Pre-flight bucket check passed");
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, bucket = %self.bucket, "Pre-flight bucket check failed");
                Err(PreflightError {
                    bucket: self.bucket.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>, tier: StorageTier) -> Result<(), StoreError> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .storage_class(storage_class(tier))
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, key = key, bucket = %self.bucket, "put_object failed");
                StoreError::from(format!("put_object failed for key {key}: {e}"))
            })?;
        info!(key = key, size, tier = tier.as_str(), "Uploaded object");
        Ok(())
    }
}

fn storage_class(tier: StorageTier) -> StorageClass {
    match tier {
        StorageTier::Standard => StorageClass::Standard,
        StorageTier::InfrequentAccess => StorageClass::StandardIa,
        StorageTier::Archive => StorageClass::Glacier,
        StorageTier::DeepArchive => StorageClass::DeepArchive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_maps_to_a_storage_class() {
        assert_eq!(storage_class(StorageTier::Standard), StorageClass::Standard);
        assert_eq!(
            storage_class(StorageTier::InfrequentAccess),
            StorageClass::StandardIa
        );
        assert_eq!(storage_class(StorageTier::Archive), StorageClass::Glacier);
        assert_eq!(
            storage_class(StorageTier::DeepArchive),
            StorageClass::DeepArchive
        );
    }

    #[test]
    fn preflight_error_reports_bucket_and_reason() {
        let err = PreflightError {
            bucket: "logs".to_string(),
            reason: "access denied".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("logs"));
        assert!(text.contains("access denied"));
    }
}
