//! Coordinating module for the discover-filter-compress-upload pipeline.

use crate::compress::gzip_file;
use crate::config::ShipConfig;
use crate::eligibility::is_eligible;
use crate::store::ObjectStore;
use crate::walker::{ArtifactRef, BuildLogWalker};
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::{debug, error, info};

/// Outcome of one eligible artifact.
#[derive(Debug)]
pub struct ArtifactOutcome {
    pub job: String,
    pub build: u64,
    pub key: String,
    pub result: UploadResult,
}

#[derive(Debug)]
pub enum UploadResult {
    Uploaded,
    Failed { reason: String },
}

/// Transcript of a run: exactly one outcome per eligible artifact, in
/// the order the walker discovered them. No aggregate summary.
#[derive(Debug, Default)]
pub struct ShipReport {
    pub outcomes: Vec<ArtifactOutcome>,
}

impl ShipReport {
    pub fn transcript(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                UploadResult::Uploaded => format!(
                    "uploaded {} (job {}, build {})",
                    outcome.key, outcome.job, outcome.build
                ),
                UploadResult::Failed { reason } => format!(
                    "failed {} (job {}, build {}): {}",
                    outcome.key, outcome.job, outcome.build, reason
                ),
            })
            .collect()
    }
}

/// Entrypoint: ship today's build logs according to config.
///
/// The pipeline is strictly sequential per artifact: discovered →
/// eligible? → (gzip) → upload → on confirmed success delete the local
/// original. An upload failure is terminal for that one artifact only;
/// local files stay untouched and the walk continues. There is no retry
/// and no remote existence check — same-day reruns are idempotent only
/// because a successful first run deletes what it shipped.
pub async fn ship(config: &ShipConfig, store: &dyn ObjectStore) -> Result<ShipReport> {
    // The only hard precondition: abort before any work if the bucket
    // is unreachable.
    store.preflight().await?;

    let run_date = Local::now().date_naive();
    info!(
        run_date = %run_date,
        root_dir = %config.root_dir.display(),
        bucket = %config.bucket,
        "Starting log shipment"
    );

    // Compressed copies live in a per-run directory; names embed job and
    // build, so no collision is possible. The directory is removed when
    // the run ends whatever the upload outcomes were.
    let scratch =
        tempfile::tempdir().context("failed to create scratch directory for compressed logs")?;

    let mut report = ShipReport::default();
    for artifact in BuildLogWalker::new(&config.root_dir) {
        if !is_eligible(&artifact.path, run_date) {
            debug!(
                job = %artifact.job,
                build = artifact.build,
                "Artifact not modified on run date, skipping"
            );
            continue;
        }
        let key = artifact.remote_key(config.compress);
        let result = match ship_one(config, store, &scratch, &artifact, &key).await {
            Ok(()) => {
                info!(job = %artifact.job, build = artifact.build, key = %key, "Artifact shipped");
                UploadResult::Uploaded
            }
            Err(reason) => {
                error!(
                    job = %artifact.job,
                    build = artifact.build,
                    key = %key,
                    reason = %reason,
                    "Artifact failed to ship, local files left untouched"
                );
                UploadResult::Failed { reason }
            }
        };
        report.outcomes.push(ArtifactOutcome {
            job: artifact.job,
            build: artifact.build,
            key,
            result,
        });
    }

    Ok(report)
}

async fn ship_one(
    config: &ShipConfig,
    store: &dyn ObjectStore,
    scratch: &TempDir,
    artifact: &ArtifactRef,
    key: &str,
) -> std::result::Result<(), String> {
    let (body_path, scratch_copy): (PathBuf, Option<PathBuf>) = if config.compress {
        let dst = scratch.path().join(key);
        gzip_file(&artifact.path, &dst)
            .map_err(|e| format!("compression failed: {e}"))?;
        (dst.clone(), Some(dst))
    } else {
        (artifact.path.clone(), None)
    };

    let body = fs::read(&body_path)
        .map_err(|e| format!("failed to read {}: {e}", body_path.display()));
    let upload = match body {
        Ok(body) => store
            .put(key, body, config.storage_tier)
            .await
            .map_err(|e| format!("upload failed: {e}")),
        Err(e) => Err(e),
    };

    // The scratch copy never outlives its artifact, success or failure.
    if let Some(copy) = scratch_copy {
        if let Err(e) = fs::remove_file(&copy) {
            debug!(error = ?e, path = %copy.display(), "Failed to remove scratch copy");
        }
    }

    upload?;

    // Confirmed remote write: only now may the local original go.
    fs::remove_file(&artifact.path)
        .map_err(|e| format!("uploaded {key} but failed to delete local log: {e}"))?;
    Ok(())
}
