use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Fully merged configuration for one shipping run, validated once at
/// startup and passed into the pipeline explicitly.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShipConfig {
    /// Root of the build-log tree: `<root>/<job>/builds/<n>/log`.
    pub root_dir: PathBuf,
    /// Destination bucket name.
    pub bucket: String,
    /// Storage tier for uploaded objects.
    pub storage_tier: StorageTier,
    /// Gzip each log before upload (and use the `.log.gz` key suffix).
    pub compress: bool,
}

impl ShipConfig {
    pub fn trace_loaded(&self) {
        info!(
            root_dir = %self.root_dir.display(),
            bucket = %self.bucket,
            storage_tier = self.storage_tier.as_str(),
            compress = self.compress,
            "Loaded ShipConfig"
        );
        debug!(?self, "ShipConfig loaded (full debug)");
    }
}

/// Cost/latency class for uploaded objects. Tiers beyond `Standard`
/// trade lower storage cost for slower, costlier retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageTier {
    Standard,
    InfrequentAccess,
    Archive,
    DeepArchive,
}

impl StorageTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageTier::Standard => "standard",
            StorageTier::InfrequentAccess => "infrequent-access",
            StorageTier::Archive => "archive",
            StorageTier::DeepArchive => "deep-archive",
        }
    }
}
