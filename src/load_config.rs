use crate::config::{ShipConfig, StorageTier};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Deserialize)]
struct StaticConfig {
    logs: LogsSection,
    upload: UploadSection,
}

#[derive(Deserialize)]
struct LogsSection {
    root_dir: std::path::PathBuf,
}

#[derive(Deserialize)]
struct UploadSection {
    bucket: String,
    storage_tier: String,
    #[serde(default = "default_compress")]
    compress: bool,
}

fn default_compress() -> bool {
    true
}

/// Loads the static YAML config file and validates it into a [`ShipConfig`].
/// Credentials are not part of the file; the object-store client resolves
/// them from the environment on its own.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ShipConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read config file {:?}", path_ref))?;

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let storage_tier = match static_conf.upload.storage_tier.as_str() {
        "standard" => StorageTier::Standard,
        "infrequent-access" => StorageTier::InfrequentAccess,
        "archive" => StorageTier::Archive,
        "deep-archive" => StorageTier::DeepArchive,
        other => {
            error!(tier = %other, "Unsupported upload.storage_tier in config");
            anyhow::bail!(
                "Unsupported upload.storage_tier: {} (expected one of standard, \
                 infrequent-access, archive, deep-archive)",
                other
            );
        }
    };

    if static_conf.upload.bucket.is_empty() {
        error!("upload.bucket in config is empty");
        anyhow::bail!("upload.bucket must not be empty");
    }

    let config = ShipConfig {
        root_dir: static_conf.logs.root_dir,
        bucket: static_conf.upload.bucket,
        storage_tier,
        compress: static_conf.upload.compress,
    };
    config.trace_loaded();

    Ok(config)
}
