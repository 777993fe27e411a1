/// `load_config` module: builds the uploader configuration from an optional YAML
/// file plus the `BOX_ACCESS_TOKEN` environment variable.
///
/// The YAML file holds no secrets; the token is always injected from the
/// environment.
///
/// # Errors
/// All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use crate::config::UploaderConfig;

pub const ACCESS_TOKEN_ENV: &str = "BOX_ACCESS_TOKEN";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    upload_base_url: Option<String>,
    timeout_secs: Option<u64>,
    preflight: Option<bool>,
}

/// Fully merged configuration for the CLI.
#[derive(Debug)]
pub struct CliConfig {
    pub uploader: UploaderConfig,
    /// Default for `upload` when `--no-preflight` is not given.
    pub preflight: bool,
}

/// Loads a static YAML config file and injects the access token from the environment.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let file_config: FileConfig = match serde_yaml::from_str(&content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    merge_with_env(file_config)
}

/// Default endpoints with the access token from the environment.
pub fn config_from_env() -> Result<CliConfig> {
    merge_with_env(FileConfig::default())
}

fn merge_with_env(file_config: FileConfig) -> Result<CliConfig> {
    let token = std::env::var(ACCESS_TOKEN_ENV)
        .with_context(|| format!("{ACCESS_TOKEN_ENV} environment variable not set"))?;
    if token.trim().is_empty() {
        error!("{} is empty", ACCESS_TOKEN_ENV);
        anyhow::bail!("{ACCESS_TOKEN_ENV} environment variable is empty");
    }

    let mut uploader = UploaderConfig::new(token.trim());
    if let Some(url) = file_config.api_base_url {
        uploader = uploader.with_api_base_url(url);
    }
    if let Some(url) = file_config.upload_base_url {
        uploader = uploader.with_upload_base_url(url);
    }
    if let Some(secs) = file_config.timeout_secs {
        if secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        uploader = uploader.with_timeout(Duration::from_secs(secs));
    }
    uploader.trace_loaded();

    Ok(CliConfig {
        uploader,
        preflight: file_config.preflight.unwrap_or(true),
    })
}
