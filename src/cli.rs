//! Command-line interface for box-csv-upload.
//!
//! Parses arguments, loads the configuration and dispatches to a [`CsvUploader`].
//! Dispatch ([`execute`]) is generic so tests can drive it with a mock uploader.
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{UploadOptions, VersionOptions};
use crate::contract::{CsvUploader, UploadRequest, UploadResult, VersionRequest};
use crate::load_config::{config_from_env, load_config};
use crate::uploader::BoxUploader;

/// CLI for box-csv-upload: send CSV files to Box.
#[derive(Parser)]
#[clap(
    name = "box-csv-upload",
    version,
    about = "Upload CSV files to Box with integrity checks"
)]
pub struct Cli {
    /// Optional YAML config file (endpoints, timeout, pre-flight default)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a CSV file as a new file in a folder
    Upload {
        /// Local CSV file
        #[clap(long)]
        file: PathBuf,
        /// Target folder id ("0" is the root folder)
        #[clap(long, default_value = "0")]
        folder: String,
        /// Remote file name, defaults to the local base name
        #[clap(long)]
        name: Option<String>,
        /// Skip the pre-flight check
        #[clap(long)]
        no_preflight: bool,
        /// Content creation time (RFC 3339)
        #[clap(long)]
        created_at: Option<DateTime<Utc>>,
        /// Content modification time (RFC 3339)
        #[clap(long)]
        modified_at: Option<DateTime<Utc>>,
    },
    /// Upload new content for an existing file
    UploadVersion {
        /// Remote file id
        #[clap(long)]
        file_id: String,
        /// Local CSV file
        #[clap(long)]
        file: PathBuf,
        /// Rename the file along with the update
        #[clap(long)]
        name: Option<String>,
        /// Etag the remote file must currently have
        #[clap(long)]
        if_match: Option<String>,
        /// Content modification time (RFC 3339)
        #[clap(long)]
        modified_at: Option<DateTime<Utc>>,
    },
}

/// Runs one command against `uploader`. `preflight_default` comes from the config file.
pub async fn execute<U>(command: Commands, uploader: &U, preflight_default: bool) -> Result<UploadResult>
where
    U: CsvUploader,
{
    let result = match command {
        Commands::Upload {
            file,
            folder,
            name,
            no_preflight,
            created_at,
            modified_at,
        } => {
            let options = UploadOptions {
                file_name: name,
                preflight: preflight_default && !no_preflight,
                content_created_at: created_at,
                content_modified_at: modified_at,
            };
            tracing::info!(command = "upload", file = %file.display(), folder = %folder, preflight = options.preflight, "Starting upload");
            uploader
                .upload_csv(UploadRequest::new(file, folder).with_options(options))
                .await?
        }
        Commands::UploadVersion {
            file_id,
            file,
            name,
            if_match,
            modified_at,
        } => {
            let options = VersionOptions {
                file_name: name,
                content_modified_at: modified_at,
                if_match,
            };
            tracing::info!(command = "upload-version", file = %file.display(), file_id = %file_id, "Starting version upload");
            uploader
                .upload_new_version(VersionRequest::new(file_id, file).with_options(options))
                .await?
        }
    };
    Ok(result)
}

/// Async CLI entrypoint for main() and integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => config_from_env()?,
    };
    let uploader = BoxUploader::new(config.uploader)?;

    match execute(cli.command, &uploader, config.preflight).await {
        Ok(result) => {
            println!("Upload complete.");
            println!("  id:          {}", result.file.id);
            println!("  name:        {}", result.file.name);
            println!("  size:        {}", result.file.size);
            if let Some(version) = &result.file.version_id {
                println!("  version_id:  {version}");
            }
            println!("  upload_time: {} ms", result.upload_time.as_millis());
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Upload failed");
            Err(e)
        }
    }
}
