#![doc = "Box client: runs local validation, hashing, pre-flight and submission for each call."]
//
//! # Box uploader
//!
//! [`BoxUploader`] implements [`CsvUploader`] against the Box content API.
//! Each call runs `validate-local → hash → (optional) pre-flight → submit`
//! and stops at the first failure. Nothing is retried.
//!
//! ## Client Usage
//!
//! - Construct with an [`UploaderConfig`]; the token and endpoints cannot change afterwards.
//! - Use one uploader per credential; calls on the same uploader share no mutable state.

use async_trait::async_trait;
use reqwest::Client;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::config::{UploaderConfig, MAX_DIRECT_UPLOAD_BYTES};
use crate::contract::{
    CsvUploader, PreflightOutcome, PreflightRequest, UploadRequest, UploadResult, VersionRequest,
};
use crate::error::UploadError;
use crate::hash::sha1_file;
use crate::preflight;
use crate::submit::{submit, Submission};
use crate::wire::{rfc3339, Attributes, ParentRef};

pub struct BoxUploader {
    http: Client,
    config: UploaderConfig,
}

impl BoxUploader {
    pub fn new(config: UploaderConfig) -> Result<Self, UploadError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(UploadError::HttpClient)?;
        info!(
            api_base_url = %config.api_base_url,
            upload_base_url = %config.upload_base_url,
            token_set = !config.access_token.is_empty(),
            "Initialized BoxUploader"
        );
        Ok(BoxUploader { http, config })
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }
}

/// Checks that `path` is an existing regular file within the direct upload
/// limit and returns its size.
pub async fn inspect_local(path: &Path) -> Result<u64, UploadError> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta,
        Ok(_) => {
            return Err(UploadError::LocalNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(UploadError::LocalNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(UploadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let size = meta.len();
    if size > MAX_DIRECT_UPLOAD_BYTES {
        warn!(path = %path.display(), size, limit = MAX_DIRECT_UPLOAD_BYTES, "File too large for direct upload");
        return Err(UploadError::OversizeInput {
            path: path.to_path_buf(),
            size,
            limit: MAX_DIRECT_UPLOAD_BYTES,
        });
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        warn!(path = %path.display(), "File does not have a .csv extension; uploading anyway");
    }

    Ok(size)
}

/// Remote name for an upload: the override if given, else the local base name.
pub fn remote_name(path: &Path, name_override: Option<&str>) -> Result<String, UploadError> {
    if let Some(name) = name_override {
        return Ok(name.to_string());
    }
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| UploadError::LocalNotFound {
            path: path.to_path_buf(),
        })
}

#[async_trait]
impl CsvUploader for BoxUploader {
    async fn preflight(&self, req: PreflightRequest) -> Result<PreflightOutcome, UploadError> {
        preflight::check(&self.http, &self.config, &req).await
    }

    async fn upload_csv(&self, req: UploadRequest) -> Result<UploadResult, UploadError> {
        let size = inspect_local(&req.path).await?;
        let name = remote_name(&req.path, req.options.file_name.as_deref())?;
        info!(
            path = %req.path.display(),
            name = %name,
            parent_folder_id = %req.parent_folder_id,
            size,
            "Uploading new CSV file"
        );

        let sha1 = sha1_file(&req.path).await?;

        if req.options.preflight {
            let outcome = self
                .preflight(PreflightRequest {
                    name: name.clone(),
                    parent_folder_id: req.parent_folder_id.clone(),
                    size,
                })
                .await?;
            // A conflict is reported but the new-file upload still goes ahead.
            if let PreflightOutcome::Conflict { existing } = outcome {
                warn!(
                    name = %name,
                    existing_id = existing.as_ref().map(|f| f.id.as_str()).unwrap_or("unknown"),
                    "Continuing with new upload despite name conflict; use upload_new_version to update the existing file"
                );
            }
        }

        let created_at = req.options.content_created_at.as_ref().map(rfc3339);
        let modified_at = req.options.content_modified_at.as_ref().map(rfc3339);
        let submission = Submission {
            url: format!("{}/files/content", self.config.upload_base_url),
            attributes: Attributes {
                name: &name,
                parent: Some(ParentRef {
                    id: &req.parent_folder_id,
                }),
                content_created_at: created_at,
                content_modified_at: modified_at,
            },
            path: &req.path,
            sha1: &sha1,
            if_match: None,
        };
        submit(&self.http, &self.config, submission).await
    }

    async fn upload_new_version(&self, req: VersionRequest) -> Result<UploadResult, UploadError> {
        let size = inspect_local(&req.path).await?;
        let name = remote_name(&req.path, req.options.file_name.as_deref())?;
        info!(
            path = %req.path.display(),
            file_id = %req.file_id,
            size,
            if_match = req.options.if_match.as_deref().unwrap_or(""),
            "Uploading new file version"
        );

        let sha1 = sha1_file(&req.path).await?;

        let modified_at = req.options.content_modified_at.as_ref().map(rfc3339);
        let submission = Submission {
            url: format!("{}/files/{}/content", self.config.upload_base_url, req.file_id),
            attributes: Attributes {
                name: &name,
                parent: None,
                content_created_at: None,
                content_modified_at: modified_at,
            },
            path: &req.path,
            sha1: &sha1,
            if_match: req.options.if_match.as_deref(),
        };
        submit(&self.http, &self.config, submission).await
    }
}
