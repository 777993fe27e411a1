#![allow(unused)]

//! # contract: requests, results and the `CsvUploader` trait
//!
//! Plain data types shared by the Box client, the CLI and tests, plus the
//! [`CsvUploader`] trait that the CLI dispatches through.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so the CLI can be exercised without a network.

use async_trait::async_trait;
use mockall::{automock, predicate::*};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{UploadOptions, VersionOptions};
use crate::error::UploadError;

/// A new file to create inside a Box folder.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub path: PathBuf,
    /// Target folder id; `"0"` is the root folder.
    pub parent_folder_id: String,
    pub options: UploadOptions,
}

impl UploadRequest {
    pub fn new(path: impl Into<PathBuf>, parent_folder_id: impl Into<String>) -> Self {
        UploadRequest {
            path: path.into(),
            parent_folder_id: parent_folder_id.into(),
            options: UploadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }
}

/// New content for an existing Box file.
#[derive(Debug, Clone)]
pub struct VersionRequest {
    pub file_id: String,
    pub path: PathBuf,
    pub options: VersionOptions,
}

impl VersionRequest {
    pub fn new(file_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        VersionRequest {
            file_id: file_id.into(),
            path: path.into(),
            options: VersionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: VersionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Metadata sent to the pre-flight endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PreflightRequest {
    pub name: String,
    pub parent_folder_id: String,
    pub size: u64,
}

/// Remote file as described by Box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub version_id: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
}

/// Answer from the pre-flight endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum PreflightOutcome {
    Approved { upload_url: Option<String> },
    /// A file with the same name already exists in the target folder.
    Conflict { existing: Option<FileDescriptor> },
}

/// Outcome of a completed upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResult {
    pub success: bool,
    pub file: FileDescriptor,
    /// Wall-clock time spent on the upload request.
    pub upload_time: Duration,
}

/// Uploads CSV files to a remote folder, or new content to an existing file.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CsvUploader: Send + Sync {
    /// Ask the remote whether a new file would be accepted, without sending content.
    async fn preflight(&self, req: PreflightRequest) -> Result<PreflightOutcome, UploadError>;

    /// Create a new file in `req.parent_folder_id`.
    async fn upload_csv(&self, req: UploadRequest) -> Result<UploadResult, UploadError>;

    /// Replace the content of `req.file_id`.
    async fn upload_new_version(&self, req: VersionRequest) -> Result<UploadResult, UploadError>;
}
