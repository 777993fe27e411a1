#![doc = "box-csv-upload: upload CSV files to Box with SHA-1 integrity checks."]

//! Uploads go through [`uploader::BoxUploader`], which implements the
//! [`contract::CsvUploader`] trait. Errors are [`error::UploadError`] values.

pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod hash;
pub mod load_config;
pub mod preflight;
pub mod submit;
pub mod uploader;
mod wire;

pub use cli::{run, Cli, Commands};
pub use config::{UploadOptions, UploaderConfig, VersionOptions, MAX_DIRECT_UPLOAD_BYTES};
pub use contract::{
    CsvUploader, FileDescriptor, PreflightOutcome, PreflightRequest, UploadRequest, UploadResult,
    VersionRequest,
};
pub use error::{RemoteFailure, UploadError};
pub use uploader::BoxUploader;
