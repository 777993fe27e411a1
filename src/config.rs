use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_BASE_URL: &str = "https://api.box.com/2.0";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://upload.box.com/api/2.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Largest file accepted by the single-shot upload endpoint (50 MiB).
pub const MAX_DIRECT_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Credentials and endpoints for one uploader. Never mutated after construction.
#[derive(Clone)]
pub struct UploaderConfig {
    pub access_token: String,
    /// Base for metadata calls such as the pre-flight check.
    pub api_base_url: String,
    /// Base for content uploads.
    pub upload_base_url: String,
    /// Total timeout per request, enforced by the HTTP client.
    pub timeout: Duration,
}

impl UploaderConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        UploaderConfig {
            access_token: access_token.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.upload_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn trace_loaded(&self) {
        info!(
            api_base_url = %self.api_base_url,
            upload_base_url = %self.upload_base_url,
            timeout_secs = self.timeout.as_secs(),
            token_len = self.access_token.len(),
            "Loaded uploader config"
        );
        debug!(?self, "Uploader config (full debug)");
    }
}

impl fmt::Debug for UploaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploaderConfig")
            .field("access_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("upload_base_url", &self.upload_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Per-call options for creating a new file.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Remote name; defaults to the local file's base name.
    pub file_name: Option<String>,
    /// Run the pre-flight check before sending content. Defaults to `true`.
    pub preflight: bool,
    pub content_created_at: Option<DateTime<Utc>>,
    pub content_modified_at: Option<DateTime<Utc>>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        UploadOptions {
            file_name: None,
            preflight: true,
            content_created_at: None,
            content_modified_at: None,
        }
    }
}

/// Per-call options for uploading a new version of an existing file.
#[derive(Debug, Clone, Default)]
pub struct VersionOptions {
    /// Renames the file along with the content update.
    pub file_name: Option<String>,
    pub content_modified_at: Option<DateTime<Utc>>,
    /// Etag the remote file must currently have, sent as `If-Match`.
    pub if_match: Option<String>,
}
