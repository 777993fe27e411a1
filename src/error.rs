//! Error types for local validation and Box API calls.
//!
//! Every remote variant keeps the [`RemoteFailure`] it was built from so callers
//! can log the Box `request_id` or inspect the raw body.

use reqwest::StatusCode;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Diagnostics captured from a failed Box response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteFailure {
    /// HTTP status code, absent for transport failures.
    pub status: Option<u16>,
    /// Box error code such as `item_name_in_use`.
    pub code: Option<String>,
    /// Human-readable message from the Box error body.
    pub message: Option<String>,
    pub request_id: Option<String>,
    /// Raw response body as received.
    pub body: String,
}

#[derive(Deserialize)]
struct BoxErrorBody {
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

impl RemoteFailure {
    /// Builds a failure from a status and response body, parsing the Box
    /// error envelope when the body is JSON.
    pub fn from_response(status: StatusCode, body: String) -> Self {
        let parsed = serde_json::from_str::<BoxErrorBody>(&body).ok();
        let (code, message, request_id) = match parsed {
            Some(b) => (b.code, b.message, b.request_id),
            None => (None, None, None),
        };
        RemoteFailure {
            status: Some(status.as_u16()),
            code,
            message,
            request_id,
            body,
        }
    }

    /// Builds a failure for a request that never produced a response.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        RemoteFailure {
            status: err.status().map(|s| s.as_u16()),
            message: Some(err.to_string()),
            ..Default::default()
        }
    }

    /// Remote message if present, otherwise the raw body, otherwise the status.
    pub fn summary(&self) -> String {
        if let Some(msg) = &self.message {
            return msg.clone();
        }
        if !self.body.trim().is_empty() {
            return self.body.clone();
        }
        match self.status {
            Some(status) => format!("HTTP {status}"),
            None => "no response".to_string(),
        }
    }
}

/// Errors returned by upload operations.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("File not found: {}", .path.display())]
    LocalNotFound { path: PathBuf },

    #[error("File {} is {size} bytes, above the {limit} byte direct upload limit", .path.display())]
    OversizeInput { path: PathBuf, size: u64, limit: u64 },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pre-flight check failed: {}", .remote.summary())]
    PreflightFailed { remote: RemoteFailure },

    #[error("Authentication failed: the access token is invalid or expired ({})", .remote.summary())]
    RemoteAuthFailed { remote: RemoteFailure },

    #[error("Permission denied: the token cannot write to the target folder or file ({})", .remote.summary())]
    RemoteForbidden { remote: RemoteFailure },

    #[error("A file with this name already exists in the folder; use upload_new_version to replace its content ({})", .remote.summary())]
    RemoteConflict { remote: RemoteFailure },

    #[error("File exceeds the size limit accepted by Box ({})", .remote.summary())]
    RemoteTooLarge { remote: RemoteFailure },

    #[error("Precondition failed: the remote file version does not match If-Match ({})", .remote.summary())]
    RemotePreconditionFailed { remote: RemoteFailure },

    #[error("Box request failed: {}", .remote.summary())]
    RemoteOther { remote: RemoteFailure },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl UploadError {
    /// Maps a failed upload response onto its error category.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let remote = RemoteFailure::from_response(status, body);
        match status {
            StatusCode::UNAUTHORIZED => UploadError::RemoteAuthFailed { remote },
            StatusCode::FORBIDDEN => UploadError::RemoteForbidden { remote },
            StatusCode::CONFLICT => UploadError::RemoteConflict { remote },
            StatusCode::PAYLOAD_TOO_LARGE => UploadError::RemoteTooLarge { remote },
            StatusCode::PRECONDITION_FAILED => UploadError::RemotePreconditionFailed { remote },
            _ => UploadError::RemoteOther { remote },
        }
    }

    pub fn transport(err: reqwest::Error) -> Self {
        UploadError::RemoteOther {
            remote: RemoteFailure::from_transport(&err),
        }
    }

    /// Remote diagnostics, if this error came from Box.
    pub fn remote(&self) -> Option<&RemoteFailure> {
        match self {
            UploadError::PreflightFailed { remote }
            | UploadError::RemoteAuthFailed { remote }
            | UploadError::RemoteForbidden { remote }
            | UploadError::RemoteConflict { remote }
            | UploadError::RemoteTooLarge { remote }
            | UploadError::RemotePreconditionFailed { remote }
            | UploadError::RemoteOther { remote } => Some(remote),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_error(status: u16, code: &str, message: &str) -> String {
        serde_json::json!({
            "type": "error",
            "status": status,
            "code": code,
            "message": message,
            "request_id": "req-123",
        })
        .to_string()
    }

    #[test]
    fn maps_known_statuses_to_specific_variants() {
        let cases = [
            (StatusCode::UNAUTHORIZED, "RemoteAuthFailed"),
            (StatusCode::FORBIDDEN, "RemoteForbidden"),
            (StatusCode::CONFLICT, "RemoteConflict"),
            (StatusCode::PAYLOAD_TOO_LARGE, "RemoteTooLarge"),
            (StatusCode::PRECONDITION_FAILED, "RemotePreconditionFailed"),
            (StatusCode::INTERNAL_SERVER_ERROR, "RemoteOther"),
        ];
        for (status, expected) in cases {
            let err = UploadError::from_status(status, String::new());
            let name = format!("{err:?}");
            assert!(
                name.starts_with(expected),
                "status {status} mapped to {name}, expected {expected}"
            );
        }
    }

    #[test]
    fn conflict_message_points_to_version_upload() {
        let err = UploadError::from_status(
            StatusCode::CONFLICT,
            box_error(409, "item_name_in_use", "Item with the same name already exists"),
        );
        let msg = err.to_string();
        assert!(msg.contains("upload_new_version"), "got: {msg}");
        assert!(msg.contains("Item with the same name already exists"));
    }

    #[test]
    fn remote_failure_parses_box_error_envelope() {
        let body = box_error(403, "access_denied_insufficient_permissions", "Access denied");
        let remote = RemoteFailure::from_response(StatusCode::FORBIDDEN, body.clone());
        assert_eq!(remote.status, Some(403));
        assert_eq!(remote.code.as_deref(), Some("access_denied_insufficient_permissions"));
        assert_eq!(remote.request_id.as_deref(), Some("req-123"));
        assert_eq!(remote.body, body);
    }

    #[test]
    fn summary_falls_back_to_body_then_status() {
        let plain = RemoteFailure::from_response(StatusCode::BAD_GATEWAY, "upstream down".into());
        assert_eq!(plain.summary(), "upstream down");

        let empty = RemoteFailure::from_response(StatusCode::BAD_GATEWAY, String::new());
        assert_eq!(empty.summary(), "HTTP 502");
    }
}
