//! Pre-flight check: asks Box whether an upload would be accepted before any
//! content is sent.

use reqwest::{Client, Method, StatusCode};
use tracing::{error, info, warn};

use crate::config::UploaderConfig;
use crate::contract::{PreflightOutcome, PreflightRequest};
use crate::error::{RemoteFailure, UploadError};
use crate::wire::{ConflictBody, ParentRef, PreflightApproval, PreflightBody};

pub async fn check(
    http: &Client,
    config: &UploaderConfig,
    req: &PreflightRequest,
) -> Result<PreflightOutcome, UploadError> {
    let url = format!("{}/files/content", config.api_base_url);
    let body = PreflightBody {
        name: &req.name,
        parent: ParentRef {
            id: &req.parent_folder_id,
        },
        size: req.size,
    };

    info!(
        url = %url,
        name = %req.name,
        parent_folder_id = %req.parent_folder_id,
        size = req.size,
        "Running pre-flight check"
    );

    let resp = http
        .request(Method::OPTIONS, &url)
        .bearer_auth(&config.access_token)
        .json(&body)
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, url = %url, "Pre-flight request failed");
            UploadError::PreflightFailed {
                remote: RemoteFailure::from_transport(&e),
            }
        })?;

    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();

    if status.is_success() {
        let upload_url = serde_json::from_str::<PreflightApproval>(&text)
            .ok()
            .and_then(|a| a.upload_url);
        info!(status = %status, "Pre-flight check approved");
        return Ok(PreflightOutcome::Approved { upload_url });
    }

    if status == StatusCode::CONFLICT {
        let existing = serde_json::from_str::<ConflictBody>(&text)
            .ok()
            .and_then(ConflictBody::existing);
        warn!(
            name = %req.name,
            existing_id = existing.as_ref().map(|f| f.id.as_str()).unwrap_or("unknown"),
            "Pre-flight found a file with the same name in the target folder"
        );
        return Ok(PreflightOutcome::Conflict { existing });
    }

    let remote = RemoteFailure::from_response(status, text);
    error!(status = %status, message = %remote.summary(), "Pre-flight check rejected");
    Err(UploadError::PreflightFailed { remote })
}
